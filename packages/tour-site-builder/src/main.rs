//! `tour-site`: rebuilds the guide's data files and tour pages from GPX
//! tracks and Markdown write-ups.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tour_site_builder::{
    build_all, build_details, build_overview, build_pages, SiteLayout, DEFAULT_DOCS_DIR,
};

#[derive(Parser)]
#[command(name = "tour-site", about = "Ski touring guide site builder")]
struct Cli {
    /// Docs root holding tracks/, data/, templates/ and tours_md/
    #[arg(long, global = true, env = "TOUR_SITE_DOCS", default_value = DEFAULT_DOCS_DIR)]
    docs: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build `data/tours.geojson` from every GPX track
    Overview,
    /// Build `data/tours_detail/{slug}.geojson` for every GPX track
    Detail,
    /// Render `tours/{slug}.html` from detail files and Markdown
    Pages {
        /// Rebuild every page, even ones newer than their inputs
        #[arg(long)]
        rerun: bool,
    },
    /// Overview, detail, then every page that is out of date
    All,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();
    let cli = Cli::parse();
    let layout = SiteLayout::new(cli.docs);
    log::debug!("Docs root: {}", layout.docs().display());

    match cli.command {
        Commands::Overview => {
            build_overview(&layout)?;
        }
        Commands::Detail => {
            build_details(&layout)?;
        }
        Commands::Pages { rerun } => {
            build_pages(&layout, rerun)?;
        }
        Commands::All => {
            build_all(&layout)?;
            log::info!("Site build finished");
        }
    }

    Ok(())
}
