//! Offline build steps for the ski touring guide's static site: the overview
//! GeoJSON read by the browse page, one detail GeoJSON per tour and the
//! per-tour HTML pages. Everything lives under a single docs root described
//! by [`SiteLayout`].

pub mod detail;
pub mod error;
pub mod layout;
pub mod overview;
pub mod pages;
pub mod site;
pub mod slug;
pub mod stats;
pub mod track;

pub use detail::{build_details, DetailReport};
pub use error::BuildError;
pub use layout::{SiteLayout, DEFAULT_DOCS_DIR};
pub use overview::build_overview;
pub use pages::{build_pages, PageReport};
pub use site::build_all;
