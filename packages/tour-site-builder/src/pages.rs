//! Static HTML page per tour, rendered from its Markdown write-up and the
//! detail GeoJSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use pulldown_cmark::{html, Options, Parser};
use serde_json::{Map, Value};
use tour_models::{escape_html, text_of};

use crate::error::{BuildError, Result};
use crate::layout::{
    list_files, load_overview_by_slug, read_json, read_text, slug_from_path, write_text,
    SiteLayout,
};

/// Shown for a missing province or region.
pub const MISSING_VALUE: &str = "—";
pub const BUILT_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    pub built: usize,
    pub skipped: usize,
    pub created_markdown: usize,
    pub forced: usize,
}

/// Rewrites a docs-root URL so it resolves from `tours/{slug}.html`.
pub fn as_tour_relative(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("../") {
        return url.to_string();
    }
    match url.strip_prefix("./") {
        Some(rest) => format!("../{}", rest),
        None => format!("../{}", url.trim_start_matches('/')),
    }
}

/// A detail file may hold a bare `Feature` or a `FeatureCollection`, in
/// which case its first feature is used.
pub fn first_feature(document: &Value) -> Option<&Value> {
    match document.get("type").and_then(Value::as_str)? {
        "Feature" => Some(document),
        "FeatureCollection" => document
            .get("features")?
            .as_array()?
            .first()
            .filter(|f| f.is_object()),
        _ => None,
    }
}

fn text(props: &Map<String, Value>, key: &str) -> Option<String> {
    props.get(key).and_then(text_of)
}

/// Markdown template with the tour's metadata filled in.
pub fn scaffold_markdown(template: &str, slug: &str, props: &Map<String, Value>) -> String {
    let get = |key: &str| text(props, key).unwrap_or_default();
    fill_template(
        template,
        &[
            ("{{SLUG}}", slug.to_string()),
            ("{{TITLE}}", text(props, "title").unwrap_or_else(|| slug.to_string())),
            ("{{PROVINCE}}", get("province")),
            ("{{REGION}}", get("region")),
            ("{{COUNTRY}}", get("country")),
            ("{{DIRECTION}}", get("direction")),
        ],
    )
}

pub fn markdown_to_html(markdown: &str) -> String {
    let markdown = markdown.replace("\r\n", "\n");
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(&markdown, options));
    out
}

/// `[lat, lon]` pairs of a line geometry as JSON; `[]` for anything else.
pub fn coords_json(geometry: Option<&Value>) -> String {
    let positions = geometry
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
        .filter(|coords| coords.first().is_some_and(Value::is_array));
    let Some(positions) = positions else {
        return "[]".to_string();
    };
    let latlon: Vec<[&Value; 2]> = positions
        .iter()
        .filter_map(Value::as_array)
        .filter(|c| c.len() >= 2)
        .map(|c| [&c[1], &c[0]])
        .collect();
    serde_json::to_string(&latlon).unwrap_or_else(|_| "[]".to_string())
}

pub fn fill_template(template: &str, replacements: &[(&str, String)]) -> String {
    replacements
        .iter()
        .fold(template.to_string(), |page, (key, value)| page.replace(key, value))
}

/// Placeholder values for one tour page, in the order they are applied.
pub fn page_replacements(
    slug: &str,
    props: &Map<String, Value>,
    geometry: Option<&Value>,
    content_html: String,
) -> Vec<(&'static str, String)> {
    let title = text(props, "title").unwrap_or_else(|| slug.to_string());
    let province = text(props, "province").or_else(|| text(props, "province_code"));
    let region = text(props, "region");
    let gpx_url = as_tour_relative(
        &text(props, "gpx").unwrap_or_else(|| format!("./tracks/{}.gpx", slug)),
    );
    let detail_url = as_tour_relative(&format!("./data/tours_detail/{}.geojson", slug));
    let or_missing = |value: Option<String>| {
        value
            .map(|v| escape_html(&v))
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    };

    vec![
        ("{{TITLE}}", escape_html(&title)),
        ("{{PROVINCE}}", or_missing(province)),
        ("{{REGION}}", or_missing(region)),
        (
            "{{GPX_URL}}",
            if gpx_url.is_empty() {
                "#".to_string()
            } else {
                escape_html(&gpx_url)
            },
        ),
        ("{{CONTENT_HTML}}", content_html),
        ("{{COORDS_JSON}}", coords_json(geometry)),
        ("{{TITLE_JSON}}", Value::String(title).to_string()),
        ("{{SLUG}}", escape_html(slug)),
        ("{{DETAIL_GEOJSON_URL}}", escape_html(&detail_url)),
    ]
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// True when `output` exists and is at least as new as every input.
pub fn is_up_to_date(output: &Path, inputs: &[&Path]) -> bool {
    let Some(built) = modified(output) else {
        return false;
    };
    inputs
        .iter()
        .all(|input| modified(input).is_some_and(|changed| built >= changed))
}

/// Scaffolds `tours_md/{slug}.md` from the Markdown template when it does
/// not exist yet. Returns whether a file was created.
pub fn ensure_markdown(
    layout: &SiteLayout,
    slug: &str,
    props: &Map<String, Value>,
) -> Result<bool> {
    let path = layout.markdown_path(slug);
    if path.is_file() {
        return Ok(false);
    }
    let template_path = layout.markdown_template_path();
    if !template_path.is_file() {
        return Err(BuildError::MissingTemplate(template_path));
    }
    let template = read_text(&template_path)?;
    write_text(&path, &scaffold_markdown(&template, slug, props))?;
    log::info!("Created {}", path.display());
    Ok(true)
}

/// Renders every tour page. Without `rerun`, pages newer than their
/// template, Markdown and detail file are left alone.
pub fn build_pages(layout: &SiteLayout, rerun: bool) -> Result<PageReport> {
    let detail_dir = layout.detail_dir();
    if !detail_dir.is_dir() {
        return Err(BuildError::MissingDirectory(detail_dir));
    }
    let template_path = layout.page_template_path();
    if !template_path.is_file() {
        return Err(BuildError::MissingTemplate(template_path));
    }
    let files = list_files(&detail_dir, "geojson")?;
    if files.is_empty() {
        return Err(BuildError::NoInputs {
            dir: detail_dir,
            extension: "geojson".to_string(),
        });
    }

    let template = read_text(&template_path)?;
    let overview: BTreeMap<String, Map<String, Value>> =
        load_overview_by_slug(&layout.overview_path());
    let built_at = chrono::Local::now().format(BUILT_AT_FORMAT).to_string();
    let mut report = PageReport::default();

    for detail_path in &files {
        let document = read_json(detail_path)?;
        let Some(feature) = first_feature(&document) else {
            log::warn!("Skipping {}: not a GeoJSON Feature", detail_path.display());
            continue;
        };

        let detail_props = feature
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let slug = text(&detail_props, "slug").unwrap_or_else(|| slug_from_path(detail_path));

        // Detail properties win over the overview
        let mut props = overview.get(&slug).cloned().unwrap_or_default();
        props.extend(detail_props);

        if ensure_markdown(layout, &slug, &props)? {
            report.created_markdown += 1;
        }

        let markdown_path = layout.markdown_path(&slug);
        let out_path = layout.page_path(&slug);
        if rerun {
            if out_path.is_file() {
                report.forced += 1;
            }
        } else if is_up_to_date(
            &out_path,
            &[template_path.as_path(), markdown_path.as_path(), detail_path.as_path()],
        ) {
            report.skipped += 1;
            continue;
        }

        let content_html = markdown_to_html(&read_text(&markdown_path)?);
        let mut replacements =
            page_replacements(&slug, &props, feature.get("geometry"), content_html);
        replacements.push(("{{BUILT_AT}}", built_at.clone()));

        write_text(&out_path, &fill_template(&template, &replacements))?;
        report.built += 1;
    }

    log::info!(
        "Tour pages built: {}, skipped: {}, forced: {}, markdown created: {}",
        report.built,
        report.skipped,
        report.forced,
        report.created_markdown
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_as_tour_relative() {
        assert_eq!(as_tour_relative("./tracks/x.gpx"), "../tracks/x.gpx");
        assert_eq!(as_tour_relative("../tracks/x.gpx"), "../tracks/x.gpx");
        assert_eq!(as_tour_relative("https://example.org/x.gpx"), "https://example.org/x.gpx");
        assert_eq!(as_tour_relative("/tracks/x.gpx"), "../tracks/x.gpx");
        assert_eq!(as_tour_relative("tracks/x.gpx"), "../tracks/x.gpx");
        assert_eq!(as_tour_relative("  "), "");
    }

    #[test]
    fn test_first_feature() {
        let feature = json!({ "type": "Feature", "properties": {} });
        assert_eq!(first_feature(&feature), Some(&feature));
        let collection = json!({ "type": "FeatureCollection", "features": [feature.clone()] });
        assert_eq!(first_feature(&collection), Some(&feature));
        assert_eq!(first_feature(&json!({ "type": "FeatureCollection", "features": [] })), None);
        assert_eq!(first_feature(&json!({ "type": "Point" })), None);
    }

    #[test]
    fn test_scaffold_markdown() {
        let template = "# {{TITLE}}\n{{REGION}}, {{PROVINCE}} ({{COUNTRY}}) {{DIRECTION}} {{SLUG}}";
        let p = props(json!({ "title": "Ginpeak", "region": "Whistler", "province": "BC" }));
        assert_eq!(
            scaffold_markdown(template, "ginpeak", &p),
            "# Ginpeak\nWhistler, BC ()  ginpeak"
        );
    }

    #[test]
    fn test_markdown_to_html() {
        let html = markdown_to_html("## Approach\r\n\r\nSkin up the **north** ridge.\r\n\r\n- one\r\n- two\r\n");
        assert!(html.contains("<h2>Approach</h2>"));
        assert!(html.contains("<strong>north</strong>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_coords_json_swaps_to_lat_lon() {
        let line = json!({ "type": "LineString", "coordinates": [[-122.9, 50.1, 900.0], [-122.8, 50.2, null]] });
        assert_eq!(coords_json(Some(&line)), "[[50.1,-122.9],[50.2,-122.8]]");
        let point = json!({ "type": "Point", "coordinates": [-122.9, 50.1] });
        assert_eq!(coords_json(Some(&point)), "[]");
        assert_eq!(coords_json(None), "[]");
    }

    #[test]
    fn test_page_replacements_fallbacks() {
        let p = props(json!({ "title": "Brew <Hut>", "province_code": "BC", "region": "" }));
        let values: BTreeMap<&str, String> =
            page_replacements("brew", &p, None, "<p>x</p>".to_string()).into_iter().collect();
        assert_eq!(values["{{TITLE}}"], "Brew &lt;Hut&gt;");
        assert_eq!(values["{{PROVINCE}}"], "BC");
        assert_eq!(values["{{REGION}}"], MISSING_VALUE);
        assert_eq!(values["{{GPX_URL}}"], "../tracks/brew.gpx");
        assert_eq!(values["{{TITLE_JSON}}"], "\"Brew <Hut>\"");
        assert_eq!(values["{{DETAIL_GEOJSON_URL}}"], "../data/tours_detail/brew.geojson");
        assert_eq!(values["{{CONTENT_HTML}}"], "<p>x</p>");
    }

    fn site() -> (tempfile::TempDir, SiteLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = SiteLayout::new(dir.path());
        fs::create_dir_all(layout.detail_dir()).unwrap();
        fs::create_dir_all(layout.markdown_dir()).unwrap();
        write_text(
            &layout.page_template_path(),
            "<h1>{{TITLE}}</h1><p>{{REGION}}</p><a href=\"{{GPX_URL}}\"></a>{{CONTENT_HTML}}<script>{{COORDS_JSON}}</script><footer>{{BUILT_AT}}</footer>",
        )
        .unwrap();
        fs::write(layout.markdown_template_path(), "# {{TITLE}}\n\nWrite-up for {{REGION}}.\n").unwrap();
        let detail = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "slug": "brew", "title": "Brew Hut", "region": "Whistler" },
                "geometry": { "type": "LineString", "coordinates": [[-122.9, 50.1], [-122.8, 50.2]] }
            }]
        });
        fs::write(layout.detail_path("brew"), detail.to_string()).unwrap();
        (dir, layout)
    }

    #[test]
    fn test_build_pages_scaffolds_and_renders() {
        let (_dir, layout) = site();
        let report = build_pages(&layout, false).unwrap();
        assert_eq!(report.built, 1);
        assert_eq!(report.created_markdown, 1);
        assert!(layout.markdown_path("brew").is_file());

        let page = fs::read_to_string(layout.page_path("brew")).unwrap();
        assert!(page.contains("<h1>Brew Hut</h1>"));
        assert!(page.contains("<p>Whistler</p>"));
        assert!(page.contains("href=\"../tracks/brew.gpx\""));
        assert!(page.contains("Write-up for Whistler."));
        assert!(page.contains("[[50.1,-122.9],[50.2,-122.8]]"));
        assert!(!page.contains("{{BUILT_AT}}"));
    }

    #[test]
    fn test_build_pages_skips_up_to_date_unless_rerun() {
        let (_dir, layout) = site();
        build_pages(&layout, false).unwrap();

        let again = build_pages(&layout, false).unwrap();
        assert_eq!(again.built, 0);
        assert_eq!(again.skipped, 1);

        let forced = build_pages(&layout, true).unwrap();
        assert_eq!(forced.built, 1);
        assert_eq!(forced.forced, 1);
    }

    #[test]
    fn test_build_pages_needs_template() {
        let (_dir, layout) = site();
        fs::remove_file(layout.page_template_path()).unwrap();
        assert!(matches!(build_pages(&layout, false), Err(BuildError::MissingTemplate(_))));
    }
}
