//! Per-tour detail files: full-resolution 3D track plus metadata and
//! elevation statistics.

use serde_json::{json, Map, Value};

use crate::error::{BuildError, Result};
use crate::layout::{
    list_files, load_overview_by_slug, slug_from_path, to_pretty_json, write_if_changed,
    SiteLayout,
};
use crate::slug::SlugMetadata;
use crate::stats::{round_to, track_distance_km, ElevationStats};
use crate::track::{read_track_or_skip, TrackPoint};

/// Overview properties that are maintained by hand and win over computed
/// values when set.
pub const OVERVIEW_OVERRIDES: &[&str] = &[
    "subtitle",
    "activity",
    "difficulty",
    "vert_m",
    "time_h",
    "cover",
    "page",
    "gpx",
    "province",
    "region",
    "country",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailReport {
    pub built: usize,
    pub unchanged: usize,
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

pub fn detail_feature(
    slug: &str,
    points: &[TrackPoint],
    overview: Option<&Map<String, Value>>,
) -> Value {
    let meta = SlugMetadata::parse(slug);
    let start = points.first();

    let mut props = Map::new();
    props.insert("slug".into(), json!(slug));
    props.insert("title".into(), json!(meta.title));
    props.insert("country_code".into(), json!(meta.country_code));
    props.insert("country".into(), json!(meta.country));
    props.insert("province_code".into(), json!(meta.province_code));
    props.insert("province".into(), json!(meta.province));
    props.insert("region".into(), json!(meta.region));
    props.insert("direction".into(), json!(meta.direction));
    props.insert("subtitle".into(), json!(""));
    props.insert("activity".into(), json!("ski_tour"));
    props.insert("difficulty".into(), json!(""));
    props.insert("cover".into(), json!(format!("./photos/{}/cover.jpg", slug)));
    props.insert("page".into(), json!(format!("./tours/{}.html", slug)));
    props.insert("gpx".into(), json!(format!("./tracks/{}.gpx", slug)));
    props.insert("start_lon".into(), json!(start.map(|p| p.lon)));
    props.insert("start_lat".into(), json!(start.map(|p| p.lat)));
    props.insert("distance_km".into(), json!(round_to(track_distance_km(points), 2)));

    if let Value::Object(stats) = json!(ElevationStats::from_points(points)) {
        props.extend(stats);
    }

    if let Some(overview) = overview {
        for key in OVERVIEW_OVERRIDES {
            let value = overview.get(*key);
            if !is_blank(value) {
                props.insert(key.to_string(), value.cloned().unwrap_or(Value::Null));
            }
        }
    }

    if is_blank(props.get("vert_m")) {
        if let Some(gain) = props.get("gain_m").and_then(Value::as_f64) {
            props.insert("vert_m".into(), json!(gain as i64));
        }
    }

    let coordinates: Vec<Value> = points.iter().map(|p| json!([p.lon, p.lat, p.ele])).collect();
    json!({
        "type": "Feature",
        "properties": props,
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
    })
}

/// Writes one single-feature collection per GPX track, skipping files whose
/// content would not change.
pub fn build_details(layout: &SiteLayout) -> Result<DetailReport> {
    let tracks_dir = layout.tracks_dir();
    let files = list_files(&tracks_dir, "gpx")?;
    if files.is_empty() {
        return Err(BuildError::NoInputs {
            dir: tracks_dir,
            extension: "gpx".to_string(),
        });
    }

    let overview = load_overview_by_slug(&layout.overview_path());
    let mut report = DetailReport::default();

    for path in &files {
        let slug = slug_from_path(path);
        let Some(points) = read_track_or_skip(path, &slug)? else {
            continue;
        };
        let feature = detail_feature(&slug, &points, overview.get(&slug));
        let collection = json!({ "type": "FeatureCollection", "features": [feature] });

        let out_path = layout.detail_path(&slug);
        if write_if_changed(&out_path, &to_pretty_json(&out_path, &collection)?)? {
            log::debug!("Wrote {}", out_path.display());
            report.built += 1;
        } else {
            report.unchanged += 1;
        }
    }

    log::info!(
        "Detail files built/updated: {}, unchanged: {}, in {}",
        report.built,
        report.unchanged,
        layout.detail_dir().display()
    );
    Ok(report)
}
