//! `tours.geojson`: one simplified line per GPX track, read by the browse
//! page.

use serde_json::{json, Value};

use crate::error::{BuildError, Result};
use crate::layout::{list_files, slug_from_path, to_pretty_json, write_text, SiteLayout};
use crate::slug::title_from_slug;
use crate::stats::{downsample, round_to, track_distance_km, OVERVIEW_MAX_POINTS};
use crate::track::{read_track_or_skip, TrackPoint};

pub fn overview_feature(slug: &str, points: &[TrackPoint]) -> Value {
    let coordinates: Vec<[f64; 2]> = downsample(points, OVERVIEW_MAX_POINTS)
        .iter()
        .map(|p| [p.lon, p.lat])
        .collect();
    let start = points.first();

    json!({
        "type": "Feature",
        "properties": {
            "slug": slug,
            "title": title_from_slug(slug),
            "region": "",
            "subtitle": "",
            "activity": "ski_tour",
            "difficulty": "moderate",
            "distance_km": round_to(track_distance_km(points), 2),
            "vert_m": null,
            "time_h": null,
            "cover": format!("./photos/{}/cover.jpg", slug),
            "page": format!("./tours/{}.html", slug),
            "gpx": format!("./tracks/{}.gpx", slug),
            "start_lat": start.map(|p| p.lat),
            "start_lon": start.map(|p| p.lon),
        },
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
    })
}

/// Rebuilds the overview file from every GPX track. Returns the number of
/// tours written.
pub fn build_overview(layout: &SiteLayout) -> Result<usize> {
    let tracks_dir = layout.tracks_dir();
    let files = list_files(&tracks_dir, "gpx")?;
    if files.is_empty() {
        return Err(BuildError::NoInputs {
            dir: tracks_dir,
            extension: "gpx".to_string(),
        });
    }

    let mut features = Vec::new();
    for path in &files {
        let slug = slug_from_path(path);
        let Some(points) = read_track_or_skip(path, &slug)? else {
            continue;
        };
        features.push(overview_feature(&slug, &points));
    }

    let out_path = layout.overview_path();
    let count = features.len();
    let collection = json!({ "type": "FeatureCollection", "features": features });
    write_text(&out_path, &to_pretty_json(&out_path, &collection)?)?;
    log::info!("Wrote {} with {} tours", out_path.display(), count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::fixtures::track_gpx;
    use std::fs;

    fn points(n: usize) -> Vec<TrackPoint> {
        (0..n)
            .map(|i| TrackPoint {
                lon: -123.0 + i as f64 * 0.0001,
                lat: 50.0,
                ele: None,
            })
            .collect()
    }

    #[test]
    fn test_overview_feature_properties() {
        let feature = overview_feature("brew-hut", &points(3));
        let props = &feature["properties"];
        assert_eq!(props["title"], "Brew Hut");
        assert_eq!(props["activity"], "ski_tour");
        assert_eq!(props["difficulty"], "moderate");
        assert_eq!(props["page"], "./tours/brew-hut.html");
        assert_eq!(props["gpx"], "./tracks/brew-hut.gpx");
        assert_eq!(props["cover"], "./photos/brew-hut/cover.jpg");
        assert!(props["vert_m"].is_null());
        assert_eq!(props["start_lon"], -123.0);
        assert_eq!(feature["geometry"]["coordinates"][0], json!([-123.0, 50.0]));
    }

    #[test]
    fn test_long_tracks_are_downsampled() {
        let feature = overview_feature("long", &points(2000));
        let coords = feature["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(coords.len(), OVERVIEW_MAX_POINTS);
    }

    #[test]
    fn test_build_overview_skips_short_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SiteLayout::new(dir.path());
        fs::create_dir_all(layout.tracks_dir()).unwrap();
        fs::write(
            layout.tracks_dir().join("b_tour.gpx"),
            track_gpx(&[(-122.9, 50.1, None), (-122.8, 50.2, None)]),
        )
        .unwrap();
        fs::write(
            layout.tracks_dir().join("a_single.gpx"),
            track_gpx(&[(-122.9, 50.1, None)]),
        )
        .unwrap();

        assert_eq!(build_overview(&layout).unwrap(), 1);
        let written: Value =
            serde_json::from_str(&fs::read_to_string(layout.overview_path()).unwrap()).unwrap();
        assert_eq!(written["features"][0]["properties"]["slug"], "b_tour");
    }

    #[test]
    fn test_build_overview_needs_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SiteLayout::new(dir.path());
        fs::create_dir_all(layout.tracks_dir()).unwrap();
        assert!(matches!(build_overview(&layout), Err(BuildError::NoInputs { .. })));
    }
}
