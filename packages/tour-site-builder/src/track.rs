use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geo_types::Coord;
use gpx::errors::GpxError;
use gpx::Waypoint;

use crate::error::{BuildError, Result};

/// One recorded position; `ele` is metres above sea level when present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub lon: f64,
    pub lat: f64,
    pub ele: Option<f64>,
}

impl TrackPoint {
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

impl From<&Waypoint> for TrackPoint {
    fn from(waypoint: &Waypoint) -> Self {
        let point = waypoint.point();
        TrackPoint {
            lon: point.x(),
            lat: point.y(),
            ele: waypoint.elevation.filter(|e| e.is_finite()),
        }
    }
}

/// All track points in document order, or the route points when the file
/// has no tracks.
pub fn parse_track<R: Read>(reader: R) -> std::result::Result<Vec<TrackPoint>, GpxError> {
    let data = gpx::read(reader)?;
    let points: Vec<TrackPoint> = data
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(TrackPoint::from)
        .collect();
    if !points.is_empty() {
        return Ok(points);
    }
    Ok(data
        .routes
        .iter()
        .flat_map(|route| route.points.iter())
        .map(TrackPoint::from)
        .collect())
}

pub fn read_track(path: &Path) -> Result<Vec<TrackPoint>> {
    let file = File::open(path).map_err(|err| BuildError::io(path, err))?;
    parse_track(BufReader::new(file)).map_err(|source| BuildError::Gpx {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a track, logging and returning `None` when it has fewer than two
/// points.
pub fn read_track_or_skip(path: &Path, slug: &str) -> Result<Option<Vec<TrackPoint>>> {
    let points = read_track(path)?;
    if points.len() < 2 {
        log::info!("Skipping {}: not enough points", slug);
        return Ok(None);
    }
    Ok(Some(points))
}
