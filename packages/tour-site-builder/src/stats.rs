use geo::{Distance, Haversine};
use geo_types::Point;
use serde::Serialize;

use crate::track::TrackPoint;

/// Points kept in the overview file per track.
pub const OVERVIEW_MAX_POINTS: usize = 450;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Great-circle distance along the track in kilometres, over the mean Earth
/// radius of 6371.0088 km.
pub fn track_distance_km(points: &[TrackPoint]) -> f64 {
    let metres: f64 = points
        .windows(2)
        .map(|pair| {
            Haversine::distance(Point::from(pair[0].coord()), Point::from(pair[1].coord()))
        })
        .sum();
    metres / 1000.0
}

/// Keeps both endpoints and evenly spaced points between them.
pub fn downsample<T: Clone>(items: &[T], max_points: usize) -> Vec<T> {
    let n = items.len();
    if n <= max_points || max_points < 2 {
        return items.to_vec();
    }
    let mut indices: Vec<usize> = (0..max_points - 1)
        .map(|i| i * (n - 1) / (max_points - 1))
        .collect();
    indices.push(n - 1);
    indices.dedup();
    indices.into_iter().map(|i| items[i].clone()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElevationStats {
    pub gain_m: Option<f64>,
    pub loss_m: Option<f64>,
    pub min_ele_m: Option<f64>,
    pub max_ele_m: Option<f64>,
    pub start_ele_m: Option<f64>,
    pub end_ele_m: Option<f64>,
}

impl ElevationStats {
    // Only points with an elevation count. Gain and loss sum the positive and
    // negative steps between consecutive elevations.
    pub fn from_points(points: &[TrackPoint]) -> Self {
        let eles: Vec<f64> = points.iter().filter_map(|p| p.ele).collect();
        let (Some(&first), Some(&last)) = (eles.first(), eles.last()) else {
            return ElevationStats::default();
        };
        if eles.len() < 2 {
            return ElevationStats {
                start_ele_m: Some(first),
                end_ele_m: Some(last),
                ..Default::default()
            };
        }

        let (gain, loss) = eles.windows(2).fold((0.0, 0.0), |(gain, loss), pair| {
            let step = pair[1] - pair[0];
            if step > 0.0 {
                (gain + step, loss)
            } else {
                (gain, loss - step)
            }
        });
        let min = eles.iter().copied().fold(f64::INFINITY, f64::min);
        let max = eles.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        ElevationStats {
            gain_m: Some(round_to(gain, 0)),
            loss_m: Some(round_to(loss, 0)),
            min_ele_m: Some(round_to(min, 1)),
            max_ele_m: Some(round_to(max, 1)),
            start_ele_m: Some(round_to(first, 1)),
            end_ele_m: Some(round_to(last, 1)),
        }
    }
}
