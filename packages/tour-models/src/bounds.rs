use geo::BoundingRect;
use geo_types::{Geometry, GeometryCollection, Rect};

use crate::TourFeature;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// `[[west, south], [east, north]]`, the shape map libraries take.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lon, self.min_lat], [self.max_lon, self.max_lat]]
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Bounds {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        }
    }
}

/// Bounding box over every feature with usable geometry. Features without
/// geometry or coordinates are skipped; `None` when nothing remains.
pub fn bounds<'a, I>(features: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a TourFeature>,
{
    let geometries: Vec<Geometry<f64>> = features
        .into_iter()
        .filter_map(|f| f.geometry.as_ref()?.to_geo())
        .collect();
    if geometries.is_empty() {
        return None;
    }
    GeometryCollection(geometries).bounding_rect().map(Bounds::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TourGeometry;

    fn feature(geometry: Option<TourGeometry>) -> TourFeature {
        TourFeature {
            geometry,
            ..Default::default()
        }
    }

    #[test]
    fn test_bounds_over_mixed_geometries() {
        let features = vec![
            feature(Some(TourGeometry::LineString(vec![
                vec![-123.2, 50.0, 900.0],
                vec![-122.9, 50.3, 2200.0],
            ]))),
            feature(Some(TourGeometry::Point(vec![-115.4, 51.0]))),
            feature(None),
        ];
        let b = bounds(&features).unwrap();
        assert_eq!(b.corners(), [[-123.2, 50.0], [-115.4, 51.0]]);
    }

    #[test]
    fn test_empty_and_degenerate_sets_have_no_bounds() {
        assert!(bounds(&Vec::<TourFeature>::new()).is_none());
        let degenerate = vec![
            feature(None),
            feature(Some(TourGeometry::LineString(vec![]))),
            feature(Some(TourGeometry::Point(vec![5.0]))),
        ];
        assert!(bounds(&degenerate).is_none());
    }

    #[test]
    fn test_single_point_bounds() {
        let features = vec![feature(Some(TourGeometry::Point(vec![7.0, 46.0])))];
        assert_eq!(bounds(&features).unwrap().corners(), [[7.0, 46.0], [7.0, 46.0]]);
    }
}
