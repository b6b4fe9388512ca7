use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPoint, Point};
use serde::{Deserialize, Serialize};

/// GeoJSON position: `[lon, lat]` or `[lon, lat, ele]`.
pub type Position = Vec<f64>;

// Only the geometry types tours are drawn with. Anything else is treated
// as missing geometry by the feature parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum TourGeometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
}

impl TourGeometry {
    /// Converts to a `geo` geometry, dropping positions that are not at
    /// least two finite numbers. Returns `None` when nothing usable remains.
    pub fn to_geo(&self) -> Option<Geometry<f64>> {
        match self {
            TourGeometry::Point(p) => to_coord(p).map(|c| Geometry::Point(Point::from(c))),
            TourGeometry::MultiPoint(ps) => {
                let points: Vec<Point<f64>> =
                    ps.iter().filter_map(to_coord).map(Point::from).collect();
                (!points.is_empty()).then(|| Geometry::MultiPoint(MultiPoint::new(points)))
            }
            TourGeometry::LineString(ps) => {
                let line = to_line(ps);
                (!line.0.is_empty()).then(|| Geometry::LineString(line))
            }
            TourGeometry::MultiLineString(lines) => {
                let lines: Vec<LineString<f64>> = lines
                    .iter()
                    .map(|ps| to_line(ps))
                    .filter(|line| !line.0.is_empty())
                    .collect();
                (!lines.is_empty()).then(|| Geometry::MultiLineString(MultiLineString::new(lines)))
            }
        }
    }
}

fn to_coord(position: &Position) -> Option<Coord<f64>> {
    match position.as_slice() {
        [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn to_line(positions: &[Position]) -> LineString<f64> {
    LineString::new(positions.iter().filter_map(to_coord).collect())
}
