//! Tour data model for the ski touring guide.
//!
//! The overview data file is a GeoJSON `FeatureCollection` whose features
//! carry loosely-typed properties written by hand or by the site builder.
//! Everything here is lenient: absent or malformed optional data degrades to
//! `None` instead of failing the whole document.

mod bounds;
mod direction;
mod error;
mod escape;
mod feature;
mod geometry;
mod properties;

pub use bounds::{bounds, Bounds};
pub use direction::Direction;
pub use error::ModelError;
pub use escape::escape_html;
pub use feature::{FeatureCollection, TourFeature};
pub use geometry::{Position, TourGeometry};
pub use properties::{format_number, text_of, TourProperties, LEGACY_DIRECTION_FIELD};
