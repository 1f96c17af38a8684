//! Geographic and screen-space primitives shared by the `photomap` crates.
//!
//! Coordinates follow the GeoJSON convention: longitude first, latitude second.

pub mod cartesian;
pub mod error;
pub mod geo;
pub mod geojson;

pub use cartesian::{Point2, Size};
pub use geo::{Datum, GeoPoint, GeoPoint2d, NewGeoPoint, WebMercator};
