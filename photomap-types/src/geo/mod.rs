//! Geometries in geographic coordinates (see [`GeoPoint`]) and the Web Mercator projection used to
//! place them on a screen.

mod datum;
mod point;
mod web_mercator;

pub use datum::Datum;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
pub use web_mercator::WebMercator;
