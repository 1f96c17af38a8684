//! Conversions between GeoJSON positions and [`GeoPoint2d`].

use geojson::Position;

use crate::error::PhotomapTypesError;
use crate::geo::{GeoPoint, GeoPoint2d, NewGeoPoint};

impl TryFrom<&Position> for GeoPoint2d {
    type Error = PhotomapTypesError;

    fn try_from(value: &Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            return Err(PhotomapTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ));
        }

        Ok(GeoPoint2d::lonlat(value[0], value[1]))
    }
}

/// Converts the point into a GeoJSON position (`[lon, lat]`).
pub fn to_position(point: &impl GeoPoint<Num = f64>) -> Position {
    vec![point.lon(), point.lat()]
}

/// Builds a GeoJSON `LineString` value from a sequence of points.
pub fn line_string<'a>(points: impl IntoIterator<Item = &'a GeoPoint2d>) -> geojson::Value {
    geojson::Value::LineString(points.into_iter().map(to_position).collect())
}
