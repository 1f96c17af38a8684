use num_traits::Float;
use serde::{Deserialize, Serialize};

/// A point on the surface of the Earth given in degrees.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// Geo point that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude (GeoJSON order).
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// 2d point on the surface of the Earth.
///
/// Serialized as a `[lon, lat]` pair, the same way GeoJSON positions are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint2d {
    lon: f64,
    lat: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lon, lat }
    }
}

impl GeoPoint2d {
    /// Coordinates in GeoJSON order: `[lon, lat]`.
    pub fn to_lonlat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for GeoPoint2d {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<GeoPoint2d> for [f64; 2] {
    fn from(value: GeoPoint2d) -> Self {
        value.to_lonlat()
    }
}

/// Creates a new [`GeoPoint2d`] from longitude and latitude values (in degrees).
///
/// ```
/// use photomap_types::{lonlat, GeoPoint};
///
/// let point = lonlat!(13.59, 46.81);
/// assert_eq!(point.lat(), 46.81);
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::lonlat($lon, $lat)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_from_lonlat_pair() {
        let point = GeoPoint2d::from([13.5, 46.8]);
        assert_eq!(point.lon(), 13.5);
        assert_eq!(point.lat(), 46.8);
        assert_eq!(<[f64; 2]>::from(point), [13.5, 46.8]);
    }

    #[test]
    fn macro_takes_longitude_first() {
        let point = crate::lonlat!(1.0, 2.0);
        assert_eq!(point, GeoPoint2d::latlon(2.0, 1.0));
    }
}
