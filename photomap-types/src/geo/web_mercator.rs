use crate::cartesian::Point2;
use crate::geo::datum::Datum;
use crate::geo::point::{GeoPoint, GeoPoint2d, NewGeoPoint};

/// Spherical Web Mercator projection (EPSG:3857). Projected coordinates are in meters.
#[derive(Debug, Copy, Clone, Default)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Latitude beyond which the projection is clamped, in degrees.
    pub const MAX_LAT: f64 = 85.051_128_779_806_59;

    /// Creates a projection for the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }

    /// Datum of the projection.
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Projects a geographic point. Returns `None` if the result is not finite (poles).
    pub fn project(&self, input: &impl GeoPoint<Num = f64>) -> Option<Point2> {
        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor()
            * (std::f64::consts::FRAC_PI_4 + input.lat_rad() / 2.0)
                .tan()
                .ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2::new(x, y))
        } else {
            None
        }
    }

    /// Converts projected meters back into degrees.
    pub fn unproject(&self, input: &Point2) -> GeoPoint2d {
        let lat = std::f64::consts::FRAC_PI_2
            - 2.0 * (-input.y() / self.datum.semimajor()).exp().atan();
        let lon = input.x() / self.datum.semimajor();

        GeoPoint2d::latlon(lat.to_degrees(), lon.to_degrees())
    }
}
