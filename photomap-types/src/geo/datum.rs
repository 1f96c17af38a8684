/// Ellipsoid parameters of a geodetic datum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984, the datum GPS and GeoJSON coordinates are given in.
    pub const WGS84: Self = Datum {
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Semi-major axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening of the ellipsoid.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Length of the equator in meters.
    pub fn equator_length(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.semimajor
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}
