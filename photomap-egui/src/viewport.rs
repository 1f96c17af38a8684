use photomap::photomap_types::{GeoPoint, GeoPoint2d, NewGeoPoint, Point2, Size, WebMercator};

/// Size of a map tile in pixels at integer zoom levels.
const TILE_SIZE: f64 = 512.0;
const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 22.0;

/// Camera of the egui engine: what part of the world is visible and how large it is on screen.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    center: GeoPoint2d,
    zoom: f64,
    size: Size,
    projection: WebMercator,
}

impl Viewport {
    /// Creates a viewport looking at `center`.
    pub fn new(center: GeoPoint2d, zoom: f64, size: Size) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            projection: WebMercator::default(),
        }
    }

    /// Center of the viewport.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Size of the viewport in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Changes the size, keeping the center.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Moves the camera to the point.
    pub fn set_center(&mut self, center: GeoPoint2d) {
        self.center = clamp_lat(center);
    }

    /// Meters per pixel at the current zoom.
    pub fn resolution(&self) -> f64 {
        self.projection.datum().equator_length() / (TILE_SIZE * 2f64.powf(self.zoom))
    }

    /// Position of the point on screen, relative to the top left corner of the viewport.
    pub fn to_screen(&self, point: &GeoPoint2d) -> Option<Point2> {
        let point = self.projection.project(point)?;
        let center = self.projection.project(&self.center)?;
        let resolution = self.resolution();

        Some(Point2::new(
            self.size.half_width() + (point.x() - center.x()) / resolution,
            self.size.half_height() - (point.y() - center.y()) / resolution,
        ))
    }

    /// Geographic position of the screen pixel.
    pub fn to_geo(&self, screen: Point2) -> Option<GeoPoint2d> {
        let center = self.projection.project(&self.center)?;
        let resolution = self.resolution();
        let projected = Point2::new(
            center.x() + (screen.x() - self.size.half_width()) * resolution,
            center.y() - (screen.y() - self.size.half_height()) * resolution,
        );

        Some(self.projection.unproject(&projected))
    }

    /// Moves the map content by the given number of pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let target = Point2::new(self.size.half_width() - dx, self.size.half_height() - dy);
        if let Some(center) = self.to_geo(target) {
            self.set_center(center);
        }
    }

    /// Changes the zoom level by `delta`, keeping the point under `anchor` in place.
    pub fn zoom_by(&mut self, delta: f64, anchor: Point2) {
        let before = self.to_geo(anchor);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);

        if let Some(after) = before.and_then(|point| self.to_screen(&point)) {
            self.pan(anchor.x() - after.x(), anchor.y() - after.y());
        }
    }
}

fn clamp_lat(point: GeoPoint2d) -> GeoPoint2d {
    let lat = point
        .lat()
        .clamp(-WebMercator::MAX_LAT, WebMercator::MAX_LAT);
    let lon = match point.lon() {
        lon if (-180.0..=180.0).contains(&lon) => lon,
        lon => (lon + 180.0).rem_euclid(360.0) - 180.0,
    };
    GeoPoint2d::latlon(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use photomap::photomap_types::lonlat;

    fn viewport() -> Viewport {
        Viewport::new(lonlat!(13.59, 46.81), 16.0, Size::new(800.0, 600.0))
    }

    #[test]
    fn center_is_in_the_middle() {
        let viewport = viewport();
        let screen = viewport.to_screen(&viewport.center()).unwrap();
        assert_relative_eq!(screen.x(), 400.0, epsilon = 1e-6);
        assert_relative_eq!(screen.y(), 300.0, epsilon = 1e-6);
    }

    #[test]
    fn north_east_is_up_right() {
        let viewport = viewport();
        let screen = viewport.to_screen(&lonlat!(13.591, 46.811)).unwrap();
        assert!(screen.x() > 400.0);
        assert!(screen.y() < 300.0);
    }

    #[test]
    fn screen_round_trip() {
        let viewport = viewport();
        let point = lonlat!(13.5951, 46.8102);
        let screen = viewport.to_screen(&point).unwrap();
        let restored = viewport.to_geo(screen).unwrap();
        assert_relative_eq!(restored.lon(), point.lon(), epsilon = 1e-9);
        assert_relative_eq!(restored.lat(), point.lat(), epsilon = 1e-9);
    }

    #[test]
    fn zooming_in_doubles_distances() {
        let mut viewport = viewport();
        let point = lonlat!(13.591, 46.81);
        let before = viewport.to_screen(&point).unwrap().x() - 400.0;

        viewport.zoom_by(1.0, Point2::new(400.0, 300.0));
        let after = viewport.to_screen(&point).unwrap().x() - 400.0;
        assert_relative_eq!(after, before * 2.0, epsilon = 1e-6);
    }

    #[test]
    fn zoom_keeps_anchor_in_place() {
        let mut viewport = viewport();
        let anchor = Point2::new(100.0, 50.0);
        let under_anchor = viewport.to_geo(anchor).unwrap();

        viewport.zoom_by(1.5, anchor);
        let screen = viewport.to_screen(&under_anchor).unwrap();
        assert_relative_eq!(screen.x(), anchor.x(), epsilon = 1e-6);
        assert_relative_eq!(screen.y(), anchor.y(), epsilon = 1e-6);
    }

    #[test]
    fn pan_moves_content_with_pointer() {
        let mut viewport = viewport();
        let point = lonlat!(13.592, 46.809);
        let before = viewport.to_screen(&point).unwrap();

        viewport.pan(30.0, -20.0);
        let after = viewport.to_screen(&point).unwrap();
        assert_relative_eq!(after.x() - before.x(), 30.0, epsilon = 1e-6);
        assert_relative_eq!(after.y() - before.y(), -20.0, epsilon = 1e-6);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = viewport();
        viewport.zoom_by(100.0, Point2::new(0.0, 0.0));
        assert_eq!(viewport.zoom(), 22.0);
    }
}
