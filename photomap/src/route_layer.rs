use std::sync::Arc;

use photomap_types::GeoPoint2d;

use crate::config::MapConfig;
use crate::engine::{LayerSpec, LineLayout, LinePaint, MapEngine};
use crate::error::PhotomapError;
use crate::feature::FeatureCollection;
use crate::scene::MapScene;

/// Id of the route layer in the engine.
pub const ROUTE_LAYER_ID: &str = "route";

/// Closed line through all features in their order.
pub struct RouteLayer {
    features: Arc<FeatureCollection>,
    layout: LineLayout,
    paint: LinePaint,
}

impl RouteLayer {
    /// Creates a route with the given styling.
    pub fn new(features: Arc<FeatureCollection>, layout: LineLayout, paint: LinePaint) -> Self {
        Self {
            features,
            layout,
            paint,
        }
    }

    /// Creates a route styled by the configuration.
    pub fn from_config(features: Arc<FeatureCollection>, config: &MapConfig) -> Self {
        Self::new(
            features,
            LineLayout::default(),
            LinePaint {
                line_color: config.route_color,
                line_width: config.route_width,
                line_border_color: config.route_border_color,
                line_border_width: config.route_border_width,
            },
        )
    }

    /// Points of the route: every feature, then the first one again.
    ///
    /// An empty collection gives an empty line and a single feature gives that point twice.
    pub fn polyline(&self) -> Vec<GeoPoint2d> {
        closed_polyline(self.features.iter().map(|f| f.coordinates))
    }

    /// Adds the route layer unless the scene already has one.
    pub fn load<E: MapEngine>(&self, scene: &mut MapScene<E>) -> Result<(), PhotomapError> {
        if scene.has_layer(ROUTE_LAYER_ID) {
            log::debug!("Route layer is already present");
            return Ok(());
        }

        let points = self.polyline();
        log::info!("Adding route with {} points", points.len());
        scene.add_layer(LayerSpec::line(
            ROUTE_LAYER_ID,
            &points,
            self.layout,
            self.paint,
        ))
    }
}

/// Appends the first point to the end of the sequence.
pub fn closed_polyline(points: impl IntoIterator<Item = GeoPoint2d>) -> Vec<GeoPoint2d> {
    let mut line: Vec<GeoPoint2d> = points.into_iter().collect();
    if let Some(first) = line.first().copied() {
        line.push(first);
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Container, HeadlessEngine};
    use crate::feature::Feature;
    use photomap_types::{lonlat, Size};

    fn route(points: &[[f64; 2]]) -> RouteLayer {
        let features = points
            .iter()
            .map(|&p| Feature::new(GeoPoint2d::from(p), "t", "d"))
            .collect::<Vec<_>>();
        RouteLayer::from_config(
            Arc::new(FeatureCollection::new(features)),
            &MapConfig::default(),
        )
    }

    fn scene() -> MapScene<HeadlessEngine> {
        let container = Container::new("map", Size::new(100.0, 100.0));
        let mut config = MapConfig::default();
        config.access_token = "test".into();
        let engine = HeadlessEngine::new(&container, config.engine_options().unwrap()).unwrap();
        MapScene::new(engine, container)
    }

    #[test]
    fn route_is_closed() {
        let route = route(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(
            route.polyline(),
            vec![
                lonlat!(0.0, 0.0),
                lonlat!(1.0, 1.0),
                lonlat!(2.0, 2.0),
                lonlat!(0.0, 0.0)
            ]
        );
    }

    #[test]
    fn route_has_one_point_more_than_features() {
        for n in 1..6 {
            let points: Vec<[f64; 2]> = (0..n).map(|i| [i as f64, -(i as f64)]).collect();
            let line = route(&points).polyline();
            assert_eq!(line.len(), n + 1);
            assert_eq!(line[n], GeoPoint2d::from(points[0]));
        }
    }

    #[test]
    fn degenerate_routes() {
        assert!(route(&[]).polyline().is_empty());
        assert_eq!(
            route(&[[5.0, 6.0]]).polyline(),
            vec![lonlat!(5.0, 6.0), lonlat!(5.0, 6.0)]
        );
    }

    #[test]
    fn load_is_idempotent() {
        let mut scene = scene();
        let route = route(&[[0.0, 0.0], [1.0, 1.0]]);

        route.load(&mut scene).unwrap();
        route.load(&mut scene).unwrap();

        assert_eq!(scene.engine().layers().len(), 1);
        assert_eq!(scene.handles().len(), 1);

        let layer = scene.engine().get_layer(ROUTE_LAYER_ID).expect("route added");
        assert_eq!(layer.paint.line_width, 8.0);
        assert_eq!(layer.line_points().map(|p| p.len()), Some(3));
    }
}
