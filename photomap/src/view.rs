use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::config::MapConfig;
use crate::engine::{Container, EngineEvent, MapEngine};
use crate::error::PhotomapError;
use crate::feature::FeatureCollection;
use crate::locate_control::LocateControl;
use crate::marker_layer::{MarkerLayer, MarkerStyle};
use crate::ready::ReadySignal;
use crate::route_layer::RouteLayer;
use crate::scene::MapScene;

/// Lifecycle of a [`MapView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Engine is constructed but has not reported that it is ready.
    Loading,
    /// Markers, route and controls are attached.
    Ready,
    /// Engine is destroyed. Nothing happens after this.
    Destroyed,
}

/// The map page: one engine bound to one container, with photo markers, the route and the
/// geolocation control attached once the engine is ready.
///
/// The view owns the engine. Dropping the view (or calling [`MapView::unmount`]) releases everything
/// that was attached and destroys the engine.
pub struct MapView<E: MapEngine + 'static> {
    scene: MapScene<E>,
    ready: ReadySignal<MapScene<E>>,
    lifecycle: Lifecycle,
}

impl<E: MapEngine + 'static> MapView<E> {
    /// Constructs the engine in the container and schedules loading of the map contents.
    pub fn mount(
        container: Container,
        config: &MapConfig,
        features: Arc<FeatureCollection>,
    ) -> Result<Self, PhotomapError> {
        let engine = E::construct(&container, config.engine_options()?)?;
        log::info!(
            "Map mounted in `{}` with {} features",
            container.id(),
            features.len()
        );

        Ok(Self::with_engine(engine, container, config, features))
    }

    /// Creates a view around an already constructed engine.
    pub fn with_engine(
        engine: E,
        container: Container,
        config: &MapConfig,
        features: Arc<FeatureCollection>,
    ) -> Self {
        let markers = MarkerLayer::new(features.clone(), MarkerStyle::from(config));
        let route = RouteLayer::from_config(features, config);
        let locate = LocateControl::default();

        let mut ready = ReadySignal::new();
        ready.subscribe("resize", |scene: &mut MapScene<E>| {
            scene.resize();
            Ok(())
        });
        ready.subscribe("markers", move |scene: &mut MapScene<E>| markers.load(scene));
        ready.subscribe("route", move |scene: &mut MapScene<E>| route.load(scene));
        ready.subscribe("locate", move |scene: &mut MapScene<E>| {
            locate.attach(scene)?;
            Ok(())
        });

        Self {
            scene: MapScene::new(engine, container),
            ready,
            lifecycle: Lifecycle::Loading,
        }
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The scene with the engine and everything attached to it.
    pub fn scene(&self) -> &MapScene<E> {
        &self.scene
    }

    /// Mutable access to the scene.
    pub fn scene_mut(&mut self) -> &mut MapScene<E> {
        &mut self.scene
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        self.scene.engine()
    }

    /// Mutable access to the engine, e.g. to draw it.
    pub fn engine_mut(&mut self) -> &mut E {
        self.scene.engine_mut()
    }

    /// Takes the pending engine events and handles them in order.
    pub fn pump(&mut self) -> Result<(), PhotomapError> {
        if self.lifecycle == Lifecycle::Destroyed {
            return Ok(());
        }

        for event in self.scene.engine_mut().drain_events() {
            self.handle_event(event)?;
        }

        Ok(())
    }

    /// Handles one engine event.
    pub fn handle_event(&mut self, event: EngineEvent) -> Result<(), PhotomapError> {
        match (self.lifecycle, event) {
            (Lifecycle::Destroyed, event) => {
                log::debug!("Ignoring {event:?}: the map is destroyed");
            }
            (_, EngineEvent::Ready) => {
                if self.ready.fire(&mut self.scene)? {
                    self.lifecycle = Lifecycle::Ready;
                    log::info!("Map is ready");
                }
            }
            (Lifecycle::Loading, event) => {
                log::debug!("Ignoring {event:?}: the map is not ready yet");
            }
            (Lifecycle::Ready, EngineEvent::MarkerClicked(marker)) => {
                if self.scene.open_popup(marker).is_none() {
                    log::debug!("Marker {marker:?} has no popup");
                }
            }
            (Lifecycle::Ready, EngineEvent::PopupClosed(popup)) => {
                self.scene.popup_closed(popup);
            }
        }

        Ok(())
    }

    /// Releases everything attached to the engine and destroys it. Does nothing the second time.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }

        self.ready.cancel();
        self.scene.dispose();
        self.lifecycle = Lifecycle::Destroyed;
        log::info!("Map in `{}` unmounted", self.scene.container().id());
    }
}

impl<E: MapEngine + 'static> Debug for MapView<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("container", self.scene.container())
            .field("lifecycle", &self.lifecycle)
            .field("handles", &self.scene.handles().len())
            .finish()
    }
}

impl<E: MapEngine + 'static> Drop for MapView<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}
