use crate::engine::{
    Container, Control, ControlId, LayerSpec, MapEngine, Marker, MarkerId, Popup, PopupId,
};
use crate::error::PhotomapError;
use crate::handles::{Handle, HandleSet};
use crate::popup::PopupSlot;

/// An engine together with everything attached to it.
///
/// Layers, markers and controls must be attached through the scene rather than the engine directly,
/// so that they are recorded and released when the map is torn down.
pub struct MapScene<E> {
    engine: E,
    container: Container,
    handles: HandleSet,
    popups: PopupSlot,
    is_disposed: bool,
}

impl<E: MapEngine> MapScene<E> {
    /// Wraps a freshly constructed engine.
    pub fn new(engine: E, container: Container) -> Self {
        Self {
            engine,
            container,
            handles: HandleSet::default(),
            popups: PopupSlot::default(),
            is_disposed: false,
        }
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable reference to the engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Container the engine is bound to.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Everything attached so far.
    pub fn handles(&self) -> &HandleSet {
        &self.handles
    }

    /// Fits the engine to its container.
    pub fn resize(&mut self) {
        log::debug!("Resizing map in container `{}`", self.container.id());
        self.engine.resize();
    }

    /// Returns true once the map was torn down.
    pub fn is_disposed(&self) -> bool {
        self.is_disposed
    }

    fn ensure_live(&self) -> Result<(), PhotomapError> {
        if self.is_disposed {
            log::debug!("Scene in `{}` is already disposed", self.container.id());
            return Err(PhotomapError::EngineRemoved);
        }

        Ok(())
    }

    /// Attaches a marker, optionally binding a popup that is shown when the marker is clicked.
    pub fn add_marker(
        &mut self,
        marker: Marker,
        popup: Option<Popup>,
    ) -> Result<MarkerId, PhotomapError> {
        self.ensure_live()?;
        let id = self.engine.add_marker(marker);
        self.handles.push(Handle::Marker(id));
        if let Some(popup) = popup {
            self.popups.bind(id, popup);
        }

        Ok(id)
    }

    /// Returns true if the engine has a layer with the id.
    pub fn has_layer(&self, id: &str) -> bool {
        self.engine.get_layer(id).is_some()
    }

    /// Adds a layer to the engine.
    pub fn add_layer(&mut self, spec: LayerSpec) -> Result<(), PhotomapError> {
        self.ensure_live()?;
        let id = spec.id.clone();
        self.engine.add_layer(spec)?;
        self.handles.push(Handle::Layer(id));
        Ok(())
    }

    /// Adds a UI control to the engine.
    pub fn add_control(&mut self, control: Control) -> Result<ControlId, PhotomapError> {
        self.ensure_live()?;
        let id = self.engine.add_control(control);
        self.handles.push(Handle::Control(id));
        Ok(id)
    }

    /// Shows the popup bound to the marker, closing the visible one first.
    pub fn open_popup(&mut self, marker: MarkerId) -> Option<PopupId> {
        self.popups.open(marker, &mut self.engine)
    }

    /// Closes the visible popup, if any.
    pub fn close_popup(&mut self) {
        self.popups.close(&mut self.engine);
    }

    /// Marks the popup as closed by the engine.
    pub fn popup_closed(&mut self, popup: PopupId) {
        self.popups.forget(popup);
    }

    /// Marker and popup that are currently shown.
    pub fn visible_popup(&self) -> Option<(MarkerId, PopupId)> {
        self.popups.visible()
    }

    /// Popup bound to the marker.
    pub fn bound_popup(&self, marker: MarkerId) -> Option<&Popup> {
        self.popups.bound(marker)
    }

    pub(crate) fn dispose(&mut self) {
        self.popups.close(&mut self.engine);
        self.popups = PopupSlot::default();
        self.handles.release_all(&mut self.engine);
        self.engine.remove();
        self.is_disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::engine::{HeadlessEngine, LinePaint, MarkerElement, MarkerFill};
    use crate::Color;
    use assert_matches::assert_matches;
    use photomap_types::Size;

    fn scene() -> MapScene<HeadlessEngine> {
        let container = Container::new("map", Size::new(10.0, 10.0));
        let config = MapConfig {
            access_token: "test".into(),
            ..Default::default()
        };
        let engine = HeadlessEngine::new(&container, config.engine_options().unwrap()).unwrap();
        MapScene::new(engine, container)
    }

    fn marker() -> Marker {
        Marker::new(
            MarkerElement {
                label: None,
                fill: MarkerFill::Color(Color::BLACK),
                size_px: 10.0,
            },
            Default::default(),
        )
    }

    fn route() -> LayerSpec {
        LayerSpec::line(
            "route",
            &[],
            Default::default(),
            LinePaint {
                line_color: Color::ROUTE_GRAY,
                line_width: 8.0,
                line_border_color: None,
                line_border_width: None,
            },
        )
    }

    #[test]
    fn dispose_releases_everything() {
        let mut scene = scene();
        scene.add_marker(marker(), None).unwrap();
        scene.add_layer(route()).unwrap();
        assert_eq!(scene.handles().len(), 2);

        scene.dispose();
        assert!(scene.is_disposed());
        assert!(scene.handles().is_empty());
        assert!(scene.engine().is_removed());
    }

    #[test]
    fn nothing_is_recorded_after_dispose() {
        let mut scene = scene();
        scene.dispose();

        assert_matches!(
            scene.add_marker(marker(), None),
            Err(PhotomapError::EngineRemoved)
        );
        assert_matches!(
            scene.add_layer(route()),
            Err(PhotomapError::EngineRemoved)
        );
        assert_matches!(
            scene.add_control(Control::Geolocate {
                enable_high_accuracy: true,
                track_user_location: true,
                show_user_heading: true,
            }),
            Err(PhotomapError::EngineRemoved)
        );

        assert!(scene.handles().is_empty());
        assert_eq!(scene.engine().markers().count(), 0);
        assert!(scene.engine().controls().next().is_none());
    }
}
