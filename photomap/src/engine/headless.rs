use std::collections::{BTreeMap, VecDeque};

use photomap_types::Size;

use super::{
    Container, Control, ControlId, EngineEvent, EngineOptions, LayerSpec, MapEngine, Marker,
    MarkerId, Popup, PopupId,
};
use crate::error::PhotomapError;

/// Engine that keeps the map contents in memory without drawing anything.
///
/// The engine reports [`EngineEvent::Ready`] right after construction. User interaction can be
/// simulated with [`HeadlessEngine::click_marker`] and [`HeadlessEngine::close_popup`].
#[derive(Debug)]
pub struct HeadlessEngine {
    container: Container,
    options: EngineOptions,
    size: Size,
    layers: Vec<LayerSpec>,
    markers: BTreeMap<MarkerId, Marker>,
    popups: BTreeMap<PopupId, (MarkerId, Popup)>,
    controls: BTreeMap<ControlId, Control>,
    events: VecDeque<EngineEvent>,
    next_id: u64,
    is_removed: bool,
}

impl HeadlessEngine {
    /// Creates an engine bound to the container.
    pub fn new(container: &Container, options: EngineOptions) -> Result<Self, PhotomapError> {
        let size = container.require_size()?;
        log::debug!(
            "Headless engine created in `{}` with style {}",
            container.id(),
            options.style
        );

        Ok(Self {
            container: container.clone(),
            options,
            size,
            layers: Vec::new(),
            markers: BTreeMap::new(),
            popups: BTreeMap::new(),
            controls: BTreeMap::new(),
            events: VecDeque::from([EngineEvent::Ready]),
            next_id: 1,
            is_removed: false,
        })
    }

    /// Options the engine was created with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Size the engine was last fitted to.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Changes the size of the container. The engine keeps its size until resized.
    pub fn set_container_size(&mut self, size: Size) {
        self.container.set_size(size);
    }

    /// All layers in the order they were added.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// All markers in the order they were added.
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &Marker)> + '_ {
        self.markers.iter().map(|(id, marker)| (*id, marker))
    }

    /// Popups currently shown, with the markers they are anchored to.
    pub fn popups(&self) -> impl Iterator<Item = (PopupId, MarkerId, &Popup)> + '_ {
        self.popups
            .iter()
            .map(|(id, (anchor, popup))| (*id, *anchor, popup))
    }

    /// All controls in the order they were added.
    pub fn controls(&self) -> impl Iterator<Item = (ControlId, Control)> + '_ {
        self.controls.iter().map(|(id, control)| (*id, *control))
    }

    /// Returns true after [`MapEngine::remove`] was called.
    pub fn is_removed(&self) -> bool {
        self.is_removed
    }

    /// Simulates a click on the marker.
    pub fn click_marker(&mut self, id: MarkerId) {
        if self.markers.contains_key(&id) {
            self.emit(EngineEvent::MarkerClicked(id));
        }
    }

    /// Simulates the user closing the popup.
    pub fn close_popup(&mut self, id: PopupId) {
        if self.popups.remove(&id).is_some() {
            self.emit(EngineEvent::PopupClosed(id));
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        if !self.is_removed {
            self.events.push_back(event);
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_alive(&self, operation: &str) -> bool {
        if self.is_removed {
            log::warn!("`{operation}` called on a removed engine");
        }

        !self.is_removed
    }
}

impl MapEngine for HeadlessEngine {
    fn construct(container: &Container, options: EngineOptions) -> Result<Self, PhotomapError> {
        Self::new(container, options)
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    fn resize(&mut self) {
        if let Some(size) = self.container.size() {
            self.size = size;
        }
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), PhotomapError> {
        if !self.check_alive("add_layer") {
            return Err(PhotomapError::EngineRemoved);
        }

        if self.layers.iter().any(|layer| layer.id == spec.id) {
            return Err(PhotomapError::Generic(format!(
                "layer `{}` already exists",
                spec.id
            )));
        }

        self.layers.push(spec);
        Ok(())
    }

    fn get_layer(&self, id: &str) -> Option<LayerSpec> {
        self.layers.iter().find(|layer| layer.id == id).cloned()
    }

    fn remove_layer(&mut self, id: &str) -> bool {
        let count = self.layers.len();
        self.layers.retain(|layer| layer.id != id);
        self.layers.len() != count
    }

    fn add_marker(&mut self, marker: Marker) -> MarkerId {
        let id = MarkerId::new(self.next_id());
        if self.check_alive("add_marker") {
            self.markers.insert(id, marker);
        }

        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
        self.popups.retain(|_, (anchor, _)| *anchor != id);
    }

    fn add_popup(&mut self, popup: Popup, anchor: MarkerId) -> PopupId {
        let id = PopupId::new(self.next_id());
        if self.check_alive("add_popup") {
            self.popups.insert(id, (anchor, popup));
        }

        id
    }

    fn remove_popup(&mut self, id: PopupId) {
        self.popups.remove(&id);
    }

    fn add_control(&mut self, control: Control) -> ControlId {
        let id = ControlId::new(self.next_id());
        if self.check_alive("add_control") {
            self.controls.insert(id, control);
        }

        id
    }

    fn remove_control(&mut self, id: ControlId) {
        self.controls.remove(&id);
    }

    fn remove(&mut self) {
        self.layers.clear();
        self.markers.clear();
        self.popups.clear();
        self.controls.clear();
        self.events.clear();
        self.is_removed = true;
        log::debug!("Headless engine in `{}` removed", self.container.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use assert_matches::assert_matches;

    fn options() -> EngineOptions {
        let mut config = MapConfig::default();
        config.access_token = "test".into();
        config.engine_options().unwrap()
    }

    #[test]
    fn detached_container_is_rejected() {
        assert_matches!(
            HeadlessEngine::new(&Container::detached("map"), options()),
            Err(PhotomapError::ContainerUnavailable(id)) if id == "map"
        );
    }

    #[test]
    fn ready_is_reported_once() {
        let container = Container::new("map", Size::new(10.0, 10.0));
        let mut engine = HeadlessEngine::new(&container, options()).unwrap();
        assert_eq!(engine.drain_events(), vec![EngineEvent::Ready]);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn resize_follows_container() {
        let container = Container::new("map", Size::new(10.0, 10.0));
        let mut engine = HeadlessEngine::new(&container, options()).unwrap();
        engine.set_container_size(Size::new(300.0, 200.0));
        assert_eq!(engine.size(), Size::new(10.0, 10.0));

        engine.resize();
        assert_eq!(engine.size(), Size::new(300.0, 200.0));
    }

    #[test]
    fn removed_engine_is_silent() {
        let container = Container::new("map", Size::new(10.0, 10.0));
        let mut engine = HeadlessEngine::new(&container, options()).unwrap();
        engine.remove();

        assert!(engine.drain_events().is_empty());
        let id = engine.add_marker(Marker::new(
            crate::engine::MarkerElement {
                label: None,
                fill: crate::engine::MarkerFill::Color(crate::Color::BLACK),
                size_px: 10.0,
            },
            Default::default(),
        ));
        engine.click_marker(id);
        assert_eq!(engine.markers().count(), 0);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn removed_engine_rejects_layers() {
        let container = Container::new("map", Size::new(10.0, 10.0));
        let mut engine = HeadlessEngine::new(&container, options()).unwrap();
        engine.remove();

        let paint = crate::engine::LinePaint {
            line_color: crate::Color::ROUTE_GRAY,
            line_width: 8.0,
            line_border_color: None,
            line_border_width: None,
        };
        let spec = LayerSpec::line("route", &[], Default::default(), paint);
        assert_matches!(engine.add_layer(spec), Err(PhotomapError::EngineRemoved));
        assert!(engine.layers().is_empty());
    }
}
