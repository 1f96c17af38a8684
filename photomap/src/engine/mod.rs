//! Contract of the map engine that actually draws the map.
//!
//! Tile rendering, camera control and popup layout are done by an engine implementing
//! [`MapEngine`]. This crate only tells the engine what to show: [layers](LayerSpec),
//! [markers](Marker), [popups](Popup) and [controls](Control). Everything added to the engine is
//! identified by an id issued by the engine, so that it can be removed later.
//!
//! Two engines are available: [`HeadlessEngine`], which keeps everything in memory and is used for
//! tests and server-side processing, and the egui engine from the `photomap-egui` crate.

use std::sync::Arc;

use parking_lot::RwLock;
use photomap_types::{GeoPoint2d, Size};

use crate::error::PhotomapError;

mod control;
mod headless;
mod layer_spec;
mod marker;

pub use control::Control;
pub use headless::HeadlessEngine;
pub use layer_spec::{LayerSource, LayerSpec, LayerType, LineCap, LineJoin, LineLayout, LinePaint};
pub use marker::{Marker, MarkerElement, MarkerFill, Popup};

/// Surface the map is drawn into.
///
/// A container that has not been laid out yet has no size, and no engine can be bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: String,
    size: Option<Size>,
}

impl Container {
    /// Creates a container that is attached to the surface with the given size.
    pub fn new(id: impl Into<String>, size: Size) -> Self {
        Self {
            id: id.into(),
            size: Some(size),
        }
    }

    /// Creates a container that is not attached to anything yet.
    pub fn detached(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: None,
        }
    }

    /// Identifier of the container.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Size of the container, if it is attached.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Updates the size after the surface was laid out again.
    pub fn set_size(&mut self, size: Size) {
        self.size = Some(size);
    }

    /// Returns the size or fails if the container is not attached.
    pub fn require_size(&self) -> Result<Size, PhotomapError> {
        self.size
            .filter(|size| !size.is_empty())
            .ok_or_else(|| PhotomapError::ContainerUnavailable(self.id.clone()))
    }
}

/// Parameters the engine is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Credential of the map service.
    pub access_token: String,
    /// Style URL of the base map.
    pub style: String,
    /// Initial center of the camera.
    pub center: GeoPoint2d,
    /// Initial zoom level.
    pub zoom: f64,
}

/// Events an engine reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine is fully initialized. Fired once.
    Ready,
    /// A user clicked the marker.
    MarkerClicked(MarkerId),
    /// The popup was closed by the user.
    PopupClosed(PopupId),
}

macro_rules! engine_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id issued by an engine.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw value of the id.
            pub const fn raw(&self) -> u64 {
                self.0
            }
        }
    };
}

engine_id!(
    /// Id of a marker attached to an engine.
    MarkerId
);
engine_id!(
    /// Id of a popup shown by an engine.
    PopupId
);
engine_id!(
    /// Id of a UI control attached to an engine.
    ControlId
);

/// Map engine collaborator.
///
/// All methods are called from the single UI thread. Ids returned by the `add_*` methods stay valid
/// until the corresponding `remove_*` method or [`MapEngine::remove`] is called.
pub trait MapEngine {
    /// Creates an engine bound to the container.
    fn construct(container: &Container, options: EngineOptions) -> Result<Self, PhotomapError>
    where
        Self: Sized;

    /// Takes the events accumulated since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<EngineEvent>;

    /// Fits the engine to the current size of its container.
    fn resize(&mut self);

    /// Adds a renderable layer. Fails if a layer with the same id is already present.
    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), PhotomapError>;
    /// Returns a copy of the layer with the given id.
    fn get_layer(&self, id: &str) -> Option<LayerSpec>;
    /// Removes the layer. Returns false if there was no such layer.
    fn remove_layer(&mut self, id: &str) -> bool;

    /// Attaches a marker.
    fn add_marker(&mut self, marker: Marker) -> MarkerId;
    /// Detaches a marker.
    fn remove_marker(&mut self, id: MarkerId);

    /// Shows a popup above the given marker.
    fn add_popup(&mut self, popup: Popup, anchor: MarkerId) -> PopupId;
    /// Hides the popup.
    fn remove_popup(&mut self, id: PopupId);

    /// Adds a UI control.
    fn add_control(&mut self, control: Control) -> ControlId;
    /// Removes a UI control.
    fn remove_control(&mut self, id: ControlId);

    /// Destroys the engine. No events are reported after this call.
    fn remove(&mut self);
}

impl<T: MapEngine> MapEngine for Arc<RwLock<T>> {
    fn construct(container: &Container, options: EngineOptions) -> Result<Self, PhotomapError> {
        Ok(Arc::new(RwLock::new(T::construct(container, options)?)))
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.write().drain_events()
    }

    fn resize(&mut self) {
        self.write().resize()
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), PhotomapError> {
        self.write().add_layer(spec)
    }

    fn get_layer(&self, id: &str) -> Option<LayerSpec> {
        self.read().get_layer(id)
    }

    fn remove_layer(&mut self, id: &str) -> bool {
        self.write().remove_layer(id)
    }

    fn add_marker(&mut self, marker: Marker) -> MarkerId {
        self.write().add_marker(marker)
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.write().remove_marker(id)
    }

    fn add_popup(&mut self, popup: Popup, anchor: MarkerId) -> PopupId {
        self.write().add_popup(popup, anchor)
    }

    fn remove_popup(&mut self, id: PopupId) {
        self.write().remove_popup(id)
    }

    fn add_control(&mut self, control: Control) -> ControlId {
        self.write().add_control(control)
    }

    fn remove_control(&mut self, id: ControlId) {
        self.write().remove_control(id)
    }

    fn remove(&mut self) {
        self.write().remove()
    }
}
