use crate::engine::{ControlId, MapEngine, MarkerId};

/// Something attached to an engine that has to be removed when the map goes away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handle {
    /// Attached marker.
    Marker(MarkerId),
    /// Layer with the given id.
    Layer(String),
    /// UI control.
    Control(ControlId),
}

impl Handle {
    /// Removes the item from the engine.
    pub fn release(self, engine: &mut impl MapEngine) {
        match self {
            Handle::Marker(id) => engine.remove_marker(id),
            Handle::Layer(id) => {
                if !engine.remove_layer(&id) {
                    log::debug!("Layer `{id}` was already removed from the engine");
                }
            }
            Handle::Control(id) => engine.remove_control(id),
        }
    }
}

/// Owner of everything attached to one engine.
///
/// Items are released in reverse order of attachment, so controls go first and markers last.
#[derive(Debug, Default)]
pub struct HandleSet(Vec<Handle>);

impl HandleSet {
    /// Records a new handle.
    pub fn push(&mut self, handle: Handle) {
        self.0.push(handle);
    }

    /// Number of recorded handles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the handles in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = &Handle> + '_ {
        self.0.iter()
    }

    /// Releases all handles, newest first.
    pub fn release_all(&mut self, engine: &mut impl MapEngine) {
        let count = self.0.len();
        while let Some(handle) = self.0.pop() {
            handle.release(engine);
        }

        log::debug!("Released {count} engine handles");
    }
}
