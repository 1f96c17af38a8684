use crate::engine::{Control, ControlId, MapEngine};
use crate::error::PhotomapError;
use crate::scene::MapScene;

/// Control showing the user's own position and heading on the map.
#[derive(Debug, Clone, Copy)]
pub struct LocateControl {
    control: Control,
}

impl Default for LocateControl {
    fn default() -> Self {
        Self {
            control: Control::Geolocate {
                enable_high_accuracy: true,
                track_user_location: true,
                show_user_heading: true,
            },
        }
    }
}

impl LocateControl {
    /// The control that will be attached.
    pub fn control(&self) -> Control {
        self.control
    }

    /// Adds the control to the scene. Every call adds another control.
    pub fn attach<E: MapEngine>(
        &self,
        scene: &mut MapScene<E>,
    ) -> Result<ControlId, PhotomapError> {
        log::debug!("Attaching geolocation control");
        scene.add_control(self.control)
    }
}
