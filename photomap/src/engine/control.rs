/// UI control attached to a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Button that shows the position of the user on the map.
    Geolocate {
        /// Ask the device for the most precise position available.
        enable_high_accuracy: bool,
        /// Keep following the user after the first fix.
        track_user_location: bool,
        /// Show which way the user is facing.
        show_user_heading: bool,
    },
}
