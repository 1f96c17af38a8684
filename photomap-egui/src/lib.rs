//! Egui front-end for photomap.
//!
//! [`EguiEngine`] implements [`photomap::engine::MapEngine`] by painting markers, route lines,
//! popups and the geolocation control into an [`egui::Ui`]. With the `init` feature the crate also
//! provides [`InitBuilder`] that runs it in a native window.

mod egui_engine;
pub mod viewport;

pub use egui_engine::{EguiEngine, UserLocation};
pub use viewport::Viewport;

#[cfg(feature = "init")]
mod init;
#[cfg(feature = "init")]
pub use init::InitBuilder;
