//! Photomap shows a fixed set of photo markers and the route connecting them on an interactive map.
//!
//! The heavy lifting (tiles, camera, popup layout, geolocation) is done by a map engine implementing
//! [`engine::MapEngine`]. This crate decides what the engine shows:
//!
//! * [`MarkerLayer`] puts a round photo marker on every [`Feature`] and binds a popup with its
//!   title, description and a directions link. Only one popup is visible at a time.
//! * [`RouteLayer`] draws a closed line through all features in their order.
//! * [`LocateControl`] adds a button that tracks the user's position.
//!
//! [`MapView`] ties them together: it constructs the engine, attaches the three components in this
//! order once the engine reports that it is ready, and releases everything when it is unmounted.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use photomap::engine::{Container, HeadlessEngine};
//! use photomap::{FeatureCollection, MapConfig, MapView};
//! use photomap::photomap_types::Size;
//!
//! # fn main() -> Result<(), photomap::error::PhotomapError> {
//! let config = MapConfig::from_env()?;
//! let features = Arc::new(FeatureCollection::load(&config.features_path)?);
//! let container = Container::new("map-container", Size::new(1280.0, 720.0));
//!
//! let mut view = MapView::<HeadlessEngine>::mount(container, &config, features)?;
//! view.pump()?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod color;
pub mod config;
pub mod engine;
pub mod error;
mod feature;
mod handles;
mod locate_control;
mod marker_layer;
pub mod popup;
mod ready;
mod route_layer;
mod scene;
mod view;

pub use color::Color;
pub use config::MapConfig;
pub use feature::{Feature, FeatureCollection};
pub use handles::{Handle, HandleSet};
pub use locate_control::LocateControl;
pub use marker_layer::{MarkerLayer, MarkerStyle};
pub use ready::ReadySignal;
pub use route_layer::{closed_polyline, RouteLayer, ROUTE_LAYER_ID};
pub use scene::MapScene;
pub use view::{Lifecycle, MapView};

// Reexport photomap_types
pub use photomap_types;
