//! Startup configuration of the map page.
//!
//! Values come from three places, later ones overriding earlier ones: built-in defaults, an
//! optional JSON file named by `PHOTOMAP_CONFIG`, and the `PHOTOMAP_ACCESS_TOKEN` variable. The
//! configuration is read once and passed down explicitly.

use std::path::{Path, PathBuf};

use photomap_types::{lonlat, GeoPoint2d};
use serde::{Deserialize, Serialize};

use crate::engine::EngineOptions;
use crate::error::PhotomapError;
use crate::popup::DirectionsTemplate;
use crate::Color;

/// Environment variable holding the map service credential.
pub const ACCESS_TOKEN_VAR: &str = "PHOTOMAP_ACCESS_TOKEN";
/// Environment variable holding the path of a JSON configuration file.
pub const CONFIG_PATH_VAR: &str = "PHOTOMAP_CONFIG";

/// Configuration of the map page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Credential of the map service.
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Style URL of the base map.
    pub style: String,
    /// Initial camera center, `[lon, lat]`.
    pub center: GeoPoint2d,
    /// Initial zoom level.
    pub zoom: f64,
    /// Page heading.
    pub title: String,
    /// GeoJSON file with the markers.
    pub features_path: PathBuf,
    /// Directions service URL with `{lat}` and `{lon}` placeholders.
    pub directions_template: DirectionsTemplate,
    /// Diameter of a marker in pixels.
    pub marker_size: f32,
    /// Fill of markers without a photo.
    pub marker_fallback_color: Color,
    /// Distance between a marker and its popup in pixels.
    pub popup_offset: f32,
    /// Route line color.
    pub route_color: Color,
    /// Route line width in pixels.
    pub route_width: f64,
    /// Color of the border around the route line.
    pub route_border_color: Option<Color>,
    /// Width of the border around the route line.
    pub route_border_width: Option<f64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            style: "mapbox://styles/mapbox/standard-satellite".to_string(),
            center: lonlat!(13.592967907443288, 46.80903812137259),
            zoom: 16.0,
            title: "4er Cup Map".to_string(),
            features_path: PathBuf::from("data/markers.geojson"),
            directions_template: DirectionsTemplate::default(),
            marker_size: 48.0,
            marker_fallback_color: Color::MARKER_BLUE,
            popup_offset: 25.0,
            route_color: Color::ROUTE_GRAY,
            route_width: 8.0,
            route_border_color: None,
            route_border_width: None,
        }
    }
}

impl MapConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, PhotomapError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads the configuration using the given variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PhotomapError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(token) = lookup(ACCESS_TOKEN_VAR) {
            config.access_token = token;
        }

        if config.access_token.trim().is_empty() {
            return Err(PhotomapError::MissingAccessToken);
        }

        Ok(config)
    }

    /// Reads a JSON configuration file. Missing fields take default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PhotomapError> {
        let path = path.as_ref();
        log::debug!("Reading configuration from {}", path.display());
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Parses a JSON configuration. Missing fields take default values.
    pub fn from_json_str(json: &str) -> Result<Self, PhotomapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parameters for constructing the map engine.
    pub fn engine_options(&self) -> Result<EngineOptions, PhotomapError> {
        if self.access_token.trim().is_empty() {
            return Err(PhotomapError::MissingAccessToken);
        }

        Ok(EngineOptions {
            access_token: self.access_token.clone(),
            style: self.style.clone(),
            center: self.center,
            zoom: self.zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use photomap_types::GeoPoint;

    #[test]
    fn defaults_match_the_event_page() {
        let config = MapConfig::default();
        assert_eq!(config.zoom, 16.0);
        assert_eq!(config.center.lon(), 13.592967907443288);
        assert_eq!(config.title, "4er Cup Map");
        assert_eq!(config.route_color.to_hex(), "#888888");
    }

    #[test]
    fn token_is_required() {
        assert_matches!(
            MapConfig::from_vars(|_| None),
            Err(PhotomapError::MissingAccessToken)
        );
        assert_matches!(
            MapConfig::from_vars(|name| (name == ACCESS_TOKEN_VAR).then(|| "  ".to_string())),
            Err(PhotomapError::MissingAccessToken)
        );
    }

    #[test]
    fn token_from_env() {
        let config =
            MapConfig::from_vars(|name| (name == ACCESS_TOKEN_VAR).then(|| "pk.test".to_string()))
                .unwrap();
        assert_eq!(config.access_token, "pk.test");
        assert_eq!(config.engine_options().unwrap().access_token, "pk.test");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MapConfig::from_json_str(
            r##"{"zoom": 14.5, "center": [10.0, 47.0], "route_color": "#FF0000"}"##,
        )
        .unwrap();

        assert_eq!(config.zoom, 14.5);
        assert_eq!(config.center, lonlat!(10.0, 47.0));
        assert_eq!(config.route_color, Color::rgba(255, 0, 0, 255));
        assert_eq!(config.popup_offset, 25.0);
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        assert_matches!(
            MapConfig::from_json_str(r#"{"directions_template": "https://x/{zoom}"}"#),
            Err(PhotomapError::Json(_))
        );
        assert_matches!(
            MapConfig::from_json_str(r#"{"zom": 3}"#),
            Err(PhotomapError::Json(_))
        );
    }

    #[test]
    fn engine_options_need_token() {
        assert_matches!(
            MapConfig::default().engine_options(),
            Err(PhotomapError::MissingAccessToken)
        );
    }
}
