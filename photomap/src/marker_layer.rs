use std::sync::Arc;

use crate::config::MapConfig;
use crate::engine::{MapEngine, Marker, MarkerElement, MarkerFill, Popup};
use crate::error::PhotomapError;
use crate::feature::{Feature, FeatureCollection};
use crate::popup::{DirectionsTemplate, PopupContent};
use crate::scene::MapScene;
use crate::Color;

/// Appearance of markers and their popups.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Diameter in pixels.
    pub size_px: f32,
    /// Fill of markers without a photo.
    pub fallback_color: Color,
    /// Distance between a marker and its popup.
    pub popup_offset_px: f32,
    /// Directions link of the popup.
    pub directions: DirectionsTemplate,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::from(&MapConfig::default())
    }
}

impl From<&MapConfig> for MarkerStyle {
    fn from(config: &MapConfig) -> Self {
        Self {
            size_px: config.marker_size,
            fallback_color: config.marker_fallback_color,
            popup_offset_px: config.popup_offset,
            directions: config.directions_template.clone(),
        }
    }
}

/// Photo markers, one per feature, each with a popup.
pub struct MarkerLayer {
    features: Arc<FeatureCollection>,
    style: MarkerStyle,
}

impl MarkerLayer {
    /// Creates a layer for the features.
    pub fn new(features: Arc<FeatureCollection>, style: MarkerStyle) -> Self {
        Self { features, style }
    }

    /// Builds the marker of one feature.
    pub fn marker(&self, feature: &Feature) -> Marker {
        let fill = match &feature.image_url {
            Some(url) => MarkerFill::Image(url.clone()),
            None => MarkerFill::Color(self.style.fallback_color),
        };

        Marker::new(
            MarkerElement {
                label: feature.id.clone(),
                fill,
                size_px: self.style.size_px,
            },
            feature.coordinates,
        )
    }

    /// Builds the popup of one feature.
    pub fn popup(&self, feature: &Feature) -> Result<Popup, PhotomapError> {
        let content = PopupContent {
            title: feature.title.clone(),
            description: feature.description.clone(),
            directions_url: self.style.directions.format(&feature.coordinates)?,
        };

        Ok(Popup::new(content, self.style.popup_offset_px))
    }

    /// Attaches a marker with a popup for every feature.
    ///
    /// Calling this twice for the same scene attaches every marker twice.
    pub fn load<E: MapEngine>(&self, scene: &mut MapScene<E>) -> Result<(), PhotomapError> {
        for feature in self.features.iter() {
            let popup = self.popup(feature)?;
            scene.add_marker(self.marker(feature), Some(popup))?;
        }

        log::info!("Attached {} markers", self.features.len());
        Ok(())
    }
}
