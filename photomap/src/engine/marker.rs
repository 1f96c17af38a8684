use photomap_types::GeoPoint2d;

use crate::popup::PopupContent;
use crate::Color;

/// Visual part of a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerElement {
    /// Text identifying the marker.
    pub label: Option<String>,
    /// What the round marker body is filled with.
    pub fill: MarkerFill,
    /// Diameter in pixels.
    pub size_px: f32,
}

/// Fill of a marker body.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerFill {
    /// Photo loaded from the URL, scaled to cover the marker.
    Image(String),
    /// Plain color, used when there is no photo.
    Color(Color),
}

impl MarkerFill {
    /// Returns true if the marker shows a photo.
    pub fn is_image(&self) -> bool {
        matches!(self, MarkerFill::Image(_))
    }
}

/// Marker placed at a geographic position.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Visual element.
    pub element: MarkerElement,
    /// Anchor position.
    pub position: GeoPoint2d,
}

impl Marker {
    /// Creates a new marker.
    pub fn new(element: MarkerElement, position: GeoPoint2d) -> Self {
        Self { element, position }
    }
}

/// Overlay with descriptive content shown above a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    offset_px: f32,
    content: PopupContent,
    html: String,
}

impl Popup {
    /// Creates a popup, rendering its markup once.
    pub fn new(content: PopupContent, offset_px: f32) -> Self {
        let html = content.to_html();
        Self {
            offset_px,
            content,
            html,
        }
    }

    /// Distance between the anchor and the popup tip in pixels.
    pub fn offset_px(&self) -> f32 {
        self.offset_px
    }

    /// Structured content of the popup.
    pub fn content(&self) -> &PopupContent {
        &self.content
    }

    /// Markup of the popup for engines that render HTML.
    pub fn html(&self) -> &str {
        &self.html
    }
}
