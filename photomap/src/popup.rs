//! Popup content and the rule that only one popup is visible at a time.

use std::collections::HashMap;

use photomap_types::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::engine::{MapEngine, MarkerId, Popup, PopupId};
use crate::error::PhotomapError;

/// Text shown in a marker popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    /// Heading.
    pub title: String,
    /// Body text.
    pub description: String,
    /// External link opening a directions service for the marker location.
    pub directions_url: String,
}

impl PopupContent {
    /// Renders well-formed popup markup. User supplied text is escaped.
    pub fn to_html(&self) -> String {
        format!(
            "<h3>{}</h3><p>{}</p><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Get directions</a>",
            escape_html(&self.title),
            escape_html(&self.description),
            escape_html(&self.directions_url),
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// URL template of a directions service with `{lat}` and `{lon}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DirectionsTemplate(String);

impl DirectionsTemplate {
    /// Google Maps directions to the point.
    pub const GOOGLE_MAPS: &'static str =
        "https://www.google.com/maps/dir/?api=1&destination={lat},{lon}";

    /// Creates a template, checking that it can be formatted.
    pub fn new(template: impl Into<String>) -> Result<Self, PhotomapError> {
        let template = Self(template.into());
        template.format(&photomap_types::GeoPoint2d::default())?;
        Ok(template)
    }

    /// Builds the URL for the point.
    pub fn format(&self, point: &impl GeoPoint<Num = f64>) -> Result<String, PhotomapError> {
        let vars = HashMap::from([
            ("lat".to_string(), point.lat().to_string()),
            ("lon".to_string(), point.lon().to_string()),
        ]);

        Ok(strfmt::strfmt(&self.0, &vars)?)
    }
}

impl Default for DirectionsTemplate {
    fn default() -> Self {
        Self(Self::GOOGLE_MAPS.to_string())
    }
}

impl TryFrom<String> for DirectionsTemplate {
    type Error = PhotomapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DirectionsTemplate> for String {
    fn from(value: DirectionsTemplate) -> Self {
        value.0
    }
}

/// Popups bound to markers, and the one currently shown.
///
/// At most one popup is visible across the whole map: opening a popup removes the visible one
/// first, even when both belong to the same marker.
#[derive(Debug, Default)]
pub struct PopupSlot {
    bindings: HashMap<MarkerId, Popup>,
    visible: Option<(MarkerId, PopupId)>,
}

impl PopupSlot {
    /// Binds the popup to the marker, replacing a previous binding.
    pub fn bind(&mut self, marker: MarkerId, popup: Popup) {
        self.bindings.insert(marker, popup);
    }

    /// Popup bound to the marker.
    pub fn bound(&self, marker: MarkerId) -> Option<&Popup> {
        self.bindings.get(&marker)
    }

    /// Marker and popup that are currently shown.
    pub fn visible(&self) -> Option<(MarkerId, PopupId)> {
        self.visible
    }

    /// Shows the popup bound to the marker. Returns `None` if the marker has no popup, in which
    /// case the visible popup stays open.
    pub fn open(&mut self, marker: MarkerId, engine: &mut impl MapEngine) -> Option<PopupId> {
        let popup = self.bindings.get(&marker)?.clone();
        self.close(engine);

        let id = engine.add_popup(popup, marker);
        log::debug!("Opened popup {id:?} for marker {marker:?}");
        self.visible = Some((marker, id));
        Some(id)
    }

    /// Removes the visible popup from the engine.
    pub fn close(&mut self, engine: &mut impl MapEngine) {
        if let Some((_, id)) = self.visible.take() {
            engine.remove_popup(id);
        }
    }

    /// Forgets the popup that was closed by the engine itself.
    pub fn forget(&mut self, popup: PopupId) {
        if self.visible.is_some_and(|(_, id)| id == popup) {
            self.visible = None;
        }
    }
}
