//! Marker records and the collection they are loaded from.
//!
//! The collection is a GeoJSON `FeatureCollection` where each feature is a `Point` with `title`,
//! `description` and optional `imageURL`/`id` properties. It is read once and never changes
//! afterwards.

use std::path::Path;
use std::str::FromStr;

use geojson::feature::Id;
use geojson::{GeoJson, JsonObject, Value};
use photomap_types::GeoPoint2d;

use crate::error::PhotomapError;

/// One marker's data record.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Location of the marker.
    pub coordinates: GeoPoint2d,
    /// Popup heading.
    pub title: String,
    /// Popup body text.
    pub description: String,
    /// Photo shown inside the marker.
    pub image_url: Option<String>,
    /// Label of the marker.
    pub id: Option<String>,
}

impl Feature {
    /// Creates a feature with only the required fields set.
    pub fn new(
        coordinates: GeoPoint2d,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            coordinates,
            title: title.into(),
            description: description.into(),
            image_url: None,
            id: None,
        }
    }

    /// Sets the photo URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn from_geojson(index: usize, feature: geojson::Feature) -> Result<Self, PhotomapError> {
        let malformed = |reason: &str| PhotomapError::MalformedFeature {
            index,
            reason: reason.to_string(),
        };

        let coordinates = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(position)) => GeoPoint2d::try_from(position)
                .map_err(|err| malformed(&err.to_string()))?,
            Some(_) => return Err(malformed("geometry is not a point")),
            None => return Err(malformed("geometry is missing")),
        };

        let properties = feature.properties.unwrap_or_default();
        let title = required_string(&properties, "title").ok_or_else(|| malformed("no title"))?;
        let description = required_string(&properties, "description")
            .ok_or_else(|| malformed("no description"))?;

        let image_url = properties
            .get("imageURL")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string);
        if image_url.is_none() && properties.contains_key("imageURL") {
            log::debug!("Feature #{index} has unusable imageURL, fallback fill will be used");
        }

        let id = properties
            .get("id")
            .and_then(json_to_label)
            .or_else(|| feature.id.map(id_to_label));

        Ok(Self {
            coordinates,
            title,
            description,
            image_url,
            id,
        })
    }
}

fn required_string(properties: &JsonObject, key: &str) -> Option<String> {
    properties
        .get(key)
        .and_then(|v| v.as_str())
        .map(ToString::to_string)
}

fn json_to_label(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_to_label(id: Id) -> String {
    match id {
        Id::String(s) => s,
        Id::Number(n) => n.to_string(),
    }
}

/// Ordered set of all features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    /// Creates a collection from already constructed features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Reads and parses a GeoJSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhotomapError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let collection: Self = contents.parse()?;
        log::info!(
            "Loaded {} features from {}",
            collection.len(),
            path.display()
        );

        Ok(collection)
    }

    /// Features in their original order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Iterates over the features.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> + '_ {
        self.features.iter()
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if there are no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromStr for FeatureCollection {
    type Err = PhotomapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let geojson: GeoJson = s.parse()?;
        let collection = geojson::FeatureCollection::try_from(geojson)?;

        let features = collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| Feature::from_geojson(index, feature))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { features })
    }
}

impl From<Vec<Feature>> for FeatureCollection {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use photomap_types::GeoPoint;

    const DATA: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [13.59, 46.81] },
                "properties": {
                    "title": "Start",
                    "description": "Meet here",
                    "imageURL": "https://example.com/start.jpg",
                    "id": "A"
                }
            },
            {
                "type": "Feature",
                "id": 7,
                "geometry": { "type": "Point", "coordinates": [13.60, 46.82, 1200.0] },
                "properties": { "title": "Hut", "description": "Lunch", "imageURL": "" }
            }
        ]
    }"#;

    #[test]
    fn parses_features_in_order() {
        let collection: FeatureCollection = DATA.parse().expect("valid data");
        assert_eq!(collection.len(), 2);

        let first = &collection.features()[0];
        assert_eq!(first.coordinates.lon(), 13.59);
        assert_eq!(first.coordinates.lat(), 46.81);
        assert_eq!(first.title, "Start");
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://example.com/start.jpg")
        );
        assert_eq!(first.id.as_deref(), Some("A"));

        let second = &collection.features()[1];
        assert_eq!(second.image_url, None);
        assert_eq!(second.id.as_deref(), Some("7"));
    }

    #[test]
    fn missing_title_is_an_error() {
        let data = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]},
             "properties": {"description": "no title"}}
        ]}"#;

        assert_matches!(
            data.parse::<FeatureCollection>(),
            Err(PhotomapError::MalformedFeature { index: 0, .. })
        );
    }

    #[test]
    fn non_point_geometry_is_an_error() {
        let data = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]},
             "properties": {"title": "a", "description": "b"}},
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
             "properties": {"title": "a", "description": "b"}}
        ]}"#;

        assert_matches!(
            data.parse::<FeatureCollection>(),
            Err(PhotomapError::MalformedFeature { index: 1, .. })
        );
    }

    #[test]
    fn not_a_collection() {
        let data = r#"{"type": "Point", "coordinates": [0, 0]}"#;
        assert_matches!(
            data.parse::<FeatureCollection>(),
            Err(PhotomapError::GeoJson(_))
        );
    }

    #[test]
    fn empty_collection() {
        let collection: FeatureCollection = r#"{"type": "FeatureCollection", "features": []}"#
            .parse()
            .expect("valid data");
        assert!(collection.is_empty());
    }
}
