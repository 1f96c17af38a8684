use geojson::{Geometry, JsonObject, Value};
use photomap_types::GeoPoint2d;
use serde::{Deserialize, Serialize};

use crate::Color;

/// Description of a renderable layer, in the shape style-spec based engines accept.
///
/// ```json
/// { "id": "route", "type": "line",
///   "source": { "type": "geojson", "data": { "type": "Feature", ... } },
///   "layout": { "line-join": "round", "line-cap": "round" },
///   "paint": { "line-color": "#888888", "line-width": 8.0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Unique id of the layer within the engine.
    pub id: String,
    /// How the layer is rendered.
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    /// Where the layer takes its data from.
    pub source: LayerSource,
    /// Layout properties.
    pub layout: LineLayout,
    /// Paint properties.
    pub paint: LinePaint,
}

/// Kind of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Stroked line.
    Line,
}

/// Data source of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerSource {
    /// Inline GeoJSON data.
    #[serde(rename = "geojson")]
    GeoJson {
        /// The data itself.
        data: geojson::Feature,
    },
}

/// Shape of line joins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum LineJoin {
    Bevel,
    #[default]
    Round,
    Miter,
}

/// Shape of line ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Layout properties of a line layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineLayout {
    /// How segments are joined.
    pub line_join: LineJoin,
    /// How the line ends.
    pub line_cap: LineCap,
}

/// Paint properties of a line layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinePaint {
    /// Stroke color.
    pub line_color: Color,
    /// Stroke width in pixels.
    pub line_width: f64,
    /// Color of the border drawn around the stroke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_border_color: Option<Color>,
    /// Width of the border in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_border_width: Option<f64>,
}

impl LayerSpec {
    /// Creates a line layer drawing the given points in order.
    pub fn line(
        id: impl Into<String>,
        points: &[GeoPoint2d],
        layout: LineLayout,
        paint: LinePaint,
    ) -> Self {
        let data = geojson::Feature {
            bbox: None,
            geometry: Some(Geometry::new(photomap_types::geojson::line_string(points))),
            id: None,
            properties: Some(JsonObject::new()),
            foreign_members: None,
        };

        Self {
            id: id.into(),
            layer_type: LayerType::Line,
            source: LayerSource::GeoJson { data },
            layout,
            paint,
        }
    }

    /// Points of the line, if the source holds a valid line string.
    pub fn line_points(&self) -> Option<Vec<GeoPoint2d>> {
        let LayerSource::GeoJson { data } = &self.source;
        match &data.geometry.as_ref()?.value {
            Value::LineString(positions) => positions
                .iter()
                .map(|p| GeoPoint2d::try_from(p).ok())
                .collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photomap_types::lonlat;
    use serde_json::json;

    fn paint() -> LinePaint {
        LinePaint {
            line_color: Color::ROUTE_GRAY,
            line_width: 8.0,
            line_border_color: None,
            line_border_width: None,
        }
    }

    #[test]
    fn serializes_to_style_spec() {
        let spec = LayerSpec::line(
            "route",
            &[lonlat!(0.0, 0.0), lonlat!(1.0, 1.0)],
            LineLayout::default(),
            paint(),
        );

        let value = serde_json::to_value(&spec).expect("serializable");
        assert_eq!(
            value,
            json!({
                "id": "route",
                "type": "line",
                "source": {
                    "type": "geojson",
                    "data": {
                        "type": "Feature",
                        "properties": {},
                        "geometry": {
                            "type": "LineString",
                            "coordinates": [[0.0, 0.0], [1.0, 1.0]]
                        }
                    }
                },
                "layout": { "line-join": "round", "line-cap": "round" },
                "paint": { "line-color": "#888888", "line-width": 8.0 }
            })
        );
    }

    #[test]
    fn border_is_serialized_when_set() {
        let mut paint = paint();
        paint.line_border_color = Some(Color::WHITE);
        paint.line_border_width = Some(2.0);

        let value = serde_json::to_value(paint).expect("serializable");
        assert_eq!(value["line-border-color"], json!("#FFFFFF"));
        assert_eq!(value["line-border-width"], json!(2.0));
    }

    #[test]
    fn line_points_are_restored() {
        let points = vec![lonlat!(0.0, 0.0), lonlat!(2.0, 1.0)];
        let spec = LayerSpec::line("l", &points, LineLayout::default(), paint());
        assert_eq!(spec.line_points(), Some(points));

        let restored: LayerSpec =
            serde_json::from_value(serde_json::to_value(&spec).expect("serializable"))
                .expect("deserializable");
        assert_eq!(restored.id, "l");
        assert_eq!(restored.paint, spec.paint);
        assert_eq!(restored.line_points(), spec.line_points());
    }
}
