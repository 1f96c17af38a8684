//! Error types used by the crate.

use photomap_types::error::PhotomapTypesError;
use thiserror::Error;

/// Photomap error type.
#[derive(Debug, Error)]
pub enum PhotomapError {
    /// The map engine credential was not supplied.
    #[error("map access token is not set")]
    MissingAccessToken,
    /// The container the map should be bound to is not attached to the surface.
    #[error("container `{0}` is not available")]
    ContainerUnavailable(String),
    /// A record of the feature collection cannot be displayed.
    #[error("feature #{index} is malformed: {reason}")]
    MalformedFeature {
        /// Position of the feature in the collection.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// The data file is not valid GeoJSON.
    #[error("failed to parse GeoJSON")]
    GeoJson(#[from] geojson::Error),
    /// JSON (de)serialization error.
    #[error("failed to decode JSON")]
    Json(#[from] serde_json::Error),
    /// Error reading data from the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
    /// The engine was removed and cannot show anything anymore.
    #[error("map engine is removed")]
    EngineRemoved,
    /// A URL template could not be formatted.
    #[error("invalid template: {0}")]
    Template(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}

impl From<PhotomapTypesError> for PhotomapError {
    fn from(value: PhotomapTypesError) -> Self {
        Self::Generic(value.to_string())
    }
}

impl From<strfmt::FmtError> for PhotomapError {
    fn from(value: strfmt::FmtError) -> Self {
        Self::Template(value.to_string())
    }
}
