//! Desktop viewer showing the photo markers and their route.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use photomap::config::CONFIG_PATH_VAR;
use photomap::photomap_types::{GeoPoint2d, NewGeoPoint};
use photomap::{FeatureCollection, MapConfig};
use photomap_egui::{InitBuilder, UserLocation};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON configuration file. Overrides `PHOTOMAP_CONFIG`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// GeoJSON file with the markers.
    #[arg(long)]
    features: Option<PathBuf>,
    /// Position to show for the user, as `lon,lat`.
    #[arg(long, value_parser = parse_lonlat)]
    user_location: Option<GeoPoint2d>,
    /// Direction the user is facing, degrees clockwise from north.
    #[arg(long, requires = "user_location")]
    user_heading: Option<f64>,
}

fn parse_lonlat(value: &str) -> Result<GeoPoint2d, String> {
    let (lon, lat) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `lon,lat`, got `{value}`"))?;
    let lon: f64 = lon.trim().parse().map_err(|err| format!("invalid longitude: {err}"))?;
    let lat: f64 = lat.trim().parse().map_err(|err| format!("invalid latitude: {err}"))?;
    Ok(GeoPoint2d::lonlat(lon, lat))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = args.config.clone();
    let mut config = MapConfig::from_vars(|name| match (&config_path, name) {
        (Some(path), CONFIG_PATH_VAR) => Some(path.display().to_string()),
        _ => std::env::var(name).ok(),
    })
    .context("failed to read the configuration")?;

    if let Some(features) = args.features {
        config.features_path = features;
    }

    let features = FeatureCollection::load(&config.features_path)
        .with_context(|| format!("failed to load {}", config.features_path.display()))?;

    let mut builder = InitBuilder::new(config, Arc::new(features));
    if let Some(position) = args.user_location {
        builder = builder.with_user_location(UserLocation {
            position,
            accuracy_m: None,
            heading_deg: args.user_heading,
        });
    }

    builder.init()
}
