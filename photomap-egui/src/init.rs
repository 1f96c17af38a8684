use std::sync::Arc;

use eframe::AppCreator;
use photomap::engine::Container;
use photomap::photomap_types::Size;
use photomap::{FeatureCollection, MapConfig, MapView};

use crate::{EguiEngine, UserLocation};

const CONTAINER_ID: &str = "map-container";
const DEFAULT_WINDOW_SIZE: [f32; 2] = [1280.0, 720.0];

struct PhotomapApp {
    view: MapView<EguiEngine>,
    title: String,
}

impl eframe::App for PhotomapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("title").show(ctx, |ui| {
            ui.heading(&self.title);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.view.engine_mut().show(ui);
            });

        if let Err(err) = self.view.pump() {
            log::error!("Failed to update the map: {err}");
        }
    }
}

/// Opens a native window showing the photo map.
pub struct InitBuilder {
    config: MapConfig,
    features: Arc<FeatureCollection>,
    user_location: Option<UserLocation>,
    native_options: Option<eframe::NativeOptions>,
}

impl InitBuilder {
    /// Creates a builder for the given configuration and features.
    pub fn new(config: MapConfig, features: Arc<FeatureCollection>) -> Self {
        Self {
            config,
            features,
            user_location: None,
            native_options: None,
        }
    }

    /// Sets the user position shown by the geolocation control.
    pub fn with_user_location(mut self, location: UserLocation) -> Self {
        self.user_location = Some(location);
        self
    }

    /// Overrides the window options.
    pub fn with_native_options(mut self, options: eframe::NativeOptions) -> Self {
        self.native_options = Some(options);
        self
    }

    /// Mounts the map and runs the event loop until the window is closed.
    pub fn init(self) -> anyhow::Result<()> {
        let native_options = self.native_options.unwrap_or_else(|| eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(&self.config.title)
                .with_inner_size(DEFAULT_WINDOW_SIZE),
            ..Default::default()
        });

        let [width, height] = native_options
            .viewport
            .inner_size
            .map(|size| [size.x, size.y])
            .unwrap_or(DEFAULT_WINDOW_SIZE);
        let container = Container::new(CONTAINER_ID, Size::new(width as f64, height as f64));

        let mut view = MapView::<EguiEngine>::mount(container, &self.config, self.features)?;
        if let Some(location) = self.user_location {
            view.engine_mut().set_user_location(location);
        }

        let title = self.config.title.clone();
        eframe::run_native(&title, native_options, app_creator(view, title.clone()))
            .map_err(|err| anyhow::anyhow!("failed to run the window: {err}"))
    }
}

fn app_creator<'app>(view: MapView<EguiEngine>, title: String) -> AppCreator<'app> {
    Box::new(move |cc: &eframe::CreationContext<'_>| {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        Ok(Box::new(PhotomapApp { view, title }) as Box<dyn eframe::App>)
    })
}
