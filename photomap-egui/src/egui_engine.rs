use std::collections::BTreeMap;

use egui::{
    Align2, Color32, FontId, Id, Order, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2,
};
use photomap::engine::{
    Container, Control, ControlId, EngineEvent, EngineOptions, LayerSpec, LineCap, LineJoin,
    MapEngine, Marker, MarkerFill, MarkerId, Popup, PopupId,
};
use photomap::error::PhotomapError;
use photomap::photomap_types::{GeoPoint, GeoPoint2d, Point2, Size};
use photomap::Color;

use crate::viewport::Viewport;

const BACKGROUND: Color32 = Color32::from_rgb(38, 52, 44);
const USER_LOCATION: Color32 = Color32::from_rgb(29, 161, 242);
const LABEL_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
const POPUP_WIDTH: f32 = 240.0;
const SCROLL_PER_ZOOM_LEVEL: f64 = 200.0;

/// Position of the user reported by the host application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserLocation {
    /// Where the user is.
    pub position: GeoPoint2d,
    /// Radius of uncertainty in meters.
    pub accuracy_m: Option<f64>,
    /// Direction the user is facing, degrees clockwise from north.
    pub heading_deg: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct ControlState {
    control: Control,
    is_active: bool,
}

impl ControlState {
    fn tracks_user(&self) -> bool {
        self.is_active
            && matches!(
                self.control,
                Control::Geolocate {
                    track_user_location: true,
                    ..
                }
            )
    }

    fn shows_heading(&self) -> bool {
        self.is_active
            && matches!(
                self.control,
                Control::Geolocate {
                    show_user_heading: true,
                    ..
                }
            )
    }
}

/// Map engine drawing into an egui [`Ui`].
///
/// The engine reports [`EngineEvent::Ready`] after the first frame in which its container got a
/// size. Dragging pans the map, scrolling zooms it, clicking a marker reports
/// [`EngineEvent::MarkerClicked`] and clicking elsewhere closes the open popups.
///
/// There is no device positioning on desktop, so the geolocation control shows whatever
/// [`EguiEngine::set_user_location`] was given. Pressing the control centers the map on the user
/// once. Controls with `track_user_location` keep following the user until pressed again.
#[derive(Debug)]
pub struct EguiEngine {
    container: Container,
    options: EngineOptions,
    viewport: Viewport,
    layers: Vec<LayerSpec>,
    markers: BTreeMap<MarkerId, Marker>,
    popups: BTreeMap<PopupId, (MarkerId, Popup)>,
    controls: BTreeMap<ControlId, ControlState>,
    user_location: Option<UserLocation>,
    events: Vec<EngineEvent>,
    next_id: u64,
    is_loaded: bool,
    is_removed: bool,
}

impl EguiEngine {
    /// Creates an engine bound to the container.
    pub fn new(container: &Container, options: EngineOptions) -> Result<Self, PhotomapError> {
        let size = container.require_size()?;
        log::debug!(
            "Egui engine created in `{}`, style {}, zoom {}",
            container.id(),
            options.style,
            options.zoom
        );

        Ok(Self {
            container: container.clone(),
            viewport: Viewport::new(options.center, options.zoom, size),
            options,
            layers: Vec::new(),
            markers: BTreeMap::new(),
            popups: BTreeMap::new(),
            controls: BTreeMap::new(),
            user_location: None,
            events: Vec::new(),
            next_id: 1,
            is_loaded: false,
            is_removed: false,
        })
    }

    /// Options the engine was created with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Current camera.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Updates the user position shown by the geolocation control.
    pub fn set_user_location(&mut self, location: UserLocation) {
        self.user_location = Some(location);
        if self.is_tracking() {
            self.viewport.set_center(location.position);
        }
    }

    /// Returns true if any geolocation control follows the user.
    pub fn is_tracking(&self) -> bool {
        self.controls.values().any(ControlState::tracks_user)
    }

    /// Simulates pressing the control button.
    pub fn press_control(&mut self, id: ControlId) {
        let Some(state) = self.controls.get_mut(&id) else {
            return;
        };

        state.is_active = !state.is_active;
        let is_active = state.is_active;
        let Control::Geolocate {
            enable_high_accuracy,
            track_user_location,
            ..
        } = state.control;
        log::debug!(
            "Geolocation control {id:?} active: {is_active}, tracking: {track_user_location}, \
             high accuracy: {enable_high_accuracy}"
        );

        if let (true, Some(location)) = (is_active, self.user_location) {
            self.viewport.set_center(location.position);
        }
    }

    /// Draws the map into all the space available in the `ui` and processes user input.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if self.is_removed {
            return response;
        }

        let size = Size::new(rect.width() as f64, rect.height() as f64);
        if self.container.size() != Some(size) {
            self.container.set_size(size);
            if self.is_loaded {
                self.resize();
            }
        }

        if !self.is_loaded && !size.is_empty() {
            self.is_loaded = true;
            self.events.push(EngineEvent::Ready);
        }

        self.handle_input(ui, rect, &response);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);
        for layer in &self.layers {
            self.paint_line(&painter, rect, layer);
        }
        self.paint_user_location(&painter, rect);
        self.paint_markers(ui, &painter, rect);
        self.show_popups(ui, rect);
        self.show_controls(ui, rect);

        response
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if response.dragged() {
            let delta = response.drag_delta();
            self.viewport.pan(delta.x as f64, delta.y as f64);
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.smooth_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let anchor = response
                    .hover_pos()
                    .map(|pos| to_local(pos, rect))
                    .unwrap_or_else(|| {
                        let size = self.viewport.size();
                        Point2::new(size.half_width(), size.half_height())
                    });
                self.viewport
                    .zoom_by(scroll as f64 / SCROLL_PER_ZOOM_LEVEL, anchor);
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                match self.marker_at(to_local(pos, rect)) {
                    Some(id) => self.events.push(EngineEvent::MarkerClicked(id)),
                    None => self.close_all_popups(),
                }
            }
        }
    }

    /// Topmost marker under the screen point.
    fn marker_at(&self, point: Point2) -> Option<MarkerId> {
        self.markers.iter().rev().find_map(|(id, marker)| {
            let center = self.viewport.to_screen(&marker.position)?;
            (center.distance(&point) <= marker.element.size_px as f64 / 2.0).then_some(*id)
        })
    }

    fn close_all_popups(&mut self) {
        let open: Vec<PopupId> = self.popups.keys().copied().collect();
        for id in open {
            self.close_popup(id);
        }
    }

    /// Closes the popup as if the user did it.
    pub fn close_popup(&mut self, id: PopupId) {
        if self.popups.remove(&id).is_some() {
            self.events.push(EngineEvent::PopupClosed(id));
        }
    }

    fn screen_pos(&self, point: &GeoPoint2d, rect: Rect) -> Option<Pos2> {
        let screen = self.viewport.to_screen(point)?;
        Some(rect.min + Vec2::new(screen.x() as f32, screen.y() as f32))
    }

    fn paint_line(&self, painter: &egui::Painter, rect: Rect, layer: &LayerSpec) {
        let Some(points) = layer.line_points() else {
            log::trace!("Layer `{}` has no line to draw", layer.id);
            return;
        };

        let points: Vec<Pos2> = points
            .iter()
            .filter_map(|p| self.screen_pos(p, rect))
            .collect();
        if points.len() < 2 {
            return;
        }

        let paint = &layer.paint;
        let width = paint.line_width as f32;
        if let (Some(color), Some(border)) = (paint.line_border_color, paint.line_border_width) {
            let outer = width + 2.0 * border as f32;
            self.paint_stroke(painter, &points, outer, to_color32(color), layer);
        }

        self.paint_stroke(painter, &points, width, to_color32(paint.line_color), layer);
    }

    fn paint_stroke(
        &self,
        painter: &egui::Painter,
        points: &[Pos2],
        width: f32,
        color: Color32,
        layer: &LayerSpec,
    ) {
        painter.line(points.to_vec(), Stroke::new(width, color));

        let radius = width / 2.0;
        if layer.layout.line_join == LineJoin::Round && points.len() > 2 {
            for point in &points[1..points.len() - 1] {
                painter.circle_filled(*point, radius, color);
            }
        }

        if layer.layout.line_cap == LineCap::Round {
            for point in [points[0], points[points.len() - 1]] {
                painter.circle_filled(point, radius, color);
            }
        }
    }

    fn paint_markers(&self, ui: &Ui, painter: &egui::Painter, rect: Rect) {
        for marker in self.markers.values() {
            let Some(center) = self.screen_pos(&marker.position, rect) else {
                continue;
            };

            let size = marker.element.size_px;
            let radius = size / 2.0;
            match &marker.element.fill {
                MarkerFill::Color(color) => {
                    painter.circle_filled(center, radius, to_color32(*color));
                }
                MarkerFill::Image(url) => {
                    egui::Image::from_uri(url.as_str())
                        .corner_radius(radius)
                        .paint_at(ui, Rect::from_center_size(center, Vec2::splat(size)));
                }
            }
            painter.circle_stroke(center, radius, Stroke::new(2.0, Color32::WHITE));

            if let Some(label) = &marker.element.label {
                let badge = center + Vec2::splat(radius * 0.75);
                painter.circle_filled(badge, 9.0, LABEL_BACKGROUND);
                painter.text(
                    badge,
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(11.0),
                    Color32::WHITE,
                );
            }
        }
    }

    fn paint_user_location(&self, painter: &egui::Painter, rect: Rect) {
        if !self.controls.values().any(|state| state.is_active) {
            return;
        }

        let Some(location) = self.user_location else {
            return;
        };
        let Some(center) = self.screen_pos(&location.position, rect) else {
            return;
        };

        if let Some(accuracy) = location.accuracy_m {
            // Web Mercator stretches distances by 1/cos(lat).
            let scale = 1.0 / location.position.lat().to_radians().cos();
            let radius = (accuracy * scale / self.viewport.resolution()) as f32;
            painter.circle_filled(center, radius, USER_LOCATION.gamma_multiply(0.2));
        }

        let shows_heading = self.controls.values().any(ControlState::shows_heading);
        if let (true, Some(heading)) = (shows_heading, location.heading_deg) {
            let direction = heading.to_radians() as f32;
            let forward = Vec2::new(direction.sin(), -direction.cos());
            let side = Vec2::new(forward.y, -forward.x);
            painter.add(Shape::convex_polygon(
                vec![
                    center + forward * 22.0,
                    center + side * 7.0,
                    center - side * 7.0,
                ],
                USER_LOCATION.gamma_multiply(0.6),
                Stroke::NONE,
            ));
        }

        painter.circle_filled(center, 8.0, USER_LOCATION);
        painter.circle_stroke(center, 8.0, Stroke::new(2.0, Color32::WHITE));
    }

    fn show_popups(&mut self, ui: &Ui, rect: Rect) {
        let mut closed = Vec::new();
        for (id, (anchor, popup)) in &self.popups {
            let Some(position) = self.markers.get(anchor).map(|m| m.position) else {
                continue;
            };
            let Some(tip) = self.screen_pos(&position, rect) else {
                continue;
            };

            let content = popup.content();
            let mut close_clicked = false;
            egui::Area::new(Id::new(("photomap-popup", id.raw())))
                .order(Order::Foreground)
                .pivot(Align2::CENTER_BOTTOM)
                .fixed_pos(tip - Vec2::new(0.0, popup.offset_px()))
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(POPUP_WIDTH);
                        ui.horizontal(|ui| {
                            ui.heading(&content.title);
                            if ui.small_button("x").clicked() {
                                close_clicked = true;
                            }
                        });
                        ui.label(&content.description);
                        ui.hyperlink_to("Get directions", &content.directions_url);
                    });
                });

            if close_clicked {
                closed.push(*id);
            }
        }

        for id in closed {
            self.close_popup(id);
        }
    }

    fn show_controls(&mut self, ui: &Ui, rect: Rect) {
        let mut pressed = Vec::new();
        for (index, (id, state)) in self.controls.iter().enumerate() {
            let text = match (state.is_active, state.tracks_user()) {
                (false, _) => "Locate me",
                (true, true) => "Stop tracking",
                (true, false) => "Hide location",
            };

            egui::Area::new(Id::new(("photomap-control", id.raw())))
                .order(Order::Foreground)
                .pivot(Align2::RIGHT_TOP)
                .fixed_pos(rect.right_top() + Vec2::new(-12.0, 12.0 + index as f32 * 36.0))
                .show(ui.ctx(), |ui| {
                    if ui.button(text).clicked() {
                        pressed.push(*id);
                    }
                });
        }

        for id in pressed {
            self.press_control(id);
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl MapEngine for EguiEngine {
    fn construct(container: &Container, options: EngineOptions) -> Result<Self, PhotomapError> {
        Self::new(container, options)
    }

    fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn resize(&mut self) {
        if let Some(size) = self.container.size() {
            log::trace!("Resizing egui engine to {size:?}");
            self.viewport.set_size(size);
        }
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), PhotomapError> {
        if self.layers.iter().any(|layer| layer.id == spec.id) {
            return Err(PhotomapError::Generic(format!(
                "layer `{}` already exists",
                spec.id
            )));
        }

        self.layers.push(spec);
        Ok(())
    }

    fn get_layer(&self, id: &str) -> Option<LayerSpec> {
        self.layers.iter().find(|layer| layer.id == id).cloned()
    }

    fn remove_layer(&mut self, id: &str) -> bool {
        let count = self.layers.len();
        self.layers.retain(|layer| layer.id != id);
        self.layers.len() != count
    }

    fn add_marker(&mut self, marker: Marker) -> MarkerId {
        let id = MarkerId::new(self.next_id());
        self.markers.insert(id, marker);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
        self.popups.retain(|_, (anchor, _)| *anchor != id);
    }

    fn add_popup(&mut self, popup: Popup, anchor: MarkerId) -> PopupId {
        let id = PopupId::new(self.next_id());
        self.popups.insert(id, (anchor, popup));
        id
    }

    fn remove_popup(&mut self, id: PopupId) {
        self.popups.remove(&id);
    }

    fn add_control(&mut self, control: Control) -> ControlId {
        let id = ControlId::new(self.next_id());
        self.controls.insert(
            id,
            ControlState {
                control,
                is_active: false,
            },
        );
        id
    }

    fn remove_control(&mut self, id: ControlId) {
        self.controls.remove(&id);
    }

    fn remove(&mut self) {
        self.layers.clear();
        self.markers.clear();
        self.popups.clear();
        self.controls.clear();
        self.events.clear();
        self.is_removed = true;
        log::debug!("Egui engine in `{}` removed", self.container.id());
    }
}

fn to_local(pos: Pos2, rect: Rect) -> Point2 {
    Point2::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn to_color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.to_u8_array();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use photomap::engine::MarkerElement;
    use photomap::MapConfig;

    fn engine() -> EguiEngine {
        let config = MapConfig {
            access_token: "test".to_string(),
            ..Default::default()
        };
        let container = Container::new("map", Size::new(800.0, 600.0));
        EguiEngine::new(&container, config.engine_options().unwrap()).unwrap()
    }

    fn marker(position: GeoPoint2d) -> Marker {
        Marker::new(
            MarkerElement {
                label: Some("1".into()),
                fill: MarkerFill::Color(Color::MARKER_BLUE),
                size_px: 48.0,
            },
            position,
        )
    }

    fn run_frame(ctx: &egui::Context, engine: &mut EguiEngine) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                engine.show(ui);
            });
        });
    }

    #[test]
    fn ready_after_first_frame() {
        let mut engine = engine();
        assert!(engine.drain_events().is_empty());

        let ctx = egui::Context::default();
        run_frame(&ctx, &mut engine);
        assert_eq!(engine.drain_events(), vec![EngineEvent::Ready]);

        run_frame(&ctx, &mut engine);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn detached_container_is_rejected() {
        let config = MapConfig {
            access_token: "test".to_string(),
            ..Default::default()
        };
        assert_matches!(
            EguiEngine::new(&Container::detached("map"), config.engine_options().unwrap()),
            Err(PhotomapError::ContainerUnavailable(_))
        );
    }

    #[test]
    fn marker_hit_test() {
        let mut engine = engine();
        let center = engine.viewport().center();
        let id = engine.add_marker(marker(center));

        assert_eq!(engine.marker_at(Point2::new(400.0, 300.0)), Some(id));
        assert_eq!(engine.marker_at(Point2::new(420.0, 310.0)), Some(id));
        assert_eq!(engine.marker_at(Point2::new(450.0, 300.0)), None);
    }

    #[test]
    fn duplicate_layer_is_rejected() {
        let mut engine = engine();
        let spec = LayerSpec::line(
            "route",
            &[],
            Default::default(),
            photomap::engine::LinePaint {
                line_color: Color::ROUTE_GRAY,
                line_width: 8.0,
                line_border_color: None,
                line_border_width: None,
            },
        );

        engine.add_layer(spec.clone()).unwrap();
        assert!(engine.add_layer(spec).is_err());
        assert!(engine.remove_layer("route"));
        assert!(engine.get_layer("route").is_none());
    }

    #[test]
    fn removing_marker_hides_its_popup() {
        let mut engine = engine();
        let id = engine.add_marker(marker(engine.viewport().center()));
        engine.add_popup(popup(), id);

        engine.remove_marker(id);
        assert!(engine.popups.is_empty());
    }

    fn geolocate(track_user_location: bool) -> Control {
        Control::Geolocate {
            enable_high_accuracy: true,
            track_user_location,
            show_user_heading: true,
        }
    }

    fn user_at(lon: f64, lat: f64) -> UserLocation {
        UserLocation {
            position: photomap::photomap_types::lonlat!(lon, lat),
            accuracy_m: Some(10.0),
            heading_deg: Some(90.0),
        }
    }

    fn popup() -> Popup {
        let content = photomap::popup::PopupContent {
            title: "t".into(),
            description: "d".into(),
            directions_url: "https://example.com".into(),
        };
        Popup::new(content, 25.0)
    }

    #[test]
    fn tracking_follows_user() {
        let mut engine = engine();
        let id = engine.add_control(geolocate(true));
        let location = user_at(13.6, 46.8);

        engine.set_user_location(location);
        assert!(!engine.is_tracking());
        assert_ne!(engine.viewport().center(), location.position);

        engine.press_control(id);
        assert!(engine.is_tracking());
        assert_eq!(engine.viewport().center(), location.position);

        let moved = user_at(13.61, 46.81);
        engine.set_user_location(moved);
        assert_eq!(engine.viewport().center(), moved.position);

        engine.press_control(id);
        assert!(!engine.is_tracking());
        engine.set_user_location(location);
        assert_eq!(engine.viewport().center(), moved.position);
    }

    #[test]
    fn control_without_tracking_centers_once() {
        let mut engine = engine();
        let id = engine.add_control(geolocate(false));
        let location = user_at(13.6, 46.8);
        engine.set_user_location(location);

        engine.press_control(id);
        assert!(!engine.is_tracking());
        assert_eq!(engine.viewport().center(), location.position);

        engine.set_user_location(user_at(13.61, 46.81));
        assert_eq!(engine.viewport().center(), location.position);
    }

    #[test]
    fn background_click_closes_every_popup() {
        let mut engine = engine();
        let marker_id = engine.add_marker(marker(engine.viewport().center()));
        let first = engine.add_popup(popup(), marker_id);
        let second = engine.add_popup(popup(), marker_id);

        engine.close_all_popups();

        assert!(engine.popups.is_empty());
        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::PopupClosed(first), EngineEvent::PopupClosed(second)]
        );
    }

    #[test]
    fn closing_popup_reports_it_once() {
        let mut engine = engine();
        let marker_id = engine.add_marker(marker(engine.viewport().center()));
        let id = engine.add_popup(popup(), marker_id);

        engine.close_popup(id);
        engine.close_popup(id);
        assert_eq!(engine.drain_events(), vec![EngineEvent::PopupClosed(id)]);
    }

    #[test]
    fn removed_engine_draws_nothing() {
        let mut engine = engine();
        engine.remove();

        let ctx = egui::Context::default();
        run_frame(&ctx, &mut engine);
        assert!(engine.drain_events().is_empty());
    }
}
