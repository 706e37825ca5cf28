//! egui viewer over the headless engine

use anyhow::{anyhow, Result};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use mapmode::{
    prelude::*,
    ui::{parse_color, show_legend, show_navigation},
};

pub fn run(demo: DemoSpec) -> Result<()> {
    let title = format!("mapmode - {}", demo.name);
    let engine = HeadlessEngine::new(demo.options.camera.to_camera(), Point::new(1000.0, 800.0))
        .with_hit_radius(demo.options.interaction.hit_radius);
    let mut controller = ModeController::new(engine, demo, PageControls::all())?;
    controller.engine_mut().finish_loading();
    controller.pump()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native(
        "mapmode-app",
        options,
        Box::new(move |_cc| Box::new(DemoViewer::new(controller))),
    )
    .map_err(|e| anyhow!("viewer failed: {}", e))
}

struct DemoViewer {
    controller: ModeController<HeadlessEngine>,
    last_pointer: Option<Point>,
    status: String,
}

impl DemoViewer {
    fn new(controller: ModeController<HeadlessEngine>) -> Self {
        Self {
            controller,
            last_pointer: None,
            status: String::new(),
        }
    }

    fn record(&mut self, what: &str, result: mapmode::Result<InteractionOutcome>) {
        match result {
            Ok(outcome) => {
                log::debug!("{}: {:?}", what, outcome);
                self.status = format!("{}: {:?}", what, outcome);
            }
            Err(e) => {
                log::error!("{} failed: {}", what, e);
                self.status = format!("{} failed: {}", what, e);
            }
        }
    }

    fn deliver(&mut self, events: Vec<InteractionEvent>) {
        for event in events {
            let result = self.controller.handle_event(&event);
            if event.kind == InteractionKind::Click {
                self.record(&format!("click on {}", event.layer_id), result);
            } else if let Err(e) = result {
                log::error!("{} on {} failed: {}", event.kind, event.layer_id, e);
            }
        }
    }

    fn page_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.controller.demo().name.clone());
        ui.label(format!("Mode: {}", self.controller.mode()));
        let camera = self.controller.engine().camera();
        ui.label(format!(
            "Center: {:.4}, {:.4} | Zoom: {:.2}",
            camera.center.lat, camera.center.lng, camera.zoom
        ));
        ui.separator();

        let wired = self.controller.demo().page_elements.clone();
        if wired.contains(&PageElement::MaxBoundsToggle) {
            let mut checked = self.controller.page().is_checked(PageElement::MaxBoundsToggle);
            if ui.checkbox(&mut checked, "Max bounds").changed() {
                let result = self.controller.page_action(PageAction::MaxBounds(checked));
                self.record("max bounds", result);
            }
        }
        if wired.contains(&PageElement::LegendToggle) {
            let mut checked = self.controller.page().is_checked(PageElement::LegendToggle);
            if ui.checkbox(&mut checked, "Legends").changed() {
                let result = self.controller.page_action(PageAction::Legends(checked));
                self.record("legends", result);
            }
        }
        if self.controller.page().is_visible(PageElement::BackButton) && ui.button("Back").clicked() {
            let result = self.controller.page_action(PageAction::Back);
            self.record("back", result);
        }

        if let Some(popup) = self.controller.popup().cloned() {
            ui.separator();
            for (label, value, _) in &popup.rows {
                ui.label(format!("{}: {}", label, value));
            }
            if let Some(link) = &popup.link {
                ui.horizontal(|ui| {
                    ui.label(format!("{}:", link.caption));
                    if ui.link(&link.text).clicked() {
                        let result = self.controller.activate_popup_link();
                        self.record("popup link", result);
                    }
                });
            }
            if popup.close_button && ui.button("Close").clicked() {
                self.controller.close_popup();
            }
        }

        ui.separator();
        ui.label(&self.status);
    }

    fn map(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        self.controller
            .engine_mut()
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(230, 230, 230));
        draw_layers(&painter, rect, self.controller.engine());
        if let Some(popup) = self.controller.popup() {
            let anchor = to_screen(rect, self.controller.engine().pixel_of(&popup.position));
            draw_popup(&painter, anchor, &popup.text());
        }

        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        if let Some(pos) = response.hover_pos() {
            let point = local(pos);
            if self.last_pointer != Some(point) {
                self.last_pointer = Some(point);
                let events = self.controller.engine_mut().pointer_move(point);
                self.deliver(events);
            }
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let events = self.controller.engine().click(local(pos));
                self.deliver(events);
            }
        }

        if let Some(button) = self
            .controller
            .navigation()
            .and_then(|nav| show_navigation(ui, rect, nav))
        {
            let result = self.controller.press_nav(button);
            self.record("navigation", result);
        }
        for legend in self.controller.visible_legends() {
            show_legend(ui, rect, &legend.title, &legend.entries);
        }

        let icon = match self.controller.engine().cursor() {
            Cursor::Pointer => egui::CursorIcon::PointingHand,
            Cursor::Default => egui::CursorIcon::Default,
        };
        ui.ctx().set_cursor_icon(icon);
    }
}

impl eframe::App for DemoViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.controller.pump() {
            Ok(outcomes) => {
                for outcome in outcomes {
                    log::debug!("completion: {:?}", outcome);
                }
            }
            Err(e) => log::error!("completion failed: {}", e),
        }

        egui::SidePanel::left("page_panel")
            .resizable(true)
            .show(ctx, |ui| self.page_panel(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.map(ui));
    }
}

fn to_screen(rect: Rect, point: Point) -> Pos2 {
    rect.min + Vec2::new(point.x as f32, point.y as f32)
}

fn draw_layers(painter: &egui::Painter, rect: Rect, engine: &HeadlessEngine) {
    for layer_id in engine.layer_ids() {
        let Some(layer) = engine.layer(&layer_id) else {
            continue;
        };
        for feature in engine.rendered_features(&layer_id) {
            match layer.kind {
                LayerKind::Fill => {
                    let fill = paint_color(layer, "fill-color", &feature).gamma_multiply(0.4);
                    for ring in outer_rings(&feature.geometry) {
                        let points = ring
                            .iter()
                            .map(|p| to_screen(rect, engine.pixel_of(&LatLng::from_lng_lat(*p))))
                            .collect();
                        painter.add(egui::epaint::PathShape {
                            points,
                            closed: true,
                            fill,
                            stroke: Stroke::new(1.0, Color32::from_gray(90)),
                        });
                    }
                }
                LayerKind::Circle => {
                    let Some(anchor) = feature.anchor() else {
                        continue;
                    };
                    let center = to_screen(rect, engine.pixel_of(&anchor));
                    let color = paint_color(layer, "circle-color", &feature).gamma_multiply(0.75);
                    let radius = paint_number(layer, "circle-radius", &feature).unwrap_or(8.0);
                    painter.circle(center, radius, color, Stroke::new(1.0, Color32::WHITE));
                }
                LayerKind::Symbol => {
                    let Some(anchor) = feature.anchor() else {
                        continue;
                    };
                    let template = layer.layout["text-field"].as_str().unwrap_or_default();
                    let size = layer.layout["text-size"].as_f64().unwrap_or(10.0) as f32;
                    painter.text(
                        to_screen(rect, engine.pixel_of(&anchor)),
                        Align2::CENTER_CENTER,
                        fill_template(template, &feature),
                        FontId::proportional(size),
                        Color32::BLACK,
                    );
                }
            }
        }
    }
}

fn outer_rings(geometry: &Geometry) -> Vec<&Vec<[f64; 2]>> {
    match geometry {
        Geometry::Polygon { coordinates } => coordinates.first().into_iter().collect(),
        Geometry::MultiPolygon { coordinates } => {
            coordinates.iter().filter_map(|polygon| polygon.first()).collect()
        }
        _ => Vec::new(),
    }
}

fn paint_color(layer: &LayerSpec, key: &str, feature: &Feature) -> Color32 {
    let value = &layer.paint[key];
    let color = match StepExpression::from_expression(value) {
        Some(step) => {
            let input = feature.property_f64(&step.property).unwrap_or(0.0);
            step.evaluate(input).as_str().and_then(parse_color)
        }
        None => value.as_str().and_then(parse_color),
    };
    color.unwrap_or(Color32::from_rgb(81, 187, 214))
}

fn paint_number(layer: &LayerSpec, key: &str, feature: &Feature) -> Option<f32> {
    let value = &layer.paint[key];
    match StepExpression::from_expression(value) {
        Some(step) => {
            let input = feature.property_f64(&step.property).unwrap_or(0.0);
            step.evaluate(input).as_f64().map(|r| r as f32)
        }
        None => value.as_f64().map(|r| r as f32),
    }
}

/// `"{price}"` -> the feature's price
fn fill_template(template: &str, feature: &Feature) -> String {
    match template.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        Some(key) => feature.property_text(key).unwrap_or_default(),
        None => template.to_string(),
    }
}

fn draw_popup(painter: &egui::Painter, anchor: Pos2, text: &str) {
    let galley = painter.layout_no_wrap(text.to_string(), FontId::proportional(12.0), Color32::BLACK);
    let frame = Rect::from_min_size(
        anchor + Vec2::new(-galley.size().x / 2.0 - 6.0, -galley.size().y - 18.0),
        galley.size() + Vec2::splat(12.0),
    );
    painter.rect_filled(frame, 3.0, Color32::WHITE);
    painter.rect_stroke(frame, 3.0, Stroke::new(1.0, Color32::from_gray(120)));
    painter.galley(frame.min + Vec2::splat(6.0), galley, Color32::BLACK);
}
