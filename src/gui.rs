//! Host screen: toolbar chrome, pointer wiring, texture upload and the
//! import/export side effects. All drawing semantics live in [`crate::canvas`];
//! this module only translates egui events into pointer phases and paints
//! what the canvas core describes.

use crate::canvas::model::{Color, PointerPhase, PreviewShape, Theme, Tool};
use crate::canvas::CanvasView;
use crate::settings::Settings;
use crate::{export, import};
use chrono::Local;
use eframe::egui::{
    self, Color32, ColorImage, Pos2, Rect, Sense, Stroke, TextureHandle, TextureOptions,
};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::PathBuf;

pub struct PaintApp {
    canvas: CanvasView,
    settings: Settings,
    settings_path: String,
    texture: Option<TextureHandle>,
    surface_dirty: bool,
    panel_size: (u32, u32),
    last_pointer: (f32, f32),
    toasts: Toasts,
}

impl PaintApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, settings_path: String) -> Self {
        let theme = if settings.dark_theme {
            Theme::Dark
        } else {
            Theme::Light
        };
        cc.egui_ctx.set_visuals(if settings.dark_theme {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let mut canvas = CanvasView::new(1, 1, theme);
        canvas.set_tool(settings.last_tool);
        canvas.set_stroke_width(settings.last_width);
        if let Some(color) = settings.last_color {
            canvas.set_color(color, color.to_hex_label());
        }

        Self {
            canvas,
            settings,
            settings_path,
            texture: None,
            surface_dirty: true,
            panel_size: (0, 0),
            last_pointer: (0.0, 0.0),
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
        }
    }

    fn add_toast(&mut self, kind: ToastKind, text: String) {
        if !self.settings.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default()
                .duration_in_seconds(self.settings.toast_duration as f64),
        });
    }

    fn save_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.settings.save_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => export::default_save_dir(),
        }
    }

    fn save_drawing(&mut self) {
        let result = self
            .save_dir()
            .and_then(|dir| export::export_surface(self.canvas.surface(), &dir, Local::now()));
        match result {
            Ok(path) => {
                self.add_toast(ToastKind::Success, format!("Saved to \"{}\"", path.display()));
            }
            Err(e) => {
                tracing::error!("failed to save drawing: {e:#}");
                self.add_toast(ToastKind::Error, format!("Save failed: {e}"));
            }
        }
    }

    fn open_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        else {
            return;
        };
        match import::load_image(&path) {
            Ok(img) => {
                let cropped =
                    import::crop_to_aspect(&img, self.canvas.width(), self.canvas.height());
                let scaled =
                    import::fit_to_view(&cropped, self.canvas.width(), self.canvas.height());
                self.canvas.set_surface(&scaled);
                self.surface_dirty = true;
                self.add_toast(ToastKind::Success, format!("Loaded {}", path.display()));
            }
            Err(e) => {
                // The canvas is left untouched on a decode failure.
                tracing::warn!("failed to import image: {e:#}");
                self.add_toast(ToastKind::Error, format!("Could not load image: {e}"));
            }
        }
    }

    fn set_theme(&mut self, dark: bool, ctx: &egui::Context) {
        self.settings.dark_theme = dark;
        self.canvas
            .set_theme(if dark { Theme::Dark } else { Theme::Light });
        ctx.set_visuals(if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let mut tool = self.canvas.tool();
            ui.selectable_value(&mut tool, Tool::Brush, "Brush");
            ui.selectable_value(&mut tool, Tool::Line, "Line");
            ui.selectable_value(&mut tool, Tool::Rect, "Rect");
            ui.selectable_value(&mut tool, Tool::Square, "Square");
            ui.selectable_value(&mut tool, Tool::Circle, "Circle");
            ui.selectable_value(&mut tool, Tool::Triangle, "Triangle");
            if tool != self.canvas.tool() {
                self.canvas.set_tool(tool);
                self.settings.last_tool = tool;
            }
            if self.canvas.tool() == Tool::Triangle {
                let pair = (self.canvas.triangle_touch_count() / 2 + 1).min(3);
                ui.weak(format!("pass {pair}/3"));
            }

            ui.separator();
            let mut color32 = to_color32(self.canvas.color());
            if ui.color_edit_button_srgba(&mut color32).changed() {
                let color = from_color32(color32);
                self.canvas.set_color(color, color.to_hex_label());
                self.settings.last_color = Some(color);
            }
            let mut width = self.canvas.stroke_width();
            if ui
                .add(egui::Slider::new(&mut width, 1.0..=80.0).text("Width"))
                .changed()
            {
                self.canvas.set_stroke_width(width);
                self.settings.last_width = self.canvas.stroke_width();
            }

            ui.separator();
            let mut dark = self.settings.dark_theme;
            if ui.checkbox(&mut dark, "Dark").changed() {
                self.set_theme(dark, ctx);
            }

            ui.separator();
            if ui.button("Clear").clicked() {
                self.canvas.clear();
                self.surface_dirty = true;
            }
            if ui.button("Open…").clicked() {
                self.open_image();
            }
            if ui.button("Save").clicked() {
                self.save_drawing();
            }
        });
    }

    fn canvas_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let avail = ui.available_size();
        let panel = (avail.x.max(1.0) as u32, avail.y.max(1.0) as u32);
        if panel != self.panel_size {
            self.panel_size = panel;
            self.canvas.resize(panel.0, panel.1);
            self.surface_dirty = true;
        }

        if self.surface_dirty || self.texture.is_none() {
            let surface = self.canvas.surface();
            let size = [surface.width() as usize, surface.height() as usize];
            let color_image = ColorImage::from_rgba_unmultiplied(size, surface.as_raw());
            match &mut self.texture {
                Some(tex) => tex.set(color_image, TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("canvas", color_image, TextureOptions::NEAREST))
                }
            }
            self.surface_dirty = false;
        }

        let (response, painter) = ui.allocate_painter(avail, Sense::drag());
        let origin = response.rect.min;
        let to_canvas = |pos: Pos2| (pos.x - origin.x, pos.y - origin.y);
        let to_screen = |p: (f32, f32)| Pos2::new(origin.x + p.0, origin.y + p.1);

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                self.last_pointer = (x, y);
                self.canvas.on_pointer_event(PointerPhase::Start, x, y);
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                self.last_pointer = (x, y);
                self.canvas.on_pointer_event(PointerPhase::Move, x, y);
            }
        }
        if response.drag_stopped() {
            let (x, y) = response
                .interact_pointer_pos()
                .map(to_canvas)
                .unwrap_or(self.last_pointer);
            self.canvas.on_pointer_event(PointerPhase::End, x, y);
            self.surface_dirty = true;
        }

        if let Some(tex) = &self.texture {
            // Paint the surface at its natural size; an imported background
            // that does not match the panel is clipped, not stretched.
            let surface_size = egui::vec2(
                self.canvas.width() as f32,
                self.canvas.height() as f32,
            );
            painter.image(
                tex.id(),
                Rect::from_min_size(origin, surface_size),
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        let stroke = Stroke::new(self.canvas.stroke_width(), to_color32(self.canvas.color()));
        for shape in self.canvas.preview_shapes() {
            match shape {
                PreviewShape::Path(points) => {
                    if let [point] = points.as_slice() {
                        painter.circle_filled(
                            to_screen(*point),
                            stroke.width / 2.0,
                            stroke.color,
                        );
                    }
                    for pair in points.windows(2) {
                        painter.line_segment([to_screen(pair[0]), to_screen(pair[1])], stroke);
                    }
                }
                PreviewShape::Segment { start, end } => {
                    painter.line_segment([to_screen(start), to_screen(end)], stroke);
                }
                PreviewShape::Rect { min, max } => {
                    painter.rect_stroke(
                        Rect::from_min_max(to_screen(min), to_screen(max)),
                        0.0,
                        stroke,
                    );
                }
                PreviewShape::Circle { center, radius } => {
                    painter.circle_stroke(to_screen(center), radius, stroke);
                }
            }
        }
    }
}

impl eframe::App for PaintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui, ctx);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas_panel(ui, ctx);
        });
        self.toasts.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            tracing::warn!("failed to persist settings: {e:#}");
        }
    }
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn from_color32(color: Color32) -> Color {
    Color::from_rgba_array(color.to_srgba_unmultiplied())
}
