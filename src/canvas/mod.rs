//! Canvas core: the persistent raster surface, the active tool and brush
//! style, and the pointer-driven gesture state machine. This module performs
//! no I/O and never blocks; the host screen feeds it pointer events and
//! paints whatever `surface()` and `preview_shapes()` describe.

pub mod model;
pub mod raster;

use image::RgbaImage;
use model::{BrushStyle, Color, Gesture, PointerPhase, PreviewShape, Theme, Tool, TriangleGesture};

/// Minimum |dx| or |dy| before a line commit is considered intentional.
/// A tap below this threshold commits nothing.
pub const TOUCH_TOLERANCE: f32 = 4.0;

/// Squared distance below which consecutive brush points are dropped.
const MIN_POINT_DIST_SQ: f32 = 9.0;

const DEFAULT_STROKE_WIDTH: f32 = 25.0;

pub struct CanvasView {
    surface: RgbaImage,
    theme: Theme,
    tool: Tool,
    style: BrushStyle,
    color_label: String,
    gesture: Option<Gesture>,
    triangle: TriangleGesture,
}

impl CanvasView {
    pub fn new(width: u32, height: u32, theme: Theme) -> Self {
        let color = theme.default_draw_color();
        Self {
            surface: raster::filled_surface(width, height, theme.background()),
            theme,
            tool: Tool::Brush,
            style: BrushStyle {
                color,
                width: DEFAULT_STROKE_WIDTH,
            },
            color_label: color.to_hex_label(),
            gesture: None,
            triangle: TriangleGesture::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Record a display-mode change. Only affects future clear/resize fills;
    /// committed pixels are left alone.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn color(&self) -> Color {
        self.style.color
    }

    pub fn color_label(&self) -> &str {
        &self.color_label
    }

    pub fn set_color(&mut self, color: Color, label: impl Into<String>) {
        self.style.color = color;
        self.color_label = label.into();
    }

    pub fn stroke_width(&self) -> f32 {
        self.style.width
    }

    /// Non-finite or non-positive widths are clamped rather than rejected.
    pub fn set_stroke_width(&mut self, width: f32) {
        if width.is_finite() {
            self.style.width = width.max(1.0);
        } else {
            tracing::warn!("ignoring non-finite stroke width {width}");
        }
    }

    /// Reallocate the surface at the given dimensions, filled with the theme
    /// background. Any in-flight gesture is invalidated.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface = raster::filled_surface(width, height, self.theme.background());
        self.gesture = None;
        self.triangle = TriangleGesture::default();
    }

    /// Refill the surface at its current dimensions.
    pub fn clear(&mut self) {
        self.resize(self.width(), self.height());
    }

    /// Install a copy of `image` as the new surface. The caller keeps its
    /// buffer; the canvas never aliases it.
    pub fn set_surface(&mut self, image: &RgbaImage) {
        self.surface = image.clone();
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Counter used by the triangle tool, exposed so hosts can show progress.
    /// It is 0 whenever no triangle is in flight.
    pub fn triangle_touch_count(&self) -> u8 {
        self.triangle.touch_count
    }

    /// Entry point for all pointer input. Phases arrive as
    /// press / move / release with canvas-local float coordinates.
    pub fn on_pointer_event(&mut self, phase: PointerPhase, x: f32, y: f32) {
        let point = (x, y);
        match self.tool {
            Tool::Brush => self.handle_brush(phase, point),
            Tool::Line | Tool::Rect | Tool::Square | Tool::Circle => {
                self.handle_drag(phase, point)
            }
            Tool::Triangle => self.handle_triangle(phase, point),
        }
    }

    fn handle_brush(&mut self, phase: PointerPhase, point: (f32, f32)) {
        match phase {
            PointerPhase::Start => {
                self.gesture = Some(Gesture::Brush {
                    points: vec![point],
                });
            }
            PointerPhase::Move => {
                if let Some(Gesture::Brush { points }) = self.gesture.as_mut() {
                    if should_append_point(points.last().copied(), point) {
                        points.push(point);
                    }
                }
            }
            PointerPhase::End => {
                if let Some(Gesture::Brush { mut points }) = self.gesture.take() {
                    // The release point always lands, even below the move
                    // filter's threshold, so short stroke tails are kept.
                    points.push(point);
                    raster::draw_polyline(
                        &mut self.surface,
                        &points,
                        self.style.color,
                        self.style.width,
                    );
                }
            }
        }
    }

    fn handle_drag(&mut self, phase: PointerPhase, point: (f32, f32)) {
        match phase {
            PointerPhase::Start => {
                self.gesture = Some(Gesture::Drag {
                    start: point,
                    current: point,
                });
            }
            PointerPhase::Move => {
                if let Some(Gesture::Drag { start, current }) = self.gesture.as_mut() {
                    *current = match self.tool {
                        Tool::Square => adjust_square(*start, point),
                        _ => point,
                    };
                }
            }
            PointerPhase::End => {
                if let Some(Gesture::Drag { start, .. }) = self.gesture.take() {
                    // The release position wins over the last tracked move.
                    let end = match self.tool {
                        Tool::Square => adjust_square(start, point),
                        _ => point,
                    };
                    self.commit_drag(start, end);
                }
            }
        }
    }

    fn commit_drag(&mut self, start: (f32, f32), end: (f32, f32)) {
        let color = self.style.color;
        let width = self.style.width;
        match self.tool {
            Tool::Line => {
                if exceeds_tolerance(start, end) {
                    raster::draw_segment(&mut self.surface, start, end, color, width);
                }
            }
            Tool::Rect | Tool::Square => {
                let (min, max) = corner_bounds(start, end);
                raster::draw_rect_outline(&mut self.surface, min, max, color, width);
            }
            Tool::Circle => {
                let radius = euclidean_distance(start, end);
                raster::draw_circle_outline(&mut self.surface, start, radius, color, width);
            }
            Tool::Brush | Tool::Triangle => unreachable!("not drag tools"),
        }
    }

    /// Triangle gestures span three press/release pairs. The counter is
    /// bumped on every press and every release:
    /// 1/2 record the apex and base and commit the first edge, 3/4 are the
    /// dead re-aim pair (4 stores its point as the third-vertex candidate),
    /// 5 enables the closing preview and 6 commits the two remaining edges
    /// and resets the counter.
    fn handle_triangle(&mut self, phase: PointerPhase, point: (f32, f32)) {
        match phase {
            PointerPhase::Start => {
                self.triangle.touch_count = self.triangle.touch_count.saturating_add(1);
                self.triangle.current = point;
                if self.triangle.touch_count == 1 {
                    self.triangle.apex = point;
                }
            }
            PointerPhase::Move => {
                self.triangle.current = point;
            }
            PointerPhase::End => {
                self.triangle.touch_count = self.triangle.touch_count.saturating_add(1);
                self.triangle.current = point;
                let color = self.style.color;
                let width = self.style.width;
                match self.triangle.touch_count {
                    2 => {
                        self.triangle.base = point;
                        raster::draw_segment(
                            &mut self.surface,
                            self.triangle.apex,
                            point,
                            color,
                            width,
                        );
                    }
                    4 => {
                        self.triangle.candidate = point;
                    }
                    6 => {
                        raster::draw_segment(
                            &mut self.surface,
                            point,
                            self.triangle.base,
                            color,
                            width,
                        );
                        raster::draw_segment(
                            &mut self.surface,
                            point,
                            self.triangle.apex,
                            color,
                            width,
                        );
                        self.triangle = TriangleGesture::default();
                    }
                    _ => {}
                }
            }
        }
    }

    /// Ephemeral shapes to paint on top of the committed surface while a
    /// gesture is in progress. Empty when idle.
    pub fn preview_shapes(&self) -> Vec<PreviewShape> {
        let mut shapes = Vec::new();
        match (&self.gesture, self.tool) {
            (Some(Gesture::Brush { points }), _) => {
                shapes.push(PreviewShape::Path(points.clone()));
            }
            (Some(Gesture::Drag { start, current }), Tool::Line) => {
                if exceeds_tolerance(*start, *current) {
                    shapes.push(PreviewShape::Segment {
                        start: *start,
                        end: *current,
                    });
                }
            }
            (Some(Gesture::Drag { start, current }), Tool::Rect | Tool::Square) => {
                let (min, max) = corner_bounds(*start, *current);
                shapes.push(PreviewShape::Rect { min, max });
            }
            (Some(Gesture::Drag { start, current }), Tool::Circle) => {
                shapes.push(PreviewShape::Circle {
                    center: *start,
                    radius: euclidean_distance(*start, *current),
                });
            }
            _ => {}
        }
        if self.tool == Tool::Triangle {
            match self.triangle.touch_count {
                1 => shapes.push(PreviewShape::Segment {
                    start: self.triangle.apex,
                    end: self.triangle.current,
                }),
                5 => {
                    shapes.push(PreviewShape::Segment {
                        start: self.triangle.current,
                        end: self.triangle.base,
                    });
                    shapes.push(PreviewShape::Segment {
                        start: self.triangle.current,
                        end: self.triangle.apex,
                    });
                }
                _ => {}
            }
        }
        shapes
    }
}

fn should_append_point(last: Option<(f32, f32)>, point: (f32, f32)) -> bool {
    let Some((last_x, last_y)) = last else {
        return true;
    };
    let dx = point.0 - last_x;
    let dy = point.1 - last_y;
    dx * dx + dy * dy >= MIN_POINT_DIST_SQ
}

fn exceeds_tolerance(start: (f32, f32), end: (f32, f32)) -> bool {
    (end.0 - start.0).abs() >= TOUCH_TOLERANCE || (end.1 - start.1).abs() >= TOUCH_TOLERANCE
}

fn corner_bounds(a: (f32, f32), b: (f32, f32)) -> ((f32, f32), (f32, f32)) {
    ((a.0.min(b.0), a.1.min(b.1)), (a.0.max(b.0), a.1.max(b.1)))
}

fn euclidean_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Snap the drag endpoint so the spanned box has equal sides of
/// `max(|dx|, |dy|)`, preserving the drag direction's quadrant.
fn adjust_square(start: (f32, f32), point: (f32, f32)) -> (f32, f32) {
    let side = (start.0 - point.0).abs().max((start.1 - point.1).abs());
    let x = if start.0 - point.0 < 0.0 {
        start.0 + side
    } else {
        start.0 - side
    };
    let y = if start.1 - point.1 < 0.0 {
        start.1 + side
    } else {
        start.1 - side
    };
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{PointerPhase::*, Theme, Tool};

    fn canvas(tool: Tool) -> CanvasView {
        let mut view = CanvasView::new(200, 200, Theme::Light);
        view.set_tool(tool);
        view.set_stroke_width(3.0);
        view
    }

    fn press_release(view: &mut CanvasView, start: (f32, f32), end: (f32, f32)) {
        view.on_pointer_event(Start, start.0, start.1);
        view.on_pointer_event(Move, end.0, end.1);
        view.on_pointer_event(End, end.0, end.1);
    }

    #[test]
    fn square_adjustment_picks_longest_delta_and_quadrant() {
        assert_eq!(adjust_square((0.0, 0.0), (30.0, 80.0)), (80.0, 80.0));
        assert_eq!(adjust_square((0.0, 0.0), (-30.0, 80.0)), (-80.0, 80.0));
        assert_eq!(adjust_square((100.0, 100.0), (60.0, 90.0)), (60.0, 60.0));
    }

    #[test]
    fn corner_bounds_are_order_independent() {
        assert_eq!(
            corner_bounds((50.0, 80.0), (10.0, 10.0)),
            corner_bounds((10.0, 10.0), (50.0, 80.0))
        );
    }

    #[test]
    fn circle_radius_is_euclidean() {
        assert_eq!(euclidean_distance((0.0, 0.0), (3.0, 4.0)), 5.0);
    }

    #[test]
    fn gesture_state_is_empty_after_release() {
        for tool in [Tool::Brush, Tool::Line, Tool::Rect, Tool::Square, Tool::Circle] {
            let mut view = canvas(tool);
            view.on_pointer_event(Start, 10.0, 10.0);
            assert!(view.gesture_active(), "{tool:?} should track its gesture");
            view.on_pointer_event(Move, 40.0, 40.0);
            view.on_pointer_event(End, 40.0, 40.0);
            assert!(!view.gesture_active(), "{tool:?} should reset on release");
        }
    }

    #[test]
    fn line_below_tolerance_commits_nothing() {
        let mut view = canvas(Tool::Line);
        let before = view.surface().clone();
        press_release(&mut view, (50.0, 50.0), (52.0, 52.0));
        assert_eq!(view.surface(), &before);
    }

    #[test]
    fn resize_discards_content_and_gesture() {
        let mut view = canvas(Tool::Brush);
        press_release(&mut view, (10.0, 10.0), (100.0, 100.0));
        view.on_pointer_event(Start, 5.0, 5.0);
        view.resize(120, 90);
        assert_eq!((view.width(), view.height()), (120, 90));
        assert!(!view.gesture_active());
        let background = Theme::Light.background().to_rgba_array();
        assert!(view.surface().pixels().all(|p| p.0 == background));
    }

    #[test]
    fn stroke_width_setter_clamps_bad_values() {
        let mut view = canvas(Tool::Brush);
        view.set_stroke_width(-4.0);
        assert_eq!(view.stroke_width(), 1.0);
        view.set_stroke_width(f32::NAN);
        assert_eq!(view.stroke_width(), 1.0);
        view.set_stroke_width(12.0);
        assert_eq!(view.stroke_width(), 12.0);
    }

    #[test]
    fn set_surface_copies_the_callers_buffer() {
        let mut view = canvas(Tool::Brush);
        let mut donor = raster::filled_surface(200, 200, Color::rgba(1, 2, 3, 255));
        view.set_surface(&donor);
        donor.put_pixel(0, 0, image::Rgba([9, 9, 9, 255]));
        assert_eq!(view.surface().get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn brush_preview_exposes_the_live_path() {
        let mut view = canvas(Tool::Brush);
        view.on_pointer_event(Start, 10.0, 10.0);
        view.on_pointer_event(Move, 20.0, 20.0);
        match view.preview_shapes().as_slice() {
            [PreviewShape::Path(points)] => assert_eq!(points.len(), 2),
            other => panic!("unexpected preview {other:?}"),
        }
    }

    #[test]
    fn brush_move_filters_sub_threshold_points() {
        let mut view = canvas(Tool::Brush);
        view.on_pointer_event(Start, 10.0, 10.0);
        view.on_pointer_event(Move, 11.0, 10.0);
        view.on_pointer_event(Move, 15.0, 10.0);
        match view.preview_shapes().as_slice() {
            [PreviewShape::Path(points)] => {
                assert_eq!(points, &vec![(10.0, 10.0), (15.0, 10.0)]);
            }
            other => panic!("unexpected preview {other:?}"),
        }
    }

    #[test]
    fn brush_release_commits_the_final_short_segment() {
        let mut view = canvas(Tool::Brush);
        view.on_pointer_event(Start, 10.0, 10.0);
        view.on_pointer_event(Move, 30.0, 10.0);
        // Release 2 px past the last tracked point, below the move filter.
        view.on_pointer_event(End, 32.0, 10.0);
        let background = Theme::Light.background().to_rgba_array();
        assert_ne!(view.surface().get_pixel(32, 10).0, background);
    }

    #[test]
    fn triangle_preview_follows_the_documented_phases() {
        let mut view = canvas(Tool::Triangle);
        view.on_pointer_event(Start, 0.0, 0.0);
        assert_eq!(view.preview_shapes().len(), 1, "first pair shows one edge");
        view.on_pointer_event(End, 10.0, 0.0);
        assert!(view.preview_shapes().is_empty());

        view.on_pointer_event(Start, 99.0, 99.0);
        assert!(view.preview_shapes().is_empty(), "dead pair previews nothing");
        view.on_pointer_event(End, 99.0, 99.0);

        view.on_pointer_event(Start, 5.0, 10.0);
        assert_eq!(view.preview_shapes().len(), 2, "closing pair shows both edges");
        view.on_pointer_event(End, 5.0, 10.0);
        assert!(view.preview_shapes().is_empty());
        assert_eq!(view.triangle_touch_count(), 0);
    }
}
