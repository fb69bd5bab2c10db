use serde::{Deserialize, Serialize};

/// Drawing tool selected from the toolbar. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Brush,
    Line,
    Rect,
    Square,
    Circle,
    Triangle,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba_array(color: [u8; 4]) -> Self {
        Self::rgba(color[0], color[1], color[2], color[3])
    }

    /// Label in `#AARRGGBB` form, matching what the color picker reports.
    pub fn to_hex_label(self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

/// Light/dark display mode recorded when the canvas is created. Decides the
/// background fill used by clear/resize and the default draw color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn background(self) -> Color {
        match self {
            Theme::Light => Color::WHITE,
            Theme::Dark => Color::rgba(65, 65, 65, 255),
        }
    }

    pub fn default_draw_color(self) -> Color {
        match self {
            Theme::Light => Color::BLACK,
            Theme::Dark => Color::WHITE,
        }
    }
}

/// Anti-aliased round-cap stroke configuration. Persists across tool changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStyle {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

/// Per-gesture transient state. Exists only between a press and its matching
/// release; the triangle tool keeps its own accumulator instead (see
/// [`TriangleGesture`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Freehand path accumulated while the pointer is down.
    Brush { points: Vec<(f32, f32)> },
    /// Two-point drag used by the line, rect, square and circle tools.
    Drag {
        start: (f32, f32),
        current: (f32, f32),
    },
}

/// Accumulated triangle state. A full triangle takes three press/release
/// pairs; the counter is bumped on every Start and every End, so it runs
/// 1..=6 and wraps back to 0 when the triangle is committed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriangleGesture {
    pub touch_count: u8,
    /// First vertex, recorded on the first press.
    pub apex: (f32, f32),
    /// Second vertex, recorded on the first release.
    pub base: (f32, f32),
    /// Point stored by the dead middle pair's release.
    pub candidate: (f32, f32),
    pub current: (f32, f32),
}

/// Shape rendered ephemerally by the host while a gesture is in progress.
/// Nothing here touches the committed surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewShape {
    Path(Vec<(f32, f32)>),
    Segment {
        start: (f32, f32),
        end: (f32, f32),
    },
    Rect {
        min: (f32, f32),
        max: (f32, f32),
    },
    Circle {
        center: (f32, f32),
        radius: f32,
    },
}
