use serde::Serialize;

use crate::color::Color;

/// One drawing command in an app's `draw` list.
///
/// The device tells the shapes apart by their field names, so each variant
/// serializes as a flat object without a tag. `Rect`/`FilledRect` and
/// `Circle`/`FilledCircle` carry the same fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DrawInstruction {
    Pixel {
        x: i32,
        y: i32,
        cl: Color,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        cl: Color,
    },
    /// Outline with its top left corner at (x, y).
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        cl: Color,
    },
    FilledRect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        cl: Color,
    },
    /// Outline centered on (x, y).
    Circle {
        x: i32,
        y: i32,
        r: i32,
        cl: Color,
    },
    FilledCircle {
        x: i32,
        y: i32,
        r: i32,
        cl: Color,
    },
    Text {
        x: i32,
        y: i32,
        t: String,
        cl: Color,
    },
    /// Bitmap of `w` by `h` pixels drawn from its top left corner. `bmp` holds
    /// the pixel colors as strings in whatever encoding the caller chose and is
    /// sent unchanged.
    Bitmap {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        bmp: Vec<String>,
    },
}

impl DrawInstruction {
    pub fn pixel(x: i32, y: i32, cl: Color) -> DrawInstruction {
        return DrawInstruction::Pixel { x, y, cl };
    }

    pub fn line(x0: i32, y0: i32, x1: i32, y1: i32, cl: Color) -> DrawInstruction {
        return DrawInstruction::Line { x0, y0, x1, y1, cl };
    }

    pub fn rect(x: i32, y: i32, w: i32, h: i32, cl: Color) -> DrawInstruction {
        return DrawInstruction::Rect { x, y, w, h, cl };
    }

    pub fn filled_rect(x: i32, y: i32, w: i32, h: i32, cl: Color) -> DrawInstruction {
        return DrawInstruction::FilledRect { x, y, w, h, cl };
    }

    pub fn circle(x: i32, y: i32, r: i32, cl: Color) -> DrawInstruction {
        return DrawInstruction::Circle { x, y, r, cl };
    }

    pub fn filled_circle(x: i32, y: i32, r: i32, cl: Color) -> DrawInstruction {
        return DrawInstruction::FilledCircle { x, y, r, cl };
    }

    pub fn text(x: i32, y: i32, t: impl Into<String>, cl: Color) -> DrawInstruction {
        return DrawInstruction::Text {
            x,
            y,
            t: t.into(),
            cl,
        };
    }

    pub fn bitmap(x: i32, y: i32, w: i32, h: i32, bmp: Vec<String>) -> DrawInstruction {
        return DrawInstruction::Bitmap { x, y, w, h, bmp };
    }

    /// The drawing color; bitmaps carry their own pixels instead.
    pub fn color(&self) -> Option<Color> {
        match self {
            DrawInstruction::Pixel { cl, .. }
            | DrawInstruction::Line { cl, .. }
            | DrawInstruction::Rect { cl, .. }
            | DrawInstruction::FilledRect { cl, .. }
            | DrawInstruction::Circle { cl, .. }
            | DrawInstruction::FilledCircle { cl, .. }
            | DrawInstruction::Text { cl, .. } => Some(*cl),
            DrawInstruction::Bitmap { .. } => None,
        }
    }
}
