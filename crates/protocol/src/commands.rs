use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for every intro frame. Renderers
/// consume this list sequentially; each command carries all the data it
/// needs, including its own opacity in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill the given rectangle.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        opacity: f32,
    },

    /// Draw a line segment with round caps.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
        opacity: f32,
    },

    /// Stroke a circle outline.
    DrawCircle {
        center: Point,
        radius: f64,
        color: ThemeToken,
        width: f64,
        opacity: f32,
    },

    /// Stroke a rectangle outline with rounded corners.
    DrawRoundedRect {
        rect: Rect,
        corner_radius: f64,
        color: ThemeToken,
        width: f64,
        opacity: f32,
    },

    /// Draw a text string anchored at a position.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
        opacity: f32,
    },

    /// Begin a logical group (the face, a hand, the overlay). Renderers may
    /// use this for layering or hit regions.
    BeginGroup { id: SharedStr },

    /// End the current group.
    EndGroup,
}

impl RenderCommand {
    /// Opacity of a drawing command, `None` for structural commands.
    pub fn opacity(&self) -> Option<f32> {
        match self {
            Self::DrawRect { opacity, .. }
            | Self::DrawLine { opacity, .. }
            | Self::DrawCircle { opacity, .. }
            | Self::DrawRoundedRect { opacity, .. }
            | Self::DrawText { opacity, .. } => Some(*opacity),
            Self::BeginGroup { .. } | Self::EndGroup => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
