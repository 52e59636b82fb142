use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Grid,

    // Clock face
    Tick,
    TickMuted,
    Hand,
    SecondHand,
    Pivot,

    // Overlay text
    TextPrimary,
    TextSecondary,
    TextMuted,

    SkipButton,
}

impl ThemeToken {
    /// Default palette: white strokes on black, with muted minor ticks.
    pub fn default_color(self) -> Color {
        match self {
            Self::Background => Color::rgba(0.0, 0.0, 0.0, 1.0),
            Self::Grid => Color::rgba(0.5, 0.5, 0.5, 0.024),
            Self::Tick => Color::rgba(1.0, 1.0, 1.0, 0.9),
            Self::TickMuted => Color::rgba(1.0, 1.0, 1.0, 0.2),
            Self::Hand => Color::rgba(1.0, 1.0, 1.0, 0.95),
            Self::SecondHand => Color::rgba(1.0, 1.0, 1.0, 1.0),
            Self::Pivot => Color::rgba(1.0, 1.0, 1.0, 0.5),
            Self::TextPrimary => Color::rgba(1.0, 1.0, 1.0, 1.0),
            // zinc-500 / zinc-600
            Self::TextSecondary => Color::rgba(0.443, 0.443, 0.478, 1.0),
            Self::TextMuted => Color::rgba(0.322, 0.322, 0.357, 1.0),
            Self::SkipButton => Color::rgba(0.322, 0.322, 0.357, 1.0),
        }
    }
}
