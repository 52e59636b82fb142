pub mod commands;
pub mod frame;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use frame::{HandAngles, HandVisibility, IntroFrame, Phase};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect, Viewport};
