//! Clock intro: a multi-phase animated analog clock that draws its face,
//! catches up with the wall clock, and hands control back to the host page.
//!
//! ```text
//!   host events ──▶ ClockIntroController ──▶ machine::transition (pure)
//!   (frames,             │                          │
//!    timers,             ▼                          ▼
//!    input)        FrameScheduler /            IntroState ──▶ IntroFrame
//!                  ScrollHost effects                          │
//!                                                              ▼
//!                                                 render::render_intro ──▶ RenderCommand[]
//! ```

pub mod angles;
pub mod clock;
pub mod config;
pub mod controller;
pub mod easing;
pub mod machine;
pub mod render;
pub mod scheduler;
pub mod scroll;
pub mod svg;
pub mod ticks;

pub use angles::{WallTime, WallTimeError};
pub use clock::{FixedClock, LocalClock, WallClock};
pub use config::{ConfigError, IntroConfig, IntroLabels};
pub use controller::ClockIntroController;
pub use machine::{DismissInput, Effect, IntroEvent, IntroKey, IntroState, Step, TimerKind};
pub use scheduler::{FrameHandle, FrameScheduler, QueuedScheduler, TimerHandle};
pub use scroll::{PageScroll, ScrollHost};
pub use ticks::RevealedTicks;
