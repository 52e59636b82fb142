//! The intro as a pure state machine.
//!
//! [`transition`] takes the current [`IntroState`] and one [`IntroEvent`]
//! and returns the next state plus the [`Effect`]s the host must carry out
//! (request a frame, start a timer, lock scrolling, ...). Nothing in here
//! touches a clock or a scheduler, so every phase can be driven and
//! inspected without a rendering surface.
//!
//! Phase flow:
//!
//! ```text
//!   Idle ──Boot timer──▶ HandGrowth ──frames──▶ (grown) ──GrowthPause──▶ TickReveal
//!     ──frames──▶ (swept) ──SweepPause──▶ SyncToLiveTime ──frames──▶ live
//!     ──Ready timer──▶ ready ──dismissal──▶ complete ──Exit timer──▶ NotifyComplete
//! ```

use clock_intro_protocol::{HandAngles, HandVisibility, IntroFrame, Phase};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::angles::{self, WallTime};
use crate::config::IntroConfig;
use crate::easing::{ease_in_out_quad, ease_out_cubic, progress};
use crate::ticks::RevealedTicks;

/// Full length of the minute hand, in percent.
pub const FULL_HAND_LENGTH: f64 = 100.0;

/// The fixed delays the host schedules on the machine's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    Boot,
    GrowthPause,
    SweepPause,
    Ready,
    Exit,
}

impl TimerKind {
    pub const ALL: [TimerKind; 5] = [
        TimerKind::Boot,
        TimerKind::GrowthPause,
        TimerKind::SweepPause,
        TimerKind::Ready,
        TimerKind::Exit,
    ];
}

/// Keys that can dismiss the intro. Anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroKey {
    Enter,
    Space,
    Escape,
    Other,
}

impl IntroKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }

    fn dismisses(self) -> bool {
        !matches!(self, Self::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DismissInput {
    /// A click; `on_control` is set when it landed on an interactive control.
    Click { on_control: bool },
    Wheel,
    TouchStart { on_control: bool },
    Key(IntroKey),
    /// The explicit skip affordance.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IntroEvent {
    Mount,
    /// An animation frame. `now_ms` is the host's monotonic frame timestamp;
    /// `wall` is the local time of day sampled for the same frame.
    Frame { now_ms: f64, wall: WallTime },
    Timer { kind: TimerKind, now_ms: f64 },
    Input(DismissInput),
    Unmount,
}

/// Work the host must perform after a transition, in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Ask for one animation frame. Replaces any outstanding request.
    RequestFrame,
    CancelFrame,
    StartTimer { kind: TimerKind, delay_ms: f64 },
    CancelTimer(TimerKind),
    /// Suppress the default action of the input being handled (page scroll,
    /// key activation).
    PreventDefault,
    LockScroll,
    UnlockScroll,
    /// Invoke the host's completion callback.
    NotifyComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Fresh,
    Mounted,
    Unmounted,
}

/// Catch-up sweep targets, captured once when the hands start moving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncTargets {
    pub angles: HandAngles,
}

/// Timing sub-state of the active phase. Start timestamps are set when the
/// phase is entered; nothing is lazily discovered on a first frame except
/// the sync targets, which need the wall time at the moment motion starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhaseClock {
    /// Waiting for the boot timer.
    Booting,
    Growing { start_ms: f64 },
    /// Fully grown, waiting for the growth pause.
    Grown,
    Sweeping { start_ms: f64 },
    /// Full turn done, waiting for the sweep pause.
    Swept,
    Syncing {
        start_ms: f64,
        targets: Option<SyncTargets>,
        live_second: bool,
    },
    /// Hands track the wall clock every frame.
    Live,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroState {
    pub phase: Phase,
    pub angles: HandAngles,
    pub hands_visible: HandVisibility,
    pub minute_hand_length: f64,
    pub revealed_ticks: RevealedTicks,
    /// Snapshot of the live time, set once the hands go live.
    pub current_time: Option<WallTime>,
    pub is_live: bool,
    pub is_ready: bool,
    pub is_complete: bool,
    pub completion_notified: bool,
    pub lifecycle: Lifecycle,
    pub clock: PhaseClock,
}

impl Default for IntroState {
    fn default() -> Self {
        Self::new()
    }
}

impl IntroState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            angles: HandAngles::default(),
            hands_visible: HandVisibility::default(),
            minute_hand_length: 0.0,
            revealed_ticks: RevealedTicks::new(),
            current_time: None,
            is_live: false,
            is_ready: false,
            is_complete: false,
            completion_notified: false,
            lifecycle: Lifecycle::Fresh,
            clock: PhaseClock::Booting,
        }
    }

    /// Whether the skip affordance is offered.
    pub fn skip_available(&self) -> bool {
        self.phase >= Phase::HandGrowth && !self.is_ready && !self.is_complete
    }

    /// Whether general dismissal input (click, wheel, touch, keys) is
    /// currently listened for.
    pub fn accepts_dismissal(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted && self.is_ready && !self.is_complete
    }

    /// Snapshot for the rendering surface.
    pub fn frame(&self) -> IntroFrame {
        IntroFrame {
            phase: self.phase,
            angles: self.angles,
            hands_visible: self.hands_visible,
            minute_hand_length: self.minute_hand_length,
            revealed_ticks: self.revealed_ticks.iter().collect(),
            time_label: self
                .current_time
                .as_ref()
                .filter(|_| self.is_live)
                .map(WallTime::label),
            is_live: self.is_live,
            is_ready: self.is_ready,
            is_complete: self.is_complete,
            skip_visible: self.skip_available(),
        }
    }
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: IntroState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn unchanged(state: IntroState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Advance the intro by one event.
pub fn transition(state: IntroState, event: IntroEvent, config: &IntroConfig) -> Step {
    match (state.lifecycle, event) {
        (Lifecycle::Fresh, IntroEvent::Mount) => mount(state, config),
        (Lifecycle::Mounted, IntroEvent::Unmount) => unmount(state),
        (Lifecycle::Mounted, IntroEvent::Frame { now_ms, wall }) => {
            on_frame(state, now_ms, wall, config)
        }
        (Lifecycle::Mounted, IntroEvent::Timer { kind, now_ms }) => on_timer(state, kind, now_ms),
        (Lifecycle::Mounted, IntroEvent::Input(input)) => on_input(state, input, config),
        (lifecycle, event) => {
            trace!("ignoring {event:?} while {lifecycle:?}");
            Step::unchanged(state)
        }
    }
}

fn mount(mut state: IntroState, config: &IntroConfig) -> Step {
    state.lifecycle = Lifecycle::Mounted;
    debug!("intro mounted, boot in {}ms", config.boot_delay_ms);
    Step {
        state,
        effects: vec![
            Effect::LockScroll,
            Effect::StartTimer {
                kind: TimerKind::Boot,
                delay_ms: config.boot_delay_ms,
            },
        ],
    }
}

fn unmount(mut state: IntroState) -> Step {
    state.lifecycle = Lifecycle::Unmounted;
    debug!("intro unmounted in {:?}", state.phase);
    let mut effects = vec![Effect::CancelFrame];
    effects.extend(TimerKind::ALL.into_iter().map(Effect::CancelTimer));
    effects.push(Effect::UnlockScroll);
    Step { state, effects }
}

fn on_timer(mut state: IntroState, kind: TimerKind, now_ms: f64) -> Step {
    let mut effects = Vec::new();
    match (kind, state.clock) {
        (TimerKind::Boot, PhaseClock::Booting) => {
            enter_phase(&mut state, Phase::HandGrowth);
            state.hands_visible.minute = true;
            state.angles.minute = 0.0;
            state.minute_hand_length = 0.0;
            state.clock = PhaseClock::Growing { start_ms: now_ms };
            effects.extend([Effect::CancelFrame, Effect::RequestFrame]);
        }
        (TimerKind::GrowthPause, PhaseClock::Grown) => {
            enter_phase(&mut state, Phase::TickReveal);
            state.clock = PhaseClock::Sweeping { start_ms: now_ms };
            effects.extend([Effect::CancelFrame, Effect::RequestFrame]);
        }
        (TimerKind::SweepPause, PhaseClock::Swept) => {
            enter_phase(&mut state, Phase::SyncToLiveTime);
            state.hands_visible = HandVisibility::ALL;
            state.clock = PhaseClock::Syncing {
                start_ms: now_ms,
                targets: None,
                live_second: false,
            };
            effects.extend([Effect::CancelFrame, Effect::RequestFrame]);
        }
        (TimerKind::Ready, PhaseClock::Live) if !state.is_ready => {
            state.is_ready = true;
            debug!("intro ready for dismissal");
        }
        (TimerKind::Exit, _) if state.is_complete && !state.completion_notified => {
            state.completion_notified = true;
            info!("intro finished");
            effects.push(Effect::NotifyComplete);
        }
        (kind, clock) => {
            trace!("stale {kind:?} timer in {clock:?}");
        }
    }
    Step { state, effects }
}

fn enter_phase(state: &mut IntroState, next: Phase) {
    debug_assert!(next > state.phase, "phase must advance");
    debug!("phase {:?} -> {:?}", state.phase, next);
    state.phase = next;
}

fn on_frame(mut state: IntroState, now_ms: f64, wall: WallTime, config: &IntroConfig) -> Step {
    let mut effects = Vec::new();
    match state.clock {
        PhaseClock::Growing { start_ms } => {
            let t = progress(now_ms - start_ms, config.growth_ms);
            if t < 1.0 {
                state.minute_hand_length = ease_out_cubic(t) * FULL_HAND_LENGTH;
                effects.push(Effect::RequestFrame);
            } else {
                state.minute_hand_length = FULL_HAND_LENGTH;
                state.clock = PhaseClock::Grown;
                effects.push(Effect::StartTimer {
                    kind: TimerKind::GrowthPause,
                    delay_ms: config.growth_pause_ms,
                });
            }
        }
        PhaseClock::Sweeping { start_ms } => {
            let t = progress(now_ms - start_ms, config.sweep_ms);
            let sweep = 360.0 * ease_in_out_quad(t);
            state.angles.minute = sweep;
            let added = state
                .revealed_ticks
                .reveal_through(sweep, config.tick_anticipation_deg);
            if added > 0 {
                trace!("revealed {added} ticks at {sweep:.1}deg");
            }
            if t < 1.0 {
                effects.push(Effect::RequestFrame);
            } else {
                state.angles.minute = 0.0;
                state.clock = PhaseClock::Swept;
                effects.push(Effect::StartTimer {
                    kind: TimerKind::SweepPause,
                    delay_ms: config.sweep_pause_ms,
                });
            }
        }
        PhaseClock::Syncing {
            start_ms,
            targets,
            live_second,
        } => {
            return sync_frame(state, start_ms, targets, live_second, now_ms, wall, config);
        }
        PhaseClock::Live => {
            state.angles = angles::time_angles(&wall);
            state.current_time = Some(wall);
            effects.push(Effect::RequestFrame);
        }
        PhaseClock::Booting | PhaseClock::Grown | PhaseClock::Swept => {
            trace!("frame with no active animation in {:?}", state.clock);
        }
    }
    Step { state, effects }
}

/// Catch-up targets for hands starting at twelve o'clock.
///
/// The second hand aims more than a full turn ahead, at where the live
/// second hand will be once its own animation finishes.
pub fn sync_targets(wall: &WallTime, config: &IntroConfig) -> SyncTargets {
    let live = angles::time_angles(wall);
    let predicted = angles::predicted_second_angle(wall, config.hand_durations.second_ms);
    SyncTargets {
        angles: HandAngles {
            hour: angles::clockwise_target(0.0, live.hour, config.hour_min_rotation_deg),
            minute: angles::clockwise_target(0.0, live.minute, config.minute_min_rotation_deg),
            second: 360.0 + predicted,
        },
    }
}

fn sync_frame(
    mut state: IntroState,
    start_ms: f64,
    targets: Option<SyncTargets>,
    mut live_second: bool,
    now_ms: f64,
    wall: WallTime,
    config: &IntroConfig,
) -> Step {
    let elapsed = now_ms - start_ms - config.sync_start_delay_ms;
    if elapsed < 0.0 {
        return Step {
            state,
            effects: vec![Effect::RequestFrame],
        };
    }

    let targets = targets.unwrap_or_else(|| {
        let t = sync_targets(&wall, config);
        debug!("sync targets {:?}", t.angles);
        t
    });

    let durations = config.hand_durations;
    let hour = ease_out_cubic(progress(elapsed, durations.hour_ms));
    let minute = ease_out_cubic(progress(elapsed, durations.minute_ms));
    let second = ease_out_cubic(progress(elapsed, durations.second_ms));

    if second >= 1.0 {
        live_second = true;
    }
    let second_angle = if live_second {
        angles::time_angles(&wall).second
    } else {
        targets.angles.second * second
    };

    state.angles = HandAngles {
        hour: targets.angles.hour * hour,
        minute: targets.angles.minute * minute,
        second: second_angle,
    };

    if elapsed >= durations.max() {
        state.current_time = Some(wall);
        state.is_live = true;
        state.clock = PhaseClock::Live;
        debug!("hands live at {}", wall.label());
        return Step {
            state,
            effects: vec![
                Effect::StartTimer {
                    kind: TimerKind::Ready,
                    delay_ms: config.ready_delay_ms,
                },
                Effect::RequestFrame,
            ],
        };
    }

    state.clock = PhaseClock::Syncing {
        start_ms,
        targets: Some(targets),
        live_second,
    };
    Step {
        state,
        effects: vec![Effect::RequestFrame],
    }
}

fn on_input(mut state: IntroState, input: DismissInput, config: &IntroConfig) -> Step {
    if state.is_complete {
        trace!("{input:?} after completion");
        return Step::unchanged(state);
    }

    let mut effects = Vec::new();
    let dismiss = match input {
        DismissInput::Skip => state.phase >= Phase::HandGrowth,
        _ if !state.is_ready => false,
        DismissInput::Click { on_control } | DismissInput::TouchStart { on_control } => !on_control,
        DismissInput::Wheel => {
            effects.push(Effect::PreventDefault);
            true
        }
        DismissInput::Key(key) if key.dismisses() => {
            effects.push(Effect::PreventDefault);
            true
        }
        DismissInput::Key(_) => false,
    };

    if !dismiss {
        trace!("ignoring {input:?} (ready: {})", state.is_ready);
        return Step { state, effects };
    }

    state.is_complete = true;
    info!("intro dismissed by {input:?}");
    effects.push(Effect::StartTimer {
        kind: TimerKind::Exit,
        delay_ms: config.exit_delay_ms,
    });
    Step { state, effects }
}
