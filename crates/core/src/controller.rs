use std::collections::HashMap;
use std::fmt;

use clock_intro_protocol::IntroFrame;
use log::{trace, warn};

use crate::clock::{LocalClock, WallClock};
use crate::config::IntroConfig;
use crate::machine::{self, DismissInput, Effect, IntroEvent, IntroState, Lifecycle, TimerKind};
use crate::scheduler::{Due, FrameHandle, FrameScheduler, QueuedScheduler, TimerHandle};
use crate::scroll::{ScrollHost, ScrollLock};

/// What the host should do with the input event it just forwarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// Suppress the event's default action.
    pub prevent_default: bool,
    /// The intro accepted the input as a dismissal.
    pub dismissed: bool,
}

/// Owns one run of the intro: its state, the host's scheduler and page,
/// and the completion callback.
///
/// Every effect from the state machine is applied here. The controller
/// keeps at most one outstanding frame request and one timer per
/// [`TimerKind`]; each is cancelled before it is replaced, and everything is
/// cancelled on [`unmount`](Self::unmount) (or drop), which also releases
/// the scroll lock.
pub struct ClockIntroController<S: FrameScheduler, H: ScrollHost, C: WallClock = LocalClock> {
    config: IntroConfig,
    state: IntroState,
    scheduler: S,
    scroll: H,
    clock: C,
    scroll_lock: ScrollLock,
    pending_frame: Option<FrameHandle>,
    timers: HashMap<TimerKind, TimerHandle>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl<S: FrameScheduler, H: ScrollHost> ClockIntroController<S, H, LocalClock> {
    /// A controller reading the system's local time.
    pub fn new(
        config: IntroConfig,
        scheduler: S,
        scroll: H,
        on_complete: impl FnOnce() + 'static,
    ) -> Self {
        Self::with_clock(config, scheduler, scroll, LocalClock, on_complete)
    }
}

impl<S: FrameScheduler, H: ScrollHost, C: WallClock> ClockIntroController<S, H, C> {
    pub fn with_clock(
        config: IntroConfig,
        scheduler: S,
        scroll: H,
        clock: C,
        on_complete: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            config,
            state: IntroState::new(),
            scheduler,
            scroll,
            clock,
            scroll_lock: ScrollLock::default(),
            pending_frame: None,
            timers: HashMap::new(),
            on_complete: Some(Box::new(on_complete)),
        }
    }

    pub fn config(&self) -> &IntroConfig {
        &self.config
    }

    pub fn state(&self) -> &IntroState {
        &self.state
    }

    /// Snapshot for the rendering surface.
    pub fn frame(&self) -> IntroFrame {
        self.state.frame()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn scroll_host(&self) -> &H {
        &self.scroll
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn is_mounted(&self) -> bool {
        self.state.lifecycle == Lifecycle::Mounted
    }

    /// Whether the completion callback has been invoked.
    pub fn has_completed(&self) -> bool {
        self.on_complete.is_none()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn mount(&mut self) {
        self.dispatch(IntroEvent::Mount);
    }

    /// Tear down: cancel every frame and timer and restore the page scroll.
    /// Safe to call more than once.
    pub fn unmount(&mut self) {
        self.dispatch(IntroEvent::Unmount);
    }

    /// Deliver an animation frame. Frames whose handle is no longer the
    /// outstanding request are dropped; returns whether it was delivered.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> bool {
        if self.pending_frame != Some(handle) {
            trace!("dropping stale frame {handle:?}");
            return false;
        }
        self.pending_frame = None;
        let wall = self.clock.now();
        self.dispatch(IntroEvent::Frame { now_ms, wall });
        true
    }

    /// Deliver a fired timer. Unknown or cancelled handles are dropped.
    pub fn on_timer(&mut self, handle: TimerHandle, now_ms: f64) -> bool {
        let Some(kind) = self
            .timers
            .iter()
            .find_map(|(kind, h)| (*h == handle).then_some(*kind))
        else {
            trace!("dropping stale timer {handle:?}");
            return false;
        };
        self.timers.remove(&kind);
        self.dispatch(IntroEvent::Timer { kind, now_ms });
        true
    }

    /// Forward a user input that may dismiss the intro.
    pub fn dismiss(&mut self, input: DismissInput) -> InputOutcome {
        let was_complete = self.state.is_complete;
        let effects = self.dispatch(IntroEvent::Input(input));
        InputOutcome {
            prevent_default: effects.contains(&Effect::PreventDefault),
            dismissed: !was_complete && self.state.is_complete,
        }
    }

    fn dispatch(&mut self, event: IntroEvent) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let step = machine::transition(state, event, &self.config);
        self.state = step.state;
        for effect in &step.effects {
            self.apply(*effect);
        }
        step.effects
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::RequestFrame => {
                if let Some(old) = self.pending_frame.take() {
                    self.scheduler.cancel_frame(old);
                }
                self.pending_frame = Some(self.scheduler.request_frame());
            }
            Effect::CancelFrame => {
                if let Some(old) = self.pending_frame.take() {
                    self.scheduler.cancel_frame(old);
                }
            }
            Effect::StartTimer { kind, delay_ms } => {
                if let Some(old) = self.timers.remove(&kind) {
                    self.scheduler.cancel_timer(old);
                }
                let handle = self.scheduler.start_timer(kind, delay_ms);
                self.timers.insert(kind, handle);
            }
            Effect::CancelTimer(kind) => {
                if let Some(old) = self.timers.remove(&kind) {
                    self.scheduler.cancel_timer(old);
                }
            }
            Effect::PreventDefault => {}
            Effect::LockScroll => self.scroll_lock.engage(&mut self.scroll),
            Effect::UnlockScroll => self.scroll_lock.release(&mut self.scroll),
            Effect::NotifyComplete => match self.on_complete.take() {
                Some(callback) => callback(),
                None => warn!("completion already signalled"),
            },
        }
    }
}

impl<H: ScrollHost, C: WallClock> ClockIntroController<QueuedScheduler, H, C> {
    /// Deliver everything due at `now_ms`: timers first, in deadline order,
    /// then the outstanding frame. Returns how many callbacks ran.
    pub fn pump(&mut self, now_ms: f64) -> usize {
        let mut delivered = 0;
        for due in self.scheduler.due_timers(now_ms) {
            if let Due::Timer { handle, .. } = due
                && self.scheduler.consume_timer(handle).is_some()
                && self.on_timer(handle, now_ms)
            {
                delivered += 1;
            }
        }
        if let Some(Due::Frame(handle)) = self.scheduler.due_frame() {
            self.scheduler.consume_frame(handle);
            if self.on_frame(handle, now_ms) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Forward a user input that happened at `now_ms`, which may fall between
    /// pumps. Timers it starts are measured from `now_ms` rather than from
    /// the last pump.
    pub fn dismiss_at(&mut self, input: DismissInput, now_ms: f64) -> InputOutcome {
        self.scheduler.advance_to(now_ms);
        self.dismiss(input)
    }

    /// Milliseconds until the next timer, relative to the last pump.
    pub fn next_timer_in(&self) -> Option<f64> {
        self.scheduler
            .next_deadline()
            .map(|at| (at - self.scheduler.now_ms()).max(0.0))
    }
}

impl<S: FrameScheduler, H: ScrollHost, C: WallClock> Drop for ClockIntroController<S, H, C> {
    fn drop(&mut self) {
        if self.is_mounted() {
            self.unmount();
        }
    }
}

impl<S: FrameScheduler, H: ScrollHost, C: WallClock> fmt::Debug for ClockIntroController<S, H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockIntroController")
            .field("state", &self.state)
            .field("pending_frame", &self.pending_frame)
            .field("timers", &self.timers)
            .field("completed", &self.has_completed())
            .finish_non_exhaustive()
    }
}
