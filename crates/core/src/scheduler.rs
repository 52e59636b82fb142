//! Frame and timer scheduling seam between the controller and its host.

use std::collections::BTreeMap;

use crate::machine::TimerKind;

/// Opaque id of an outstanding animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Opaque id of an outstanding one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

/// What a host provides to run the intro: one-shot frame callbacks and
/// one-shot timers, both cancellable.
///
/// The host reports back by calling
/// [`ClockIntroController::on_frame`](crate::ClockIntroController::on_frame)
/// and [`ClockIntroController::on_timer`](crate::ClockIntroController::on_timer)
/// with the handle it returned here.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn start_timer(&mut self, kind: TimerKind, delay_ms: f64) -> TimerHandle;
    fn cancel_timer(&mut self, handle: TimerHandle);
}

/// Something that came due in a [`QueuedScheduler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Due {
    Timer { handle: TimerHandle, at_ms: f64 },
    Frame(FrameHandle),
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    kind: TimerKind,
    deadline_ms: f64,
}

/// A scheduler that only records requests; the host polls it with its own
/// notion of "now".
///
/// Used by the terminal and egui hosts (polled once per loop iteration) and
/// by tests (polled with virtual time).
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    now_ms: f64,
    next_id: u64,
    frame: Option<FrameHandle>,
    timers: BTreeMap<TimerHandle, PendingTimer>,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest time passed to [`due_timers`](Self::due_timers).
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest outstanding timer deadline, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .values()
            .map(|t| t.deadline_ms)
            .min_by(f64::total_cmp)
    }

    pub fn timer_kind(&self, handle: TimerHandle) -> Option<TimerKind> {
        self.timers.get(&handle).map(|t| t.kind)
    }

    /// Move the scheduler's notion of now forward. Timers started afterwards
    /// count their delay from `now_ms`. Time never moves backwards.
    pub fn advance_to(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Timers due at `now_ms`, earliest deadline first.
    ///
    /// Due timers stay registered until the controller consumes them, so a
    /// cancellation issued while delivering an earlier one still applies.
    pub fn due_timers(&mut self, now_ms: f64) -> Vec<Due> {
        self.advance_to(now_ms);
        let mut due: Vec<(TimerHandle, f64)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= now_ms)
            .map(|(h, t)| (*h, t.deadline_ms))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        due.into_iter()
            .map(|(handle, at_ms)| Due::Timer { handle, at_ms })
            .collect()
    }

    /// The outstanding frame request, if any. Frames requested while this
    /// one is delivered are left for the next poll.
    pub fn due_frame(&self) -> Option<Due> {
        self.frame.map(Due::Frame)
    }

    /// Remove a timer once it has fired.
    pub fn consume_timer(&mut self, handle: TimerHandle) -> Option<TimerKind> {
        self.timers.remove(&handle).map(|t| t.kind)
    }

    /// Clear the frame request once it has been delivered.
    pub fn consume_frame(&mut self, handle: FrameHandle) -> bool {
        if self.frame == Some(handle) {
            self.frame = None;
            true
        } else {
            false
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameScheduler for QueuedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }

    fn start_timer(&mut self, kind: TimerKind, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.insert(
            handle,
            PendingTimer {
                kind,
                deadline_ms: self.now_ms + delay_ms,
            },
        );
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_come_due_in_deadline_order() {
        let mut s = QueuedScheduler::new();
        let late = s.start_timer(TimerKind::Exit, 600.0);
        let early = s.start_timer(TimerKind::Boot, 400.0);
        assert!(s.due_timers(399.0).is_empty());
        assert_eq!(
            s.due_timers(600.0),
            vec![
                Due::Timer {
                    handle: early,
                    at_ms: 400.0
                },
                Due::Timer {
                    handle: late,
                    at_ms: 600.0
                }
            ]
        );
    }

    #[test]
    fn timer_delay_is_relative_to_last_poll() {
        let mut s = QueuedScheduler::new();
        s.due_timers(1000.0);
        s.start_timer(TimerKind::Ready, 600.0);
        assert_eq!(s.next_deadline(), Some(1600.0));
    }

    #[test]
    fn advancing_between_polls_moves_timer_base() {
        let mut s = QueuedScheduler::new();
        s.due_timers(800.0);
        s.advance_to(880.0);
        s.start_timer(TimerKind::Exit, 600.0);
        assert_eq!(s.next_deadline(), Some(1480.0));
        s.advance_to(500.0);
        assert_eq!(s.now_ms(), 880.0);
    }

    #[test]
    fn newer_frame_request_replaces_older() {
        let mut s = QueuedScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        assert_eq!(s.due_frame(), Some(Due::Frame(b)));
        assert!(!s.consume_frame(a));
        assert!(s.consume_frame(b));
        assert!(!s.has_pending_frame());
    }

    #[test]
    fn cancelled_timer_never_comes_due() {
        let mut s = QueuedScheduler::new();
        let h = s.start_timer(TimerKind::Boot, 10.0);
        s.cancel_timer(h);
        assert!(s.due_timers(100.0).is_empty());
        assert_eq!(s.pending_timers(), 0);
    }
}
