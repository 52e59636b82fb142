//! Integration test: drive a full intro through the controller with a
//! queued scheduler and a fixed wall clock, and check the observable
//! sequence against the intro's contract.

use std::cell::Cell;
use std::rc::Rc;

use clock_intro_core::controller::InputOutcome;
use clock_intro_core::{
    ClockIntroController, DismissInput, FixedClock, IntroConfig, IntroKey, IntroState, PageScroll,
    QueuedScheduler, WallTime,
};
use clock_intro_protocol::Phase;

const FRAME_MS: f64 = 16.0;

type Intro<'a> = ClockIntroController<QueuedScheduler, &'a mut PageScroll, FixedClock>;

fn start_time() -> WallTime {
    WallTime::new(14, 25, 50, 250).unwrap_or(WallTime::MIDNIGHT)
}

fn intro<'a>(page: &'a mut PageScroll, calls: &Rc<Cell<u32>>) -> Intro<'a> {
    let calls = Rc::clone(calls);
    ClockIntroController::with_clock(
        IntroConfig::default(),
        QueuedScheduler::new(),
        page,
        FixedClock::new(start_time()),
        move || calls.set(calls.get() + 1),
    )
}

/// Pump at frame cadence from `from` (exclusive) to `to` (inclusive),
/// returning a snapshot after every pump.
fn run(c: &mut Intro<'_>, from: f64, to: f64) -> Vec<IntroState> {
    let mut states = Vec::new();
    let mut t = from + FRAME_MS;
    while t <= to {
        c.clock_mut().set_offset(t as u64);
        c.pump(t);
        states.push(c.state().clone());
        t += FRAME_MS;
    }
    states
}

#[test]
fn phases_advance_in_order_without_skipping() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    let states = run(&mut c, 0.0, 5000.0);

    let mut seen: Vec<Phase> = Vec::new();
    for s in &states {
        if seen.last() != Some(&s.phase) {
            seen.push(s.phase);
        }
    }
    assert_eq!(
        seen,
        vec![
            Phase::Idle,
            Phase::HandGrowth,
            Phase::TickReveal,
            Phase::SyncToLiveTime
        ]
    );
    assert!(states.windows(2).all(|w| w[0].phase <= w[1].phase));
}

#[test]
fn minute_hand_is_fully_grown_when_reveal_starts() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    let states = run(&mut c, 0.0, 3000.0);

    let handoff = states
        .windows(2)
        .find(|w| w[0].phase == Phase::HandGrowth && w[1].phase == Phase::TickReveal);
    let Some(w) = handoff else {
        unreachable!("growth should hand off to the reveal sweep");
    };
    assert_eq!(w[0].minute_hand_length, 100.0);
    assert_eq!(w[1].minute_hand_length, 100.0);
}

#[test]
fn ticks_only_accumulate_and_end_complete() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    let states = run(&mut c, 0.0, 3000.0);

    let sizes: Vec<usize> = states.iter().map(|s| s.revealed_ticks.len()).collect();
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    for w in states.windows(2) {
        for i in w[0].revealed_ticks.iter() {
            assert!(w[1].revealed_ticks.contains(i));
        }
    }

    let Some(sync) = states.iter().find(|s| s.phase == Phase::SyncToLiveTime) else {
        unreachable!("sync phase should be reached by 3s");
    };
    assert!(sync.revealed_ticks.is_full());
    assert_eq!(sync.angles.minute, 0.0);
}

#[test]
fn hands_go_live_then_ready_after_grace_period() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    let states = run(&mut c, 0.0, 5000.0);

    let live_at = states.iter().position(|s| s.is_live);
    let ready_at = states.iter().position(|s| s.is_ready);
    let (Some(live_at), Some(ready_at)) = (live_at, ready_at) else {
        unreachable!("intro should be live and ready by 5s");
    };
    assert!(ready_at > live_at);
    let grace = (ready_at - live_at) as f64 * FRAME_MS;
    assert!((600.0..600.0 + FRAME_MS * 2.0).contains(&grace));

    let frame = c.frame();
    assert!(frame.time_label.is_some());
    assert!(!frame.skip_visible);
    assert!(states[..live_at].iter().all(|s| !s.is_ready));
}

#[test]
fn live_hands_match_wall_clock() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    run(&mut c, 0.0, 6000.0);

    // Last pump at 6000ms, with the clock 6s after 14:25:50.250.
    let now = c.state().current_time;
    assert_eq!(now.map(|t| (t.hours(), t.minutes(), t.seconds())), Some((14, 25, 56)));
    assert_eq!(c.frame().time_label.as_deref(), Some("02:25:56"));
    let angles = c.state().angles;
    assert!((angles.minute - (25.0 * 6.0 + 56.0 * 0.1)).abs() < 1e-9);
}

#[test]
fn near_simultaneous_dismissals_complete_once() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    run(&mut c, 0.0, 5008.0);
    assert!(c.state().is_ready);

    let first = c.dismiss(DismissInput::Wheel);
    let second = c.dismiss(DismissInput::Click { on_control: false });
    let third = c.dismiss(DismissInput::Key(IntroKey::Escape));
    assert_eq!(
        first,
        InputOutcome {
            prevent_default: true,
            dismissed: true
        }
    );
    assert!(!second.dismissed);
    assert!(!third.dismissed);

    c.pump(5607.0);
    assert_eq!(calls.get(), 0);
    c.pump(5608.0);
    assert_eq!(calls.get(), 1);
    run(&mut c, 5608.0, 7000.0);
    assert_eq!(calls.get(), 1);
    assert!(c.has_completed());
}

#[test]
fn dismissal_inputs_are_ignored_until_ready() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    run(&mut c, 0.0, 3900.0);
    assert!(c.state().is_live);
    assert!(!c.state().is_ready);

    for input in [
        DismissInput::Click { on_control: false },
        DismissInput::Wheel,
        DismissInput::TouchStart { on_control: false },
        DismissInput::Key(IntroKey::Enter),
    ] {
        assert_eq!(c.dismiss(input), InputOutcome::default());
    }
    assert!(!c.state().is_complete);

    run(&mut c, 3900.0, 5000.0);
    assert!(!c.dismiss(DismissInput::Click { on_control: true }).dismissed);
    assert!(!c.dismiss(DismissInput::Key(IntroKey::Other)).dismissed);
    assert!(c.dismiss(DismissInput::TouchStart { on_control: false }).dismissed);
}

#[test]
fn skip_completes_mid_sweep() {
    let mut page = PageScroll::at(0.0);
    let calls = Rc::new(Cell::new(0));
    let mut c = intro(&mut page, &calls);
    c.mount();
    run(&mut c, 0.0, 1200.0);
    assert_eq!(c.state().phase, Phase::TickReveal);
    assert!(c.frame().skip_visible);

    assert!(c.dismiss(DismissInput::Skip).dismissed);
    run(&mut c, 1200.0, 1808.0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn unmount_restores_scroll_position() {
    let mut page = PageScroll::at(731.0);
    let calls = Rc::new(Cell::new(0));
    {
        let mut c = intro(&mut page, &calls);
        c.mount();
        run(&mut c, 0.0, 2000.0);
        assert!(c.scroll_host().locked);
        c.unmount();
        assert!(!c.scroll_host().locked);
        assert_eq!(c.pending_frame(), None);
        assert_eq!(c.scheduler().pending_timers(), 0);
    }
    assert_eq!(page, PageScroll::at(731.0));
}

#[test]
fn dropping_a_mounted_intro_restores_scroll() {
    let mut page = PageScroll::at(88.0);
    let calls = Rc::new(Cell::new(0));
    {
        let mut c = intro(&mut page, &calls);
        c.mount();
        run(&mut c, 0.0, 500.0);
    }
    assert!(!page.locked);
    assert_eq!(page.offset, 88.0);
    assert_eq!(calls.get(), 0);
}
