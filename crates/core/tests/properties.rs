use clock_intro_core::angles::{clockwise_target, format_time, time_angles};
use clock_intro_core::machine::{IntroEvent, TimerKind, transition};
use clock_intro_core::{IntroConfig, IntroState, RevealedTicks, WallTime};
use proptest::prelude::*;

fn wall_time() -> impl Strategy<Value = WallTime> {
    (0u32..24, 0u32..60, 0u32..60, 0u32..1000)
        .prop_map(|(h, m, s, ms)| WallTime::new(h, m, s, ms).unwrap_or(WallTime::MIDNIGHT))
}

proptest! {
    #[test]
    fn clockwise_target_never_moves_backwards(
        from in -720.0f64..720.0,
        to in -720.0f64..720.0,
        floor in 0.0f64..120.0,
    ) {
        let start = from.rem_euclid(360.0);
        let target = clockwise_target(from, to, floor);
        prop_assert!(target > start);
        prop_assert!(target - start >= floor.min(360.0));
        prop_assert!(target - start <= 720.0);
        // Lands on the requested dial position.
        let landed = target.rem_euclid(360.0);
        let wanted = to.rem_euclid(360.0);
        let diff = (landed - wanted).abs();
        prop_assert!(diff < 1e-6 || (360.0 - diff) < 1e-6);
    }

    #[test]
    fn angles_stay_on_the_dial(t in wall_time()) {
        let a = time_angles(&t);
        for v in [a.hour, a.minute, a.second] {
            prop_assert!((0.0..360.0).contains(&v));
        }
    }

    #[test]
    fn second_hand_advances_modulo_wraparound(t in wall_time(), step_ms in 1u64..900) {
        let next_ms = t.millis_of_day() + step_ms;
        let next = WallTime::new(
            ((next_ms / 3_600_000) % 24) as u32,
            ((next_ms / 60_000) % 60) as u32,
            ((next_ms / 1000) % 60) as u32,
            (next_ms % 1000) as u32,
        ).unwrap_or(WallTime::MIDNIGHT);
        let before = time_angles(&t).second;
        let after = time_angles(&next).second;
        let forward = (after - before).rem_euclid(360.0);
        prop_assert!((forward - step_ms as f64 * 0.006).abs() < 1e-6);
    }

    #[test]
    fn formatted_time_is_twelve_hour(h in 0u32..24, m in 0u32..60, s in 0u32..60) {
        let label = format_time(h, m, s);
        prop_assert_eq!(label.len(), 8);
        let hour: u32 = label[..2].parse().unwrap_or(0);
        prop_assert!((1..=12).contains(&hour));
        prop_assert_eq!(hour % 12, h % 12);
    }

    #[test]
    fn tick_reveal_is_monotonic(mut sweeps in prop::collection::vec(0.0f64..360.0, 1..40)) {
        sweeps.sort_by(f64::total_cmp);
        let mut ticks = RevealedTicks::new();
        let mut last = 0;
        for sweep in sweeps {
            ticks.reveal_through(sweep, 10.0);
            prop_assert!(ticks.len() >= last);
            last = ticks.len();
        }
    }

    #[test]
    fn phase_never_regresses_under_arbitrary_timers(
        kinds in prop::collection::vec(0usize..5, 0..30),
    ) {
        let config = IntroConfig::default();
        let mut state = transition(IntroState::new(), IntroEvent::Mount, &config).state;
        let mut now = 0.0;
        for k in kinds {
            now += 50.0;
            let before = state.phase;
            let event = IntroEvent::Timer { kind: TimerKind::ALL[k], now_ms: now };
            state = transition(state, event, &config).state;
            prop_assert!(state.phase >= before);
            prop_assert!(state.phase.index() <= before.index() + 1);
        }
    }
}
