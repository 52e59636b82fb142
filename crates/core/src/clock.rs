use chrono::Local;

use crate::angles::WallTime;

/// Source of the local time of day.
pub trait WallClock {
    fn now(&self) -> WallTime;
}

/// The system's local time zone clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn now(&self) -> WallTime {
        WallTime::from_naive(Local::now().time())
    }
}

/// A clock that advances only when told to.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    start: WallTime,
    offset_ms: u64,
}

impl FixedClock {
    pub fn new(start: WallTime) -> Self {
        Self {
            start,
            offset_ms: 0,
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.offset_ms += ms;
    }

    pub fn set_offset(&mut self, ms: u64) {
        self.offset_ms = ms;
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> WallTime {
        const DAY_MS: u64 = 24 * 60 * 60 * 1000;
        let total = (self.start.millis_of_day() + self.offset_ms) % DAY_MS;
        let millis = (total % 1000) as u32;
        let secs = total / 1000;
        WallTime::new(
            (secs / 3600) as u32,
            ((secs / 60) % 60) as u32,
            (secs % 60) as u32,
            millis,
        )
        .unwrap_or(WallTime::MIDNIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_rolls_over_midnight() {
        let start = WallTime::new(23, 59, 59, 900).unwrap_or(WallTime::MIDNIGHT);
        let mut clock = FixedClock::new(start);
        clock.advance(200);
        let now = clock.now();
        assert_eq!((now.hours(), now.minutes(), now.seconds(), now.millis()), (0, 0, 0, 100));
    }

    #[test]
    fn local_clock_is_in_range() {
        let now = LocalClock.now();
        assert!(now.hours() < 24);
        assert!(now.millis() < 1000);
    }
}
