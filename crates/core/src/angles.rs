//! Wall-clock time to continuous hand angles.

use chrono::{NaiveTime, Timelike};
use clock_intro_protocol::HandAngles;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Degrees the hour hand moves per minute.
const HOUR_DEG_PER_MINUTE: f64 = 0.5;
/// Degrees the second hand moves per second.
const SECOND_DEG_PER_SECOND: f64 = 6.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WallTimeError {
    #[error("hours out of range: {0}")]
    Hours(u32),
    #[error("minutes out of range: {0}")]
    Minutes(u32),
    #[error("seconds out of range: {0}")]
    Seconds(u32),
    #[error("milliseconds out of range: {0}")]
    Millis(u32),
}

/// A local time of day with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallTime {
    hours: u32,
    minutes: u32,
    seconds: u32,
    millis: u32,
}

impl WallTime {
    pub fn new(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Result<Self, WallTimeError> {
        if hours > 23 {
            return Err(WallTimeError::Hours(hours));
        }
        if minutes > 59 {
            return Err(WallTimeError::Minutes(minutes));
        }
        if seconds > 59 {
            return Err(WallTimeError::Seconds(seconds));
        }
        if millis > 999 {
            return Err(WallTimeError::Millis(millis));
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
            millis,
        })
    }

    /// Midnight, the time every hand points at before the intro starts.
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
        millis: 0,
    };

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn millis(&self) -> u32 {
        self.millis
    }

    /// Build from a chrono time. Leap-second nanoseconds are folded into the
    /// last millisecond of the second.
    pub fn from_naive(t: NaiveTime) -> Self {
        Self {
            hours: t.hour(),
            minutes: t.minute(),
            seconds: t.second(),
            millis: (t.nanosecond() / 1_000_000).min(999),
        }
    }

    /// Milliseconds since midnight.
    pub fn millis_of_day(&self) -> u64 {
        let secs = u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds);
        secs * 1000 + u64::from(self.millis)
    }

    /// `HH:MM:SS` on a 12-hour dial.
    pub fn label(&self) -> String {
        format_time(self.hours, self.minutes, self.seconds)
    }
}

/// Continuous (non-stepped) hand angles for a time of day.
///
/// Every hand creeps with the units below it: the hour hand with minutes
/// and seconds, the minute hand with seconds, the second hand with
/// milliseconds.
pub fn time_angles(t: &WallTime) -> HandAngles {
    let h = f64::from(t.hours % 12);
    let m = f64::from(t.minutes);
    let s = f64::from(t.seconds);
    let ms = f64::from(t.millis);

    HandAngles {
        hour: h * 30.0 + m * HOUR_DEG_PER_MINUTE + s * (HOUR_DEG_PER_MINUTE / 60.0),
        minute: m * 6.0 + s * 0.1,
        second: s * SECOND_DEG_PER_SECOND + ms * (SECOND_DEG_PER_SECOND / 1000.0),
    }
}

/// Target angle for moving a hand from `from` to the real-world angle `to`
/// without ever turning counterclockwise.
///
/// Both inputs are normalized to `[0, 360)`. A zero distance becomes a full
/// turn. If the forward distance is below `min_rotation`, another full turn
/// is added so the motion is always a visible sweep.
pub fn clockwise_target(from: f64, to: f64, min_rotation: f64) -> f64 {
    let from = from.rem_euclid(360.0);
    let to = to.rem_euclid(360.0);

    let mut distance = to - from;
    if distance <= 0.0 {
        distance += 360.0;
    }
    if distance < min_rotation {
        distance += 360.0;
    }
    from + distance
}

/// Where the second hand will be `lead_ms` from `now`, in `[0, 360)`.
pub fn predicted_second_angle(now: &WallTime, lead_ms: f64) -> f64 {
    (time_angles(now).second + (lead_ms / 1000.0) * SECOND_DEG_PER_SECOND).rem_euclid(360.0)
}

/// Format a time as `HH:MM:SS` for a 12-hour dial: hour 0 shows as 12 and
/// afternoon hours wrap (13 → 01).
pub fn format_time(hours: u32, minutes: u32, seconds: u32) -> String {
    let h12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{h12:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(h: u32, m: u32, s: u32, ms: u32) -> WallTime {
        WallTime::new(h, m, s, ms).unwrap_or(WallTime::MIDNIGHT)
    }

    #[test]
    fn formats_midnight_as_twelve() {
        assert_eq!(format_time(0, 5, 9), "12:05:09");
    }

    #[test]
    fn formats_afternoon_on_twelve_hour_dial() {
        assert_eq!(format_time(13, 0, 0), "01:00:00");
        assert_eq!(format_time(12, 30, 45), "12:30:45");
        assert_eq!(format_time(23, 59, 59), "11:59:59");
    }

    #[test]
    fn angles_include_sub_unit_creep() {
        let a = time_angles(&wall(3, 30, 30, 500));
        assert!((a.hour - (90.0 + 15.0 + 0.25)).abs() < 1e-9);
        assert!((a.minute - (180.0 + 3.0)).abs() < 1e-9);
        assert!((a.second - (180.0 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn afternoon_hours_fold_onto_dial() {
        assert_eq!(time_angles(&wall(15, 0, 0, 0)), time_angles(&wall(3, 0, 0, 0)));
    }

    #[test]
    fn clockwise_wraps_past_twelve() {
        let target = clockwise_target(350.0, 10.0, 0.0);
        assert!((target - 370.0).abs() < 1e-9);
        assert!(target >= 360.0);
    }

    #[test]
    fn clockwise_zero_distance_is_full_turn() {
        assert!((clockwise_target(90.0, 90.0, 0.0) - 450.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_applies_minimum_rotation() {
        // 20 degrees forward is below the 30 degree floor: add a full turn.
        assert!((clockwise_target(0.0, 20.0, 30.0) - 380.0).abs() < 1e-9);
        // 45 degrees is above it.
        assert!((clockwise_target(0.0, 45.0, 30.0) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_normalizes_negative_inputs() {
        assert!((clockwise_target(-10.0, 10.0, 0.0) - 370.0).abs() < 1e-9);
    }

    #[test]
    fn predicted_second_wraps() {
        let now = wall(0, 0, 59, 500);
        // 357 degrees plus 3.6 degrees of look-ahead.
        let predicted = predicted_second_angle(&now, 600.0);
        assert!((predicted - 0.6).abs() < 1e-9);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(WallTime::new(24, 0, 0, 0), Err(WallTimeError::Hours(24)));
        assert_eq!(WallTime::new(0, 60, 0, 0), Err(WallTimeError::Minutes(60)));
        assert_eq!(WallTime::new(0, 0, 60, 0), Err(WallTimeError::Seconds(60)));
        assert_eq!(WallTime::new(0, 0, 0, 1000), Err(WallTimeError::Millis(1000)));
    }

    #[test]
    fn from_naive_clamps_leap_second() {
        let t = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).map(WallTime::from_naive);
        assert_eq!(t.map(|t| t.millis()), Some(999));
    }

    #[test]
    fn label_uses_twelve_hour_dial() {
        assert_eq!(wall(0, 5, 9, 0).label(), "12:05:09");
    }
}
