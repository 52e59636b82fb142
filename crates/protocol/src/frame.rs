use serde::{Deserialize, Serialize};

/// Stage of the intro sequence. Only ever advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle = 0,
    HandGrowth = 1,
    TickReveal = 2,
    SyncToLiveTime = 3,
}

impl Phase {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Hand angles in degrees, clockwise from twelve o'clock.
///
/// Values may exceed 360 while a sweep is being animated so that the
/// rotation reads as a full clockwise turn instead of a shortest-path move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandVisibility {
    pub hour: bool,
    pub minute: bool,
    pub second: bool,
}

impl HandVisibility {
    pub const ALL: Self = Self {
        hour: true,
        minute: true,
        second: true,
    };
}

/// Everything a rendering surface needs to draw one frame of the intro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroFrame {
    pub phase: Phase,
    pub angles: HandAngles,
    pub hands_visible: HandVisibility,
    /// Minute hand length in percent of full length, 0–100.
    pub minute_hand_length: f64,
    /// Revealed face positions, ascending, each in 0–11.
    pub revealed_ticks: Vec<u8>,
    /// `HH:MM:SS` once the hands track live time.
    pub time_label: Option<String>,
    pub is_live: bool,
    pub is_ready: bool,
    pub is_complete: bool,
    /// Whether the skip affordance should be shown.
    pub skip_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Idle < Phase::HandGrowth);
        assert!(Phase::HandGrowth < Phase::TickReveal);
        assert!(Phase::TickReveal < Phase::SyncToLiveTime);
        assert_eq!(Phase::SyncToLiveTime.index(), 3);
    }

    #[test]
    fn frame_serializes_for_js_hosts() {
        let frame = IntroFrame {
            phase: Phase::TickReveal,
            angles: HandAngles {
                hour: 0.0,
                minute: 123.5,
                second: 0.0,
            },
            hands_visible: HandVisibility {
                minute: true,
                ..HandVisibility::default()
            },
            minute_hand_length: 100.0,
            revealed_ticks: vec![0, 1, 2, 3, 4],
            time_label: None,
            is_live: false,
            is_ready: false,
            is_complete: false,
            skip_visible: true,
        };
        let json = serde_json::to_string(&frame).unwrap_or_default();
        assert!(json.contains("\"phase\":\"TickReveal\""));
        assert!(json.contains("\"revealed_ticks\":[0,1,2,3,4]"));
        assert!(json.contains("\"time_label\":null"));
    }
}
