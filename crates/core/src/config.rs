//! Timing, geometry tuning, and overlay text for the intro.
//!
//! Every field has a default, so a JSON document only needs to name the
//! values it overrides:
//!
//! ```json
//! { "sweep_ms": 2000, "labels": { "first_name": "ADA" } }
//! ```

use clock_intro_protocol::SharedStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be a finite, non-negative number (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Per-hand animation durations for the catch-up sweep, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandDurations {
    pub hour_ms: f64,
    pub minute_ms: f64,
    pub second_ms: f64,
}

impl Default for HandDurations {
    fn default() -> Self {
        Self {
            hour_ms: 600.0,
            minute_ms: 800.0,
            second_ms: 600.0,
        }
    }
}

impl HandDurations {
    /// The longest of the three; the catch-up ends when it has elapsed.
    pub fn max(&self) -> f64 {
        self.hour_ms.max(self.minute_ms).max(self.second_ms)
    }
}

/// Text shown around the clock face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroLabels {
    pub first_name: SharedStr,
    pub last_name: SharedStr,
    pub title: SharedStr,
    pub continue_hint: SharedStr,
    pub skip: SharedStr,
}

impl Default for IntroLabels {
    fn default() -> Self {
        Self {
            first_name: "YOUR".into(),
            last_name: "NAME".into(),
            title: "FULL STACK DEVELOPER".into(),
            continue_hint: "CLICK OR SCROLL TO CONTINUE".into(),
            skip: "SKIP \u{2192}".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Delay from mount until the minute hand starts growing.
    pub boot_delay_ms: f64,
    pub growth_ms: f64,
    /// Pause between the fully grown hand and the reveal sweep.
    pub growth_pause_ms: f64,
    /// Duration of the full-turn reveal sweep.
    pub sweep_ms: f64,
    pub sweep_pause_ms: f64,
    /// Shared start delay before the hands begin catching up.
    pub sync_start_delay_ms: f64,
    pub hand_durations: HandDurations,
    pub hour_min_rotation_deg: f64,
    pub minute_min_rotation_deg: f64,
    /// How far ahead of the hand a tick lights up.
    pub tick_anticipation_deg: f64,
    /// Grace period after the hands go live before dismissal is accepted.
    pub ready_delay_ms: f64,
    /// Exit animation length; the completion callback fires after it.
    pub exit_delay_ms: f64,
    pub labels: IntroLabels,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            boot_delay_ms: 400.0,
            growth_ms: 400.0,
            growth_pause_ms: 100.0,
            sweep_ms: 1600.0,
            sweep_pause_ms: 200.0,
            sync_start_delay_ms: 200.0,
            hand_durations: HandDurations::default(),
            hour_min_rotation_deg: 30.0,
            minute_min_rotation_deg: 60.0,
            tick_anticipation_deg: 10.0,
            ready_delay_ms: 600.0,
            exit_delay_ms: 600.0,
            labels: IntroLabels::default(),
        }
    }
}

impl IntroConfig {
    /// Parse and validate a (possibly partial) JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("boot_delay_ms", self.boot_delay_ms),
            ("growth_ms", self.growth_ms),
            ("growth_pause_ms", self.growth_pause_ms),
            ("sweep_ms", self.sweep_ms),
            ("sweep_pause_ms", self.sweep_pause_ms),
            ("sync_start_delay_ms", self.sync_start_delay_ms),
            ("hand_durations.hour_ms", self.hand_durations.hour_ms),
            ("hand_durations.minute_ms", self.hand_durations.minute_ms),
            ("hand_durations.second_ms", self.hand_durations.second_ms),
            ("hour_min_rotation_deg", self.hour_min_rotation_deg),
            ("minute_min_rotation_deg", self.minute_min_rotation_deg),
            ("tick_anticipation_deg", self.tick_anticipation_deg),
            ("ready_delay_ms", self.ready_delay_ms),
            ("exit_delay_ms", self.exit_delay_ms),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}
