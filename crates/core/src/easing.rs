/// Linear progress of an animation, clamped to `[0, 1]`.
///
/// A non-positive duration is treated as already finished.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// `1 - (1 - t)^3`
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Quadratic ease-in-out: accelerate to the midpoint, then decelerate.
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
    }

    #[test]
    fn in_out_quad_is_symmetric_at_midpoint() {
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-12);
        assert!((ease_in_out_quad(0.25) + ease_in_out_quad(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn progress_clamps() {
        assert_eq!(progress(-5.0, 100.0), 0.0);
        assert_eq!(progress(50.0, 100.0), 0.5);
        assert_eq!(progress(500.0, 100.0), 1.0);
        assert_eq!(progress(0.0, 0.0), 1.0);
    }

    #[test]
    fn ease_out_front_loads_motion() {
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
