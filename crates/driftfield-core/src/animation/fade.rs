#![forbid(unsafe_code)]

//! Delayed one-shot progress curve.

use std::time::Duration;

use super::easing::{EasingFn, linear};

/// Progress from 0.0 to 1.0 over `duration`, starting after `delay`.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    delay: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade lasting `duration`. A zero duration is clamped to 1ns.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            delay: Duration::ZERO,
            duration: duration.max(Duration::from_nanos(1)),
            easing: linear,
        }
    }

    /// Start after `delay` (builder pattern).
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Use `easing` for the progress curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Delay plus duration.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Eased progress at `elapsed` since the fade was started.
    #[must_use]
    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if active >= self.duration {
            return 1.0;
        }
        (self.easing)(active.as_secs_f64() / self.duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ease_out;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn zero_before_delay() {
        let fade = Fade::new(MS_100).delay(Duration::from_millis(50));
        assert_eq!(fade.progress_at(Duration::from_millis(49)), 0.0);
        assert_eq!(fade.progress_at(Duration::from_millis(150)), 1.0);
    }

    #[test]
    fn linear_midpoint() {
        let fade = Fade::new(MS_100);
        assert!((fade.progress_at(Duration::from_millis(50)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn eased_progress_leads_linear() {
        let fade = Fade::new(MS_100).easing(ease_out);
        assert!(fade.progress_at(Duration::from_millis(30)) > 0.3);
    }

    #[test]
    fn zero_duration_clamped() {
        let fade = Fade::new(Duration::ZERO);
        assert_eq!(fade.progress_at(Duration::ZERO), 0.0);
        assert_eq!(fade.progress_at(Duration::from_nanos(1)), 1.0);
    }
}
