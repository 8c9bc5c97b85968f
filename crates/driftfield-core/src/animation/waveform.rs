#![forbid(unsafe_code)]

//! Periodic keyframe waveforms on wrapped time.
//!
//! A [`Waveform`] loops a [`Keyframes`] curve forever. Elapsed time is reduced
//! modulo the period in integer nanoseconds *before* the curve is evaluated,
//! so the result at `t` and at `t + period` is bit-identical no matter how
//! long the host has been running. Nothing accumulates between samples.
//!
//! Keyframes are spaced evenly over one period and the easing curve is
//! applied to each segment independently, so `[0, -10, 0, 10, 0]` with
//! ease-in-out bobs up, settles, bobs down and settles in four equal beats.

use std::time::Duration;

use super::easing::EasingFn;

/// Fraction of the current cycle in `[0, 1)`. A zero period yields 0.
#[must_use]
pub fn wrapped_phase(elapsed: Duration, period: Duration) -> f64 {
    let period_ns = period.as_nanos();
    if period_ns == 0 {
        return 0.0;
    }
    let within = elapsed.as_nanos() % period_ns;
    within as f64 / period_ns as f64
}

/// Evenly spaced keyframe values with per-segment easing.
#[derive(Debug, Clone, Copy)]
pub struct Keyframes {
    values: &'static [f64],
    easing: EasingFn,
}

impl Keyframes {
    /// Create a keyframe track.
    #[must_use]
    pub const fn new(values: &'static [f64], easing: EasingFn) -> Self {
        Self { values, easing }
    }

    /// First keyframe value (0.0 for an empty track).
    #[must_use]
    pub fn first(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }

    /// Smallest and largest keyframe values.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Value at `progress ∈ [0, 1]` through the track.
    #[must_use]
    pub fn sample(&self, progress: f64) -> f64 {
        match self.values {
            [] => 0.0,
            [only] => *only,
            values => {
                let segments = values.len() - 1;
                let scaled = progress.clamp(0.0, 1.0) * segments as f64;
                let index = (scaled.floor() as usize).min(segments - 1);
                let local = (self.easing)(scaled - index as f64);
                let (from, to) = (values[index], values[index + 1]);
                from + (to - from) * local
            }
        }
    }
}

/// An infinitely repeating keyframe animation.
#[derive(Debug, Clone, Copy)]
pub struct Waveform {
    keyframes: Keyframes,
    period: Duration,
    delay: Duration,
}

impl Waveform {
    /// Loop `keyframes` once every `period`.
    #[must_use]
    pub const fn new(keyframes: Keyframes, period: Duration) -> Self {
        Self {
            keyframes,
            period,
            delay: Duration::ZERO,
        }
    }

    /// Hold the first keyframe for `delay` before the first cycle
    /// (builder pattern).
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Cycle length.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Start delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Keyframe track.
    #[must_use]
    pub const fn keyframes(&self) -> &Keyframes {
        &self.keyframes
    }

    /// Value at `elapsed` since the waveform started.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> f64 {
        match elapsed.checked_sub(self.delay) {
            Some(t) => self.keyframes.sample(wrapped_phase(t, self.period)),
            None => self.keyframes.first(),
        }
    }
}
