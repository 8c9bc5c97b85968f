#![forbid(unsafe_code)]

//! One-dimensional damped spring.
//!
//! A pointer sample moves an element's target displacement in a single jump.
//! [`Spring`] chases that target continuously:
//!
//!   m·a = −k·(x − target) − c·v
//!
//! Integration is semi-implicit Euler. [`Spring::advance`] splits `dt` into
//! equal sub-steps no longer than 4 ms and no longer than `1 / (ω₀ + c/m)`,
//! which keeps very stiff or heavily damped parameter sets stable.
//!
//! Once the offset from the target drops below 0.001 and the speed below
//! 0.01 per second, the spring snaps onto the target and stops integrating
//! until the target moves again.
//!
//! # Failure modes
//!
//! - One call integrates at most 4096 sub-steps and drops any time beyond
//!   them. Even `Duration::MAX` returns promptly, with the spring typically at
//!   rest rather than having integrated the whole span. Callers that need
//!   real-time fidelity clamp `dt` to a frame budget first, as the runtime's
//!   smoother does.

use std::time::Duration;

const MAX_SUBSTEP_SECS: f64 = 0.004;
const MAX_SUBSTEPS: f64 = 4096.0;
const REST_OFFSET: f64 = 0.001;
const REST_SPEED: f64 = 0.01;
const STIFFNESS_FLOOR: f64 = 0.1;
const MASS_FLOOR: f64 = 0.01;

/// Damped spring with mass.
///
/// ```
/// use std::time::Duration;
/// use driftfield_core::animation::Spring;
///
/// let mut spring = Spring::new(0.0, 12.0).with_stiffness(170.0).with_damping(26.0);
/// while !spring.is_at_rest() {
///     spring.advance(Duration::from_millis(16));
/// }
/// assert_eq!(spring.position(), 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring at `initial` heading for `target`, with k = 170, c = 26, m = 1.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
            at_rest: false,
        }
    }

    /// Spring already settled at `value`.
    #[must_use]
    pub fn at(value: f64) -> Self {
        Self {
            at_rest: true,
            ..Self::new(value, value)
        }
    }

    /// Stiffness `k`, floored at 0.1.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = floor_or(k, STIFFNESS_FLOOR);
        self
    }

    /// Damping `c`, floored at 0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = floor_or(c, 0.0);
        self
    }

    /// Mass `m`, floored at 0.01.
    #[must_use]
    pub fn with_mass(mut self, m: f64) -> Self {
        self.mass = floor_or(m, MASS_FLOOR);
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Units per second.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the target. Non-finite values and moves within the rest offset
    /// are ignored, so a settled spring is not woken by noise.
    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() && (target - self.target).abs() > REST_OFFSET {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// `2·√(k·m)`.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// `c / critical_damping()`.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    /// Integrate forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f64();
        if self.at_rest || secs <= 0.0 {
            return;
        }

        let omega = (self.stiffness / self.mass).sqrt();
        let limit = MAX_SUBSTEP_SECS.min(1.0 / (omega + self.damping / self.mass));
        let substeps = (secs / limit).ceil().clamp(1.0, MAX_SUBSTEPS);
        let h = (secs / substeps).min(limit);
        for _ in 0..substeps as u64 {
            let accel =
                (-self.stiffness * (self.position - self.target) - self.damping * self.velocity)
                    / self.mass;
            self.velocity += accel * h;
            self.position += self.velocity * h;
        }

        if (self.position - self.target).abs() < REST_OFFSET && self.velocity.abs() < REST_SPEED {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

fn floor_or(v: f64, floor: f64) -> f64 {
    if v.is_finite() { v.max(floor) } else { floor }
}
