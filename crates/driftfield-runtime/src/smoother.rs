#![forbid(unsafe_code)]

//! Per-element spring smoothing of field displacements.
//!
//! The force field produces a target displacement per element that jumps
//! whenever a new pointer sample lands. [`SpringSmoother`] owns one
//! two-axis spring per element, keyed by [`ElementId`], and turns those
//! jumps into continuous motion.
//!
//! State is created lazily the first time an element receives a target and
//! is dropped by [`retain`](SpringSmoother::retain) when the element leaves
//! the catalog. Elements that stay keep their springs, so a theme rebuild
//! does not snap anything back to the origin.

use std::time::Duration;

use ahash::AHashMap;
use driftfield_core::animation::Spring;
use driftfield_core::geometry::Vec2;

use crate::catalog::ElementId;

/// Default cap on the time a single frame may integrate.
pub const DEFAULT_MAX_FRAME_DT: Duration = Duration::from_millis(100);

/// Spring parameters for one element category.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringConfig {
    /// Restoring force per pixel of displacement.
    pub stiffness: f64,
    /// Velocity drag.
    pub damping: f64,
    /// Inertia.
    pub mass: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(170.0, 26.0, 1.0)
    }
}

impl SpringConfig {
    /// Create a spring configuration.
    #[must_use]
    pub const fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Damping that just avoids overshoot: `2·√(k·m)`.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// `damping / critical_damping()`. Below 1.0 the spring overshoots.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    /// Apply these parameters to `spring`, keeping its position and velocity.
    #[must_use]
    pub fn apply(&self, spring: Spring) -> Spring {
        spring
            .with_stiffness(self.stiffness)
            .with_damping(self.damping)
            .with_mass(self.mass)
    }
}

/// Two independent springs, one per axis.
#[derive(Debug, Clone)]
pub struct DisplacementState {
    x: Spring,
    y: Spring,
    config: SpringConfig,
}

impl DisplacementState {
    /// A state resting at `at`.
    #[must_use]
    pub fn new(config: SpringConfig, at: Vec2) -> Self {
        Self {
            x: config.apply(Spring::at(at.x)),
            y: config.apply(Spring::at(at.y)),
            config,
        }
    }

    /// Current parameters.
    #[must_use]
    pub const fn config(&self) -> SpringConfig {
        self.config
    }

    /// Swap parameters without disturbing the current motion.
    pub fn reconfigure(&mut self, config: SpringConfig) {
        if config == self.config {
            return;
        }
        self.x = config.apply(self.x.clone());
        self.y = config.apply(self.y.clone());
        self.config = config;
    }

    /// Retarget both axes. Non-finite components are ignored.
    pub fn set_target(&mut self, target: Vec2) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    /// Where the springs are heading.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        Vec2::new(self.x.target(), self.y.target())
    }

    /// Current smoothed position.
    #[must_use]
    pub fn rendered(&self) -> Vec2 {
        Vec2::new(self.x.position(), self.y.position())
    }

    /// Current velocity in pixels per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.velocity(), self.y.velocity())
    }

    /// Integrate both axes by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.x.advance(dt);
        self.y.advance(dt);
    }

    /// Both axes settled.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }
}

/// Spring state for every element, keyed by id.
#[derive(Debug, Clone)]
pub struct SpringSmoother {
    states: AHashMap<ElementId, DisplacementState>,
    max_dt: Duration,
}

impl Default for SpringSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_DT)
    }
}

impl SpringSmoother {
    /// Create an empty smoother that integrates at most `max_dt` per advance.
    #[must_use]
    pub fn new(max_dt: Duration) -> Self {
        Self {
            states: AHashMap::new(),
            max_dt,
        }
    }

    /// Per-advance integration cap.
    #[must_use]
    pub const fn max_dt(&self) -> Duration {
        self.max_dt
    }

    /// Retarget `id`, creating resting state at the origin on first use.
    pub fn set_target(&mut self, id: &ElementId, target: Vec2, config: SpringConfig) {
        match self.states.get_mut(id.as_str()) {
            Some(state) => {
                state.reconfigure(config);
                state.set_target(target);
            }
            None => {
                let mut state = DisplacementState::new(config, Vec2::ZERO);
                state.set_target(target);
                self.states.insert(id.clone(), state);
            }
        }
    }

    /// Integrate every spring by `dt`, clamped to the frame cap.
    pub fn advance(&mut self, dt: Duration) {
        let dt = dt.min(self.max_dt);
        if dt.is_zero() {
            return;
        }
        for state in self.states.values_mut() {
            state.advance(dt);
        }
    }

    /// Smoothed displacement for `id`; zero if the element has no state yet.
    #[must_use]
    pub fn rendered(&self, id: &str) -> Vec2 {
        self.states
            .get(id)
            .map_or(Vec2::ZERO, DisplacementState::rendered)
    }

    /// Full state for `id`.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<&DisplacementState> {
        self.states.get(id)
    }

    /// Keep only the ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&ElementId) -> bool) {
        self.states.retain(|id, _| keep(id));
    }

    /// Drop every spring.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of tracked elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// No tracked elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every spring is at rest.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.states.values().all(DisplacementState::is_at_rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn id(s: &str) -> ElementId {
        ElementId::new(s)
    }

    fn run(smoother: &mut SpringSmoother, frames: usize) {
        for _ in 0..frames {
            smoother.advance(MS_16);
        }
    }

    #[test]
    fn unknown_id_renders_zero() {
        let smoother = SpringSmoother::default();
        assert_eq!(smoother.rendered("nope"), Vec2::ZERO);
        assert!(smoother.is_settled());
    }

    #[test]
    fn converges_to_target() {
        let mut smoother = SpringSmoother::default();
        let target = Vec2::new(12.0, -8.0);
        smoother.set_target(&id("code-1"), target, SpringConfig::default());
        assert!(!smoother.is_settled());

        run(&mut smoother, 300);

        assert!(smoother.is_settled());
        assert_eq!(smoother.rendered("code-1"), target);
    }

    #[test]
    fn starts_from_origin() {
        let mut smoother = SpringSmoother::default();
        smoother.set_target(&id("a"), Vec2::new(100.0, 0.0), SpringConfig::default());
        smoother.advance(MS_16);
        let x = smoother.rendered("a").x;
        assert!(x > 0.0 && x < 100.0, "x={x}");
    }

    #[test]
    fn retarget_keeps_motion() {
        let mut smoother = SpringSmoother::default();
        let key = id("a");
        smoother.set_target(&key, Vec2::new(50.0, 0.0), SpringConfig::default());
        run(&mut smoother, 5);
        let mid = smoother.rendered("a");
        smoother.set_target(&key, Vec2::new(-50.0, 0.0), SpringConfig::default());
        assert_eq!(smoother.rendered("a"), mid);
    }

    #[test]
    fn large_dt_is_capped() {
        let mut capped = SpringSmoother::new(Duration::from_millis(100));
        let mut stepped = SpringSmoother::new(Duration::from_millis(100));
        let key = id("a");
        capped.set_target(&key, Vec2::new(40.0, 0.0), SpringConfig::default());
        stepped.set_target(&key, Vec2::new(40.0, 0.0), SpringConfig::default());

        capped.advance(Duration::from_secs(30));
        stepped.advance(Duration::from_millis(100));

        assert_eq!(capped.rendered("a"), stepped.rendered("a"));
    }

    #[test]
    fn retain_drops_removed_ids() {
        let mut smoother = SpringSmoother::default();
        for name in ["a", "b", "c"] {
            smoother.set_target(&id(name), Vec2::new(1.0, 1.0), SpringConfig::default());
        }
        smoother.retain(|id| id.as_str() != "b");
        assert_eq!(smoother.len(), 2);
        assert!(smoother.state("b").is_none());
        assert!(smoother.state("a").is_some());

        smoother.clear();
        assert!(smoother.is_empty());
    }

    #[test]
    fn reconfigure_preserves_position() {
        let mut state = DisplacementState::new(SpringConfig::default(), Vec2::ZERO);
        state.set_target(Vec2::new(30.0, 30.0));
        for _ in 0..4 {
            state.advance(MS_16);
        }
        let before = state.rendered();
        let velocity = state.velocity();
        state.reconfigure(SpringConfig::new(60.0, 20.0, 2.0));
        assert_eq!(state.rendered(), before);
        assert_eq!(state.velocity(), velocity);
        assert_eq!(state.config().mass, 2.0);
    }

    #[test]
    fn heavier_spring_lags() {
        let mut smoother = SpringSmoother::default();
        let target = Vec2::new(100.0, 0.0);
        smoother.set_target(&id("light"), target, SpringConfig::new(170.0, 26.0, 1.0));
        smoother.set_target(&id("heavy"), target, SpringConfig::new(60.0, 20.0, 2.0));
        run(&mut smoother, 6);
        assert!(smoother.rendered("light").x > smoother.rendered("heavy").x);
    }

    #[test]
    fn damping_ratio_matches_definition() {
        let cfg = SpringConfig::new(100.0, 20.0, 1.0);
        assert!((cfg.critical_damping() - 20.0).abs() < 1e-12);
        assert!((cfg.damping_ratio() - 1.0).abs() < 1e-12);
        assert!(SpringConfig::default().damping_ratio() < 1.0);
    }

    #[test]
    fn non_finite_target_ignored() {
        let mut smoother = SpringSmoother::default();
        smoother.set_target(&id("a"), Vec2::new(f64::NAN, f64::INFINITY), SpringConfig::default());
        run(&mut smoother, 10);
        assert_eq!(smoother.rendered("a"), Vec2::ZERO);
    }
}
