#![forbid(unsafe_code)]

//! Debounced viewport measurement.
//!
//! Dragging a window edge fires a resize event on nearly every pixel of
//! motion. [`ViewportTracker`] collapses such a burst into a single update:
//! each observation restarts a settle timer, and only the last observation is
//! applied once the timer runs out.
//!
//! While no real measurement has landed (construction, [`reset`], or a
//! zero-sized report), observations are applied immediately so the engine
//! does not wait a settle period on mount.
//!
//! # Invariants
//!
//! 1. A burst of observations spaced closer than `settle` yields exactly one
//!    applied update, carrying the last observed size.
//! 2. [`viewport`](ViewportTracker::viewport) starts as
//!    [`Viewport::UNMEASURED`]; [`is_ready`](ViewportTracker::is_ready) is
//!    false until both dimensions are non-zero.
//! 3. [`cancel`](ViewportTracker::cancel) drops the pending observation.
//!
//! [`reset`]: ViewportTracker::reset

use std::time::Duration;

use crate::geometry::Viewport;

/// Default settle time for resize bursts.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    viewport: Viewport,
    apply_at: Duration,
}

/// Tracks the current viewport with debounced updates.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    settle: Duration,
    current: Viewport,
    pending: Option<PendingResize>,
    applied: u64,
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE)
    }
}

impl ViewportTracker {
    /// Create a tracker with the given settle time.
    #[must_use]
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            current: Viewport::UNMEASURED,
            pending: None,
            applied: 0,
        }
    }

    /// The configured settle time.
    #[must_use]
    pub const fn settle(&self) -> Duration {
        self.settle
    }

    /// Record a window size observed at `now`.
    ///
    /// Observations made while unmeasured are applied immediately and return
    /// `true`. Later observations are deferred and return `false`.
    pub fn observe(&mut self, width: f64, height: f64, now: Duration) -> bool {
        let viewport = Viewport::new(width, height);
        if !self.current.is_measured() {
            self.pending = None;
            self.apply(viewport);
            return true;
        }
        self.pending = Some(PendingResize {
            viewport,
            apply_at: now.saturating_add(self.settle),
        });
        false
    }

    /// Apply the pending observation if its settle time has elapsed.
    ///
    /// Returns the new viewport when an update was applied and changed the
    /// current value.
    pub fn poll(&mut self, now: Duration) -> Option<Viewport> {
        let pending = self.pending?;
        if now < pending.apply_at {
            return None;
        }
        self.pending = None;
        if pending.viewport == self.current {
            return None;
        }
        self.apply(pending.viewport);
        Some(self.current)
    }

    fn apply(&mut self, viewport: Viewport) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "driftfield.viewport",
            width = viewport.width,
            height = viewport.height,
            "viewport updated"
        );
        self.current = viewport;
        self.applied = self.applied.saturating_add(1);
    }

    /// Current viewport.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.current
    }

    /// Whether a real measurement has landed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.current.is_measured()
    }

    /// When the pending observation will be applied, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.apply_at)
    }

    /// Whether an observation is waiting out its settle time.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of updates applied so far.
    #[must_use]
    pub const fn applied_count(&self) -> u64 {
        self.applied
    }

    /// Drop the pending observation.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Forget everything, returning to the unmeasured state.
    pub fn reset(&mut self) {
        *self = Self::new(self.settle);
    }
}
