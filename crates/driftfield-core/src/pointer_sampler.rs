#![forbid(unsafe_code)]

//! Rate-bounded pointer sampling.
//!
//! Browsers and window systems can deliver pointer moves far faster than the
//! display refreshes. Feeding every move into the force field would recompute
//! the whole element set several times per painted frame for no visible gain.
//!
//! [`PointerSampler`] reduces the raw stream to at most one published
//! [`PointerSignal`] per sampling slot:
//!
//! - [`SamplingPolicy::FrameAligned`]: every move that arrives before the next
//!   frame poll coalesces into one pending sample (latest position wins).
//! - [`SamplingPolicy::Throttle`]: the first move opens a fixed window; the
//!   latest position seen before the window closes is published once it does.
//!   Later moves replace the pending position but never extend the window.
//!
//! # Invariants
//!
//! 1. At most one sample is pending at any time; a new event supersedes a
//!    stale pending position instead of queueing behind it.
//! 2. The published signal starts at `(0, 0)` with generation 0.
//! 3. [`cancel`](PointerSampler::cancel) drops the pending sample; nothing is
//!    published afterwards until a new event arrives.
//! 4. Non-finite coordinates are ignored.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use driftfield_core::event::PointerEvent;
//! use driftfield_core::pointer_sampler::{PointerSampler, SamplingPolicy};
//!
//! let mut sampler = PointerSampler::new(SamplingPolicy::FrameAligned);
//! let t = Duration::from_millis(5);
//! sampler.push(PointerEvent::new(10.0, 10.0), t);
//! sampler.push(PointerEvent::new(20.0, 25.0), t);
//!
//! let signal = sampler.poll(Duration::from_millis(16)).unwrap();
//! assert_eq!(signal.position.x, 20.0);
//! assert_eq!(signal.generation, 1);
//! assert!(sampler.poll(Duration::from_millis(32)).is_none());
//! ```

use std::time::Duration;

use crate::event::PointerEvent;
use crate::geometry::{Vec2, Viewport};

/// Default throttle window (~60 updates per second).
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(16);

/// How raw pointer moves are reduced to published samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingPolicy {
    /// Coalesce all moves before the next frame poll into one sample.
    #[default]
    FrameAligned,
    /// Publish at most once per `interval`.
    Throttle { interval: Duration },
}

impl SamplingPolicy {
    /// Fixed-interval throttling with [`DEFAULT_THROTTLE_INTERVAL`].
    #[must_use]
    pub const fn throttle() -> Self {
        Self::Throttle {
            interval: DEFAULT_THROTTLE_INTERVAL,
        }
    }
}

/// The published pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSignal {
    /// Pointer position in viewport pixels.
    pub position: Vec2,
    /// Incremented on every publish; 0 means "no pointer seen yet".
    pub generation: u64,
}

impl PointerSignal {
    /// Position mapped to `[-1, 1]²` around the viewport center; zero while
    /// the viewport is unmeasured.
    #[must_use]
    pub fn normalized(&self, viewport: Viewport) -> Vec2 {
        viewport.normalize(self.position)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingSample {
    position: Vec2,
    due_at: Duration,
}

/// Reduces a pointer-move stream to a bounded publish rate.
///
/// Owned by a single engine instance; there is no shared or global throttle
/// state, so several samplers can run side by side.
#[derive(Debug, Clone, Default)]
pub struct PointerSampler {
    policy: SamplingPolicy,
    signal: PointerSignal,
    pending: Option<PendingSample>,
    received: u64,
}

impl PointerSampler {
    /// Create a sampler with the given policy.
    #[must_use]
    pub fn new(policy: SamplingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// The active sampling policy.
    #[must_use]
    pub const fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    /// Feed a raw pointer move observed at `now`.
    ///
    /// Returns `true` if this event opened a new sampling slot, `false` if it
    /// was folded into an already pending one (or ignored).
    pub fn push(&mut self, event: PointerEvent, now: Duration) -> bool {
        let position = event.position();
        if !position.is_finite() {
            return false;
        }
        self.received = self.received.saturating_add(1);

        if let Some(pending) = self.pending.as_mut() {
            // Latest position wins; the slot deadline stays where it was.
            pending.position = position;
            return false;
        }

        let due_at = match self.policy {
            SamplingPolicy::FrameAligned => now,
            SamplingPolicy::Throttle { interval } => now.saturating_add(interval),
        };
        self.pending = Some(PendingSample { position, due_at });
        true
    }

    /// Publish the pending sample if its slot has elapsed at `now`.
    ///
    /// Returns the newly published signal, or `None` if nothing was due.
    pub fn poll(&mut self, now: Duration) -> Option<PointerSignal> {
        let pending = self.pending?;
        if now < pending.due_at {
            return None;
        }
        self.pending = None;
        self.signal = PointerSignal {
            position: pending.position,
            generation: self.signal.generation.wrapping_add(1),
        };
        Some(self.signal)
    }

    /// The most recently published signal.
    #[inline]
    #[must_use]
    pub const fn signal(&self) -> PointerSignal {
        self.signal
    }

    /// When the pending sample becomes due, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.due_at)
    }

    /// Whether a sample is waiting to be published.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total raw moves accepted (including coalesced ones).
    #[must_use]
    pub const fn received(&self) -> u64 {
        self.received
    }

    /// Drop any pending sample without publishing it.
    pub fn cancel(&mut self) {
        #[cfg(feature = "tracing")]
        if self.pending.is_some() {
            tracing::trace!(target: "driftfield.pointer", "pending pointer sample cancelled");
        }
        self.pending = None;
    }
}
