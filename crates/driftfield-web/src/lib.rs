#![forbid(unsafe_code)]

//! `driftfield-web` provides host building blocks for embedding the field
//! engine in a browser (or any other event-pushing environment).
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) pushes pointer moves
//!   and size changes; nothing here polls the platform.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   so whole sessions replay bit-for-bit in tests.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. It provides the listener
//! registry ([`HostWindow`]), clocks, a frame driver ([`StepRunner`]) and
//! session record/replay that a thin JS wrapper can expose.

#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod session_record;
pub mod step;

use core::time::Duration;
use std::collections::VecDeque;

use driftfield_core::event::{EventKind, HostEvent, PointerEvent};
use driftfield_runtime::{EventHost, HostClock, Listener, ListenerId};

pub use session_record::{SessionRecorder, SessionTrace, replay};
pub use step::{StepResult, StepRunner};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Wall clock backed by `performance.now()` on wasm and `Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Clock whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl HostClock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// In-process window: listener registry, window size and an event queue.
///
/// Events can be delivered immediately with [`dispatch`](Self::dispatch) or
/// queued with [`push_event`](Self::push_event) and delivered in arrival
/// order by [`flush`](Self::flush).
pub struct HostWindow {
    size: (f64, f64),
    registrations: Vec<Registration>,
    next_id: u64,
    queue: VecDeque<(HostEvent, Duration)>,
    delivered: u64,
}

impl core::fmt::Debug for HostWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HostWindow")
            .field("size", &self.size)
            .field("listeners", &self.registrations.len())
            .field("queued", &self.queue.len())
            .field("delivered", &self.delivered)
            .finish()
    }
}

impl HostWindow {
    /// Create a window with an initial inner size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: (width, height),
            registrations: Vec::new(),
            next_id: 0,
            queue: VecDeque::new(),
            delivered: 0,
        }
    }

    /// Current inner size.
    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        self.size
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registrations.len()
    }

    /// Number of registered listeners for `kind`.
    #[must_use]
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.registrations.iter().filter(|r| r.kind == kind).count()
    }

    /// Total listener invocations so far.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Deliver `event` to every listener of its kind, in registration order.
    ///
    /// A resize updates the window size before listeners run. Returns the
    /// number of listeners invoked.
    pub fn dispatch(&mut self, event: HostEvent, now: Duration) -> usize {
        if let HostEvent::Resize { width, height } = event {
            self.size = (width, height);
        }
        let kind = event.kind();
        let mut invoked = 0;
        for registration in &mut self.registrations {
            if registration.kind == kind {
                (registration.listener)(&event, now);
                invoked += 1;
            }
        }
        self.delivered += invoked as u64;
        invoked
    }

    /// Dispatch a pointer move.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Duration) -> usize {
        self.dispatch(HostEvent::PointerMove(PointerEvent::new(x, y)), now)
    }

    /// Dispatch a resize.
    pub fn resize(&mut self, width: f64, height: f64, now: Duration) -> usize {
        self.dispatch(HostEvent::Resize { width, height }, now)
    }

    /// Queue an event for the next [`flush`](Self::flush).
    pub fn push_event(&mut self, event: HostEvent, now: Duration) {
        self.queue.push_back((event, now));
    }

    /// Events waiting to be flushed.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Drop queued events without delivering them. Returns how many were
    /// dropped.
    pub fn clear_queue(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Dispatch every queued event in arrival order. Returns the number of
    /// listener invocations.
    pub fn flush(&mut self) -> usize {
        let mut invoked = 0;
        while let Some((event, at)) = self.queue.pop_front() {
            invoked += self.dispatch(event, at);
        }
        invoked
    }
}

impl EventHost for HostWindow {
    fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.registrations.push(Registration { id, kind, listener });
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "driftfield.web", id = id.0, kind = ?kind, "listener added");
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        let removed = self.registrations.len() != before;
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "driftfield.web", id = id.0, removed, "listener removed");
        removed
    }

    fn viewport_size(&self) -> (f64, f64) {
        self.size
    }
}
