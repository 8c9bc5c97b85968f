#![forbid(unsafe_code)]

//! Host platform seam.
//!
//! The engine never owns an event loop. The embedding platform (browser
//! window, native shell, test harness) implements [`EventHost`] to deliver
//! pointer and resize events to registered listeners, and [`HostClock`] to
//! report monotonic time.

use std::time::Duration;

use driftfield_core::event::{EventKind, HostEvent};

/// Callback invoked with each routed event and the time it was delivered.
pub type Listener = Box<dyn FnMut(&HostEvent, Duration)>;

/// Handle returned by [`EventHost::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Listener registry and window metrics of the host platform.
pub trait EventHost {
    /// Register `listener` for events of `kind`.
    fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Detach a listener. Returns `false` if it was not registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Current inner size of the window in pixels.
    fn viewport_size(&self) -> (f64, f64);
}

/// Monotonic time source.
pub trait HostClock {
    /// Time since an arbitrary fixed origin.
    fn now_mono(&self) -> Duration;
}
