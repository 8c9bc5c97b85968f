#![allow(dead_code)]

//! Shared test host.

use std::time::Duration;

use driftfield_core::event::{EventKind, HostEvent, PointerEvent};
use driftfield_runtime::{EventHost, Listener, ListenerId};

/// In-memory host that records how often listeners run.
pub struct MockHost {
    size: (f64, f64),
    listeners: Vec<(ListenerId, EventKind, Listener)>,
    next_id: u64,
    /// Total listener invocations.
    pub invocations: usize,
}

impl MockHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: (width, height),
            listeners: Vec::new(),
            next_id: 0,
            invocations: 0,
        }
    }

    pub fn dispatch(&mut self, event: HostEvent, now: Duration) -> usize {
        if let HostEvent::Resize { width, height } = event {
            self.size = (width, height);
        }
        let mut delivered = 0;
        for (_, kind, listener) in &mut self.listeners {
            if *kind == event.kind() {
                listener(&event, now);
                delivered += 1;
            }
        }
        self.invocations += delivered;
        delivered
    }

    pub fn pointer(&mut self, x: f64, y: f64, now: Duration) -> usize {
        self.dispatch(HostEvent::PointerMove(PointerEvent::new(x, y)), now)
    }

    pub fn resize(&mut self, width: f64, height: f64, now: Duration) -> usize {
        self.dispatch(HostEvent::Resize { width, height }, now)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl EventHost for MockHost {
    fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, kind, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    fn viewport_size(&self) -> (f64, f64) {
        self.size
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
