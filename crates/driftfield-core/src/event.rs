#![forbid(unsafe_code)]

//! Canonical host events.
//!
//! The embedding platform translates its native pointer and window events into
//! [`HostEvent`] values. Coordinates are viewport pixels (the DOM's
//! `clientX`/`clientY` space).

use crate::geometry::Vec2;

/// A pointer-move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// X coordinate in viewport pixels.
    pub x: f64,
    /// Y coordinate in viewport pixels.
    pub y: f64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get the position as a vector.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// An event delivered by the host platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The pointer moved.
    PointerMove(PointerEvent),

    /// The window was resized to the given inner dimensions.
    Resize { width: f64, height: f64 },
}

impl HostEvent {
    /// The listener kind this event is routed to.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::Resize { .. } => EventKind::Resize,
        }
    }
}

/// Listener categories a host can route events to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    Resize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_routes_by_variant() {
        let mv = HostEvent::PointerMove(PointerEvent::new(1.0, 2.0));
        let rs = HostEvent::Resize {
            width: 10.0,
            height: 20.0,
        };
        assert_eq!(mv.kind(), EventKind::PointerMove);
        assert_eq!(rs.kind(), EventKind::Resize);
    }

    #[test]
    fn pointer_position() {
        assert_eq!(PointerEvent::new(3.0, 4.0).position(), Vec2::new(3.0, 4.0));
    }
}
