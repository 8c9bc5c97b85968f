#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are viewport pixels (f64, origin at top-left) unless a type
//! says otherwise. Element layout is expressed in percent of the viewport and
//! converted with [`Viewport::to_pixels`].

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Distances below this are treated as zero when normalizing.
pub const EPSILON_DISTANCE: f64 = 1e-9;

/// A 2D vector in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or [`Vec2::ZERO`] when the length
    /// is (numerically) zero.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len < EPSILON_DISTANCE || !len.is_finite() {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Whether both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A position expressed as percent of the viewport, each axis in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    /// Create a new percent position. Components are clamped to `[0, 100]`.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
        }
    }
}

/// Viewport size in pixels.
///
/// A zero (or non-finite) dimension means the viewport has not been measured
/// yet; percent-to-pixel conversion is suppressed until it has.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Placeholder used before the first measurement lands.
    pub const UNMEASURED: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a viewport. Negative or non-finite dimensions collapse to zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    /// Whether both dimensions have been measured.
    #[inline]
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Viewport center in pixels.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert a percent position to pixels.
    ///
    /// Returns `None` while the viewport is unmeasured.
    #[must_use]
    pub fn to_pixels(&self, at: PercentPoint) -> Option<Vec2> {
        self.is_measured()
            .then(|| Vec2::new(at.x / 100.0 * self.width, at.y / 100.0 * self.height))
    }

    /// Map a pixel position into `[-1, 1]` on each axis (center is origin).
    ///
    /// Returns [`Vec2::ZERO`] while the viewport is unmeasured.
    #[must_use]
    pub fn normalize(&self, point: Vec2) -> Vec2 {
        if !self.is_measured() {
            return Vec2::ZERO;
        }
        Vec2::new(
            point.x / self.width * 2.0 - 1.0,
            point.y / self.height * 2.0 - 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_vector_is_zero() {
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
        assert_eq!(Vec2::new(1e-12, 0.0).normalize_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn normalize_unit_length() {
        let n = Vec2::new(3.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn percent_point_clamps() {
        let p = PercentPoint::new(-5.0, 140.0);
        assert_eq!(p, PercentPoint { x: 0.0, y: 100.0 });
    }

    #[test]
    fn unmeasured_viewport_suppresses_conversion() {
        let vp = Viewport::new(0.0, 800.0);
        assert!(!vp.is_measured());
        assert!(vp.to_pixels(PercentPoint::new(50.0, 50.0)).is_none());
        assert_eq!(vp.normalize(Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }

    #[test]
    fn percent_to_pixels() {
        let vp = Viewport::new(1200.0, 800.0);
        let p = vp.to_pixels(PercentPoint::new(60.0, 40.0)).unwrap();
        assert!((p.x - 720.0).abs() < 1e-9);
        assert!((p.y - 320.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_maps_corners() {
        let vp = Viewport::new(1000.0, 500.0);
        assert_eq!(vp.normalize(Vec2::ZERO), Vec2::new(-1.0, -1.0));
        assert_eq!(vp.normalize(vp.center()), Vec2::ZERO);
        assert_eq!(vp.normalize(Vec2::new(1000.0, 500.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn negative_dimensions_collapse() {
        let vp = Viewport::new(-10.0, f64::NAN);
        assert_eq!(vp, Viewport::UNMEASURED);
    }
}
