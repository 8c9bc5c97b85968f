#![forbid(unsafe_code)]

//! Easing curves.
//!
//! The named curves match the CSS/Web Animations definitions so motion tuned
//! in a browser looks the same here:
//!
//! | Curve | Control points |
//! |-------|----------------|
//! | [`ease_in`] | (0.42, 0, 1, 1) |
//! | [`ease_out`] | (0, 0, 0.58, 1) |
//! | [`ease_in_out`] | (0.42, 0, 0.58, 1) |

/// Easing function over normalized time `t ∈ [0, 1]`.
pub type EasingFn = fn(f64) -> f64;

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f64 = 1e-6;
const SUBDIVISION_PRECISION: f64 = 1e-7;
const SUBDIVISION_MAX_ITERATIONS: usize = 24;

/// A cubic Bézier timing curve anchored at (0, 0) and (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    /// Create a curve from its two inner control points. `x1` and `x2` are
    /// clamped to `[0, 1]` so the curve stays a function of time.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn sample(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        ((a * t + b) * t + c) * t
    }

    fn slope(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        (3.0 * a * t + 2.0 * b) * t + c
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < SUBDIVISION_PRECISION {
                return t;
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < NEWTON_MIN_SLOPE {
                break;
            }
            t -= err / d;
        }

        // Newton stalled; fall back to bisection.
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            let v = Self::sample(self.x1, self.x2, t);
            if (v - x).abs() < SUBDIVISION_PRECISION {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Evaluate the curve at normalized time `x` (clamped to `[0, 1]`).
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

const EASE_IN: CubicBezier = CubicBezier {
    x1: 0.42,
    y1: 0.0,
    x2: 1.0,
    y2: 1.0,
};
const EASE_OUT: CubicBezier = CubicBezier {
    x1: 0.0,
    y1: 0.0,
    x2: 0.58,
    y2: 1.0,
};
const EASE_IN_OUT: CubicBezier = CubicBezier {
    x1: 0.42,
    y1: 0.0,
    x2: 0.58,
    y2: 1.0,
};

/// Identity easing.
#[must_use]
pub fn linear(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Slow start.
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    EASE_IN.eval(t)
}

/// Slow finish.
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    EASE_OUT.eval(t)
}

/// Slow start and finish.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    EASE_IN_OUT.eval(t)
}
