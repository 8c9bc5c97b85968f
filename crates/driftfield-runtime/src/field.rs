#![forbid(unsafe_code)]

//! Pointer force field.
//!
//! Each element's target displacement is the sum of two terms, both pure
//! functions of the pointer position, the viewport and the element:
//!
//! **Magnetic.** With `d = pointer − anchor` and `r = |d|`:
//!
//! ```text
//! r ≥ R            → 0
//! inner ≤ r < R    → d/r · max_pull · s · (1 − r/R)^p
//! r < inner        → the same, times the repulsion factor
//! ```
//!
//! **Parallax.** `n · factor · range`, where `n` is the pointer normalized to
//! `[-1, 1]` on each axis around the viewport center. The shift depends on
//! where the pointer sits relative to the viewport, not on the viewport's
//! size in pixels.
//!
//! Elements never interact; evaluating one element never reads another.
//! An unmeasured viewport and a pointer that has never moved both yield zero.

use driftfield_core::geometry::{EPSILON_DISTANCE, Vec2, Viewport};
use driftfield_core::pointer_sampler::PointerSignal;

use crate::catalog::Element;
use crate::config::{CategoryTuning, FieldConfig};

/// What every element in one frame is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldSnapshot {
    /// `None` until the first pointer sample is published.
    pub pointer: Option<Vec2>,
    pub viewport: Viewport,
}

impl FieldSnapshot {
    /// Snapshot from the sampler's published signal.
    #[must_use]
    pub fn new(signal: PointerSignal, viewport: Viewport) -> Self {
        Self {
            pointer: (signal.generation > 0).then_some(signal.position),
            viewport,
        }
    }
}

/// Signed magnetic magnitude at distance `r`. Positive pulls toward the
/// pointer, negative pushes away.
#[must_use]
pub fn magnetic_strength(r: f64, field: &FieldConfig, tuning: &CategoryTuning) -> f64 {
    if !r.is_finite() || r >= field.radius || field.radius <= 0.0 {
        return 0.0;
    }
    let falloff = (1.0 - r / field.radius).max(0.0).powf(tuning.falloff_exponent);
    let pull = field.max_pull * tuning.strength * falloff;
    if r < field.inner_radius {
        pull * field.repulsion_factor
    } else {
        pull
    }
}

/// Magnetic displacement of an element anchored at `anchor`.
#[must_use]
pub fn magnetic(pointer: Vec2, anchor: Vec2, field: &FieldConfig, tuning: &CategoryTuning) -> Vec2 {
    let d = pointer - anchor;
    let r = d.length();
    if r < EPSILON_DISTANCE {
        return Vec2::ZERO;
    }
    let strength = magnetic_strength(r, field, tuning);
    if strength == 0.0 {
        return Vec2::ZERO;
    }
    d.normalize_or_zero() * strength
}

/// Parallax displacement for `factor`, at most `factor · range_px` per axis
/// while the pointer is inside the viewport.
#[must_use]
pub fn parallax(pointer: Vec2, viewport: Viewport, factor: f64, range_px: f64) -> Vec2 {
    if !viewport.is_measured() {
        return Vec2::ZERO;
    }
    viewport.normalize(pointer) * (factor * range_px)
}

/// Combined target displacement for `element`.
#[must_use]
pub fn target_displacement(
    element: &Element,
    snapshot: &FieldSnapshot,
    field: &FieldConfig,
    tuning: &CategoryTuning,
) -> Vec2 {
    let Some(pointer) = snapshot.pointer.filter(|p| p.is_finite()) else {
        return Vec2::ZERO;
    };
    let Some(anchor) = snapshot.viewport.to_pixels(element.position) else {
        return Vec2::ZERO;
    };
    let target = magnetic(pointer, anchor, field, tuning)
        + parallax(
            pointer,
            snapshot.viewport,
            tuning.parallax_factor,
            field.parallax_range_px,
        );
    if target.is_finite() { target } else { Vec2::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, JitterTable, Theme};
    use crate::config::CategoryTable;

    fn code() -> CategoryTuning {
        CategoryTable::default().code
    }

    #[test]
    fn zero_at_and_beyond_radius() {
        let field = FieldConfig::default();
        assert_eq!(magnetic_strength(200.0, &field, &code()), 0.0);
        assert_eq!(magnetic_strength(500.0, &field, &code()), 0.0);
        let far = magnetic(Vec2::new(0.0, 0.0), Vec2::new(300.0, 0.0), &field, &code());
        assert_eq!(far, Vec2::ZERO);
    }

    #[test]
    fn coincident_pointer_is_zero() {
        let field = FieldConfig::default();
        let p = Vec2::new(42.0, 42.0);
        assert_eq!(magnetic(p, p, &field, &code()), Vec2::ZERO);
    }

    #[test]
    fn pulls_toward_pointer_outside_inner_radius() {
        let field = FieldConfig::default();
        let pull = magnetic(Vec2::new(100.0, 0.0), Vec2::ZERO, &field, &code());
        assert!(pull.x > 0.0);
        assert_eq!(pull.y, 0.0);
        let expected = 30.0 * 0.4 * 0.5f64.powf(1.25);
        assert!((pull.x - expected).abs() < 1e-9);
    }

    #[test]
    fn pushes_away_inside_inner_radius() {
        let field = FieldConfig::default();
        let push = magnetic(Vec2::new(20.0, 0.0), Vec2::ZERO, &field, &code());
        assert!(push.x < 0.0);
        let expected = -0.5 * 30.0 * 0.4 * 0.9f64.powf(1.25);
        assert!((push.x - expected).abs() < 1e-9);
    }

    #[test]
    fn repulsion_is_configurable() {
        let field = FieldConfig {
            repulsion_factor: 1.0,
            ..FieldConfig::default()
        };
        let pull = magnetic(Vec2::new(20.0, 0.0), Vec2::ZERO, &field, &code());
        assert!(pull.x > 0.0);
    }

    #[test]
    fn magnitude_bounded_by_max_pull() {
        let field = FieldConfig::default();
        let tuning = code();
        for r in 1..200 {
            let s = magnetic_strength(f64::from(r), &field, &tuning);
            assert!(s.abs() <= field.max_pull * tuning.strength + 1e-12);
        }
    }

    #[test]
    fn stars_do_not_react() {
        let field = FieldConfig::default();
        let star = CategoryTable::default().star;
        assert_eq!(magnetic(Vec2::new(60.0, 0.0), Vec2::ZERO, &field, &star), Vec2::ZERO);
    }

    #[test]
    fn parallax_follows_offset_from_center() {
        let viewport = Viewport::new(1200.0, 800.0);
        assert_eq!(parallax(Vec2::new(600.0, 400.0), viewport, 0.05, 50.0), Vec2::ZERO);
        let shifted = parallax(Vec2::new(900.0, 200.0), viewport, 0.05, 50.0);
        assert!((shifted.x - 1.25).abs() < 1e-12);
        assert!((shifted.y + 1.25).abs() < 1e-12);
        assert_eq!(
            parallax(Vec2::new(700.0, 300.0), Viewport::UNMEASURED, 0.05, 50.0),
            Vec2::ZERO
        );
    }

    #[test]
    fn parallax_corner_is_factor_times_range() {
        let code = code();
        let corner = parallax(Vec2::ZERO, Viewport::new(1200.0, 800.0), code.parallax_factor, 50.0);
        assert!((corner.x + 2.5).abs() < 1e-12, "{corner:?}");
        assert!((corner.y + 2.5).abs() < 1e-12, "{corner:?}");
    }

    #[test]
    fn parallax_ignores_viewport_scale() {
        let small = Viewport::new(800.0, 600.0);
        let large = Viewport::new(3840.0, 2160.0);
        let a = parallax(Vec2::new(600.0, 450.0), small, 0.03, 50.0);
        let b = parallax(Vec2::new(2880.0, 1620.0), large, 0.03, 50.0);
        assert!((a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12);
        assert!(a.x.abs() <= 0.03 * 50.0);
    }

    #[test]
    fn magnetic_outweighs_parallax_for_code() {
        let field = FieldConfig::default();
        let code = code();
        let peak_parallax = code.parallax_factor * field.parallax_range_px;
        let pull = magnetic_strength(field.inner_radius, &field, &code);
        assert!(pull > peak_parallax, "pull={pull} parallax={peak_parallax}");
    }

    #[test]
    fn shape_at_sixty_forty_is_attracted() {
        let catalog = Catalog::build(Theme::Dark, &JitterTable::generate(1, 0));
        let shape = catalog.get("shape-1").unwrap();
        let field = FieldConfig::default();
        let tuning = CategoryTable::default().shape;
        let viewport = Viewport::new(1200.0, 800.0);

        let anchor = viewport.to_pixels(shape.position).unwrap();
        let pointer = Vec2::new(600.0, 400.0);
        let r = (pointer - anchor).length();
        assert!((r - 20_800f64.sqrt()).abs() < 1e-9, "r={r}");
        assert!(r < field.radius);
        assert!(magnetic_strength(r, &field, &tuning) > 0.0);

        let snapshot = FieldSnapshot {
            pointer: Some(Vec2::ZERO),
            viewport,
        };
        let at_origin = target_displacement(shape, &snapshot, &field, &tuning);
        assert!((Vec2::ZERO - anchor).length() > field.radius);
        let expected = parallax(
            Vec2::ZERO,
            viewport,
            tuning.parallax_factor,
            field.parallax_range_px,
        );
        assert_eq!(at_origin, expected);
    }

    #[test]
    fn no_pointer_yet_is_zero() {
        let catalog = Catalog::build(Theme::Dark, &JitterTable::generate(1, 0));
        let snapshot = FieldSnapshot::new(PointerSignal::default(), Viewport::new(1200.0, 800.0));
        assert_eq!(snapshot.pointer, None);
        for element in catalog.elements() {
            let t = target_displacement(element, &snapshot, &FieldConfig::default(), &code());
            assert_eq!(t, Vec2::ZERO);
        }
    }

    #[test]
    fn unmeasured_viewport_is_zero() {
        let catalog = Catalog::build(Theme::Dark, &JitterTable::generate(1, 0));
        let snapshot = FieldSnapshot {
            pointer: Some(Vec2::new(10.0, 10.0)),
            viewport: Viewport::new(0.0, 800.0),
        };
        let element = catalog.get("code-1").unwrap();
        assert_eq!(
            target_displacement(element, &snapshot, &FieldConfig::default(), &code()),
            Vec2::ZERO
        );
    }
}
