#![forbid(unsafe_code)]

//! Idle motion and entrance animation.
//!
//! Every element breathes on its own even when the pointer is still:
//!
//! | Category | Motion | Keyframes | Period |
//! |----------|--------|-----------|--------|
//! | Code | vertical bob (px) | 0, −10, 0, 10, 0 | 8 s + 4 s·jitter |
//! | Bracket | rotation (deg) | 0, 5, 0, −5, 0 | 10 s + 5 s·jitter |
//! | Shape | rotation (deg) | 0 → 360, linear | 20 s + 10 s·jitter |
//! | Star | opacity, scale | 0.1, 0.5, 0.1 / 1, 1.2, 1 | 4 s + 4 s·jitter |
//! | Terminal | none | | |
//!
//! All waveforms are evaluated on wrapped time, so a sample is a pure
//! function of elapsed time and repeats exactly every period.
//!
//! On top of that each element has a one-shot [`Entrance`] that fades it in
//! once the engine becomes ready.

use std::time::Duration;

use ahash::AHashMap;
use driftfield_core::animation::{Fade, Keyframes, Waveform, ease_in_out, ease_out, linear};

use crate::catalog::{Category, Catalog, Element, ElementId};

const CODE_BOB: Keyframes = Keyframes::new(&[0.0, -10.0, 0.0, 10.0, 0.0], ease_in_out);
const BRACKET_SWAY: Keyframes = Keyframes::new(&[0.0, 5.0, 0.0, -5.0, 0.0], ease_in_out);
const SHAPE_SPIN: Keyframes = Keyframes::new(&[0.0, 360.0], linear);
const STAR_OPACITY: Keyframes = Keyframes::new(&[0.1, 0.5, 0.1], ease_in_out);
const STAR_SCALE: Keyframes = Keyframes::new(&[1.0, 1.2, 1.0], ease_in_out);

/// `base + spread · jitter`, in seconds.
fn jittered(base: f64, spread: f64, jitter: f64) -> Duration {
    Duration::from_secs_f64(base + spread * jitter.clamp(0.0, 1.0))
}

/// Idle contribution at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleSample {
    /// Vertical offset in pixels.
    pub offset_y: f64,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Opacity multiplier.
    pub opacity: f64,
    /// Scale multiplier.
    pub scale: f64,
}

impl Default for IdleSample {
    fn default() -> Self {
        Self {
            offset_y: 0.0,
            rotation_deg: 0.0,
            opacity: 1.0,
            scale: 1.0,
        }
    }
}

/// Periodic motion for one element.
#[derive(Debug, Clone, Copy)]
pub enum IdleMotion {
    Bob(Waveform),
    Sway(Waveform),
    Spin(Waveform),
    Twinkle { opacity: Waveform, scale: Waveform },
    Still,
}

impl IdleMotion {
    /// Motion for `element`, with period and delay spread by its jitter.
    #[must_use]
    pub fn for_element(element: &Element) -> Self {
        let j = element.jitter;
        match element.category {
            Category::Code => Self::Bob(Waveform::new(CODE_BOB, jittered(8.0, 4.0, j.period))),
            Category::Bracket => {
                Self::Sway(Waveform::new(BRACKET_SWAY, jittered(10.0, 5.0, j.period)))
            }
            Category::Shape => {
                Self::Spin(Waveform::new(SHAPE_SPIN, jittered(20.0, 10.0, j.period)))
            }
            Category::Star => {
                let period = jittered(4.0, 4.0, j.period);
                let delay = jittered(0.0, 2.0, j.delay);
                Self::Twinkle {
                    opacity: Waveform::new(STAR_OPACITY, period).with_delay(delay),
                    scale: Waveform::new(STAR_SCALE, period).with_delay(delay),
                }
            }
            Category::Terminal => Self::Still,
        }
    }

    /// Cycle length, if the motion repeats.
    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        match self {
            Self::Bob(w) | Self::Sway(w) | Self::Spin(w) => Some(w.period()),
            Self::Twinkle { opacity, .. } => Some(opacity.period()),
            Self::Still => None,
        }
    }

    /// Sample at `elapsed` since the engine became ready.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> IdleSample {
        let mut out = IdleSample::default();
        match self {
            Self::Bob(w) => out.offset_y = w.sample(elapsed),
            Self::Sway(w) | Self::Spin(w) => out.rotation_deg = w.sample(elapsed),
            Self::Twinkle { opacity, scale } => {
                out.opacity = opacity.sample(elapsed);
                out.scale = scale.sample(elapsed);
            }
            Self::Still => {}
        }
        out
    }
}

/// Entrance state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceSample {
    pub opacity: f64,
    pub scale: f64,
    pub offset_y: f64,
}

/// One-shot fade-in from an initial pose to the resting pose.
#[derive(Debug, Clone, Copy)]
pub struct Entrance {
    fade: Fade,
    delay: Duration,
    resting_opacity: f64,
    initial_scale: f64,
    initial_offset_y: f64,
}

impl Entrance {
    /// Entrance for `element`, delay spread by its jitter.
    #[must_use]
    pub fn for_element(element: &Element) -> Self {
        let j = element.jitter.entrance;
        let (resting_opacity, initial_scale, initial_offset_y, duration, delay) =
            match element.category {
                Category::Code => (0.4, 0.8, 0.0, 1.2, jittered(0.0, 0.5, j)),
                Category::Bracket => (0.35, 0.8, 0.0, 1.2, jittered(0.2, 0.3, j)),
                Category::Shape => (0.3, 0.5, 0.0, 1.5, jittered(0.5, 0.5, j)),
                Category::Terminal => (0.45, 1.0, 20.0, 1.2, jittered(0.4, 0.3, j)),
                Category::Star => (1.0, 1.0, 0.0, 0.0, Duration::ZERO),
            };
        Self {
            fade: Fade::new(Duration::from_secs_f64(duration))
                .delay(delay)
                .easing(ease_out),
            delay,
            resting_opacity,
            initial_scale,
            initial_offset_y,
        }
    }

    /// Opacity once the entrance has finished.
    #[must_use]
    pub const fn resting_opacity(&self) -> f64 {
        self.resting_opacity
    }

    /// Delay before the entrance starts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Pose at `elapsed` since the engine became ready.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> EntranceSample {
        let t = self.fade.progress_at(elapsed);
        EntranceSample {
            opacity: self.resting_opacity * t,
            scale: self.initial_scale + (1.0 - self.initial_scale) * t,
            offset_y: self.initial_offset_y * (1.0 - t),
        }
    }

    /// Whether the entrance has finished at `elapsed`.
    #[must_use]
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.fade.total()
    }
}

/// Idle motion and entrance for one element.
#[derive(Debug, Clone, Copy)]
pub struct ElementMotion {
    pub idle: IdleMotion,
    pub entrance: Entrance,
}

impl ElementMotion {
    #[must_use]
    pub fn for_element(element: &Element) -> Self {
        Self {
            idle: IdleMotion::for_element(element),
            entrance: Entrance::for_element(element),
        }
    }
}

/// Motion for every element of a catalog, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MotionTable {
    motions: AHashMap<ElementId, ElementMotion>,
}

impl MotionTable {
    /// Derive motion for every element in `catalog`.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let motions = catalog
            .elements()
            .iter()
            .map(|e| (e.id.clone(), ElementMotion::for_element(e)))
            .collect();
        Self { motions }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ElementMotion> {
        self.motions.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.motions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    pub fn clear(&mut self) {
        self.motions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{JitterTable, Theme};

    fn catalog() -> Catalog {
        Catalog::build(Theme::Dark, &JitterTable::generate(11, 30))
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn periods_within_category_ranges() {
        for element in catalog().elements() {
            let period = IdleMotion::for_element(element).period();
            let range = match element.category {
                Category::Code => Some((8.0, 12.0)),
                Category::Bracket => Some((10.0, 15.0)),
                Category::Shape => Some((20.0, 30.0)),
                Category::Star => Some((4.0, 8.0)),
                Category::Terminal => None,
            };
            match (period, range) {
                (Some(p), Some((lo, hi))) => {
                    let p = p.as_secs_f64();
                    assert!(p >= lo && p <= hi, "{}: {p}", element.id);
                }
                (None, None) => {}
                other => panic!("{}: {other:?}", element.id),
            }
        }
    }

    #[test]
    fn samples_repeat_every_period() {
        for element in catalog().elements() {
            let motion = IdleMotion::for_element(element);
            let Some(period) = motion.period() else {
                continue;
            };
            for t in [secs(2.5), secs(31.0), secs(600.25)] {
                assert_eq!(motion.sample(t), motion.sample(t + period), "{}", element.id);
            }
        }
    }

    #[test]
    fn code_bobs_within_ten_pixels() {
        let catalog = catalog();
        let motion = IdleMotion::for_element(catalog.get("code-1").unwrap());
        for ms in (0..12_000).step_by(50) {
            let s = motion.sample(Duration::from_millis(ms));
            assert!(s.offset_y.abs() <= 10.0 + 1e-9);
            assert_eq!(s.rotation_deg, 0.0);
        }
    }

    #[test]
    fn star_twinkle_bounds() {
        let catalog = catalog();
        let motion = IdleMotion::for_element(catalog.get("star-3").unwrap());
        for ms in (0..20_000).step_by(77) {
            let s = motion.sample(Duration::from_millis(ms));
            assert!((0.1 - 1e-9..=0.5 + 1e-9).contains(&s.opacity));
            assert!((1.0 - 1e-9..=1.2 + 1e-9).contains(&s.scale));
        }
    }

    #[test]
    fn terminals_are_still() {
        let catalog = catalog();
        let motion = IdleMotion::for_element(catalog.get("term-1").unwrap());
        assert_eq!(motion.sample(secs(3.3)), IdleSample::default());
    }

    #[test]
    fn entrance_starts_hidden_and_settles() {
        for element in catalog().elements() {
            let entrance = Entrance::for_element(element);
            let end = entrance.sample(secs(5.0));
            assert!(entrance.is_complete(secs(5.0)));
            assert_eq!(end.scale, 1.0);
            assert_eq!(end.offset_y, 0.0);
            assert_eq!(end.opacity, entrance.resting_opacity());
            if element.category != Category::Star {
                assert_eq!(entrance.sample(Duration::ZERO).opacity, 0.0, "{}", element.id);
            }
        }
    }

    #[test]
    fn entrance_poses() {
        let catalog = catalog();
        let shape = Entrance::for_element(catalog.get("shape-2").unwrap());
        assert_eq!(shape.sample(Duration::ZERO).scale, 0.5);
        assert_eq!(shape.resting_opacity(), 0.3);

        let term = Entrance::for_element(catalog.get("term-2").unwrap());
        assert_eq!(term.sample(Duration::ZERO).offset_y, 20.0);
        assert_eq!(term.sample(Duration::ZERO).scale, 1.0);
        let delay = term.delay().as_secs_f64();
        assert!((0.4 - 1e-6..0.7 + 1e-6).contains(&delay), "delay={delay}");
    }

    #[test]
    fn stars_visible_immediately() {
        let catalog = catalog();
        let star = Entrance::for_element(catalog.get("star-1").unwrap());
        assert!(star.sample(Duration::from_nanos(1)).opacity > 0.99);
    }

    #[test]
    fn table_covers_catalog() {
        let catalog = catalog();
        let table = MotionTable::build(&catalog);
        assert_eq!(table.len(), catalog.len());
        assert!(catalog.ids().all(|id| table.get(id.as_str()).is_some()));
    }
}
