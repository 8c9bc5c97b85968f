#![forbid(unsafe_code)]

//! Frame composition.
//!
//! [`Compositor::compose`] combines, per element, the base position, the idle
//! sample, the entrance pose and the smoothed field displacement into a flat
//! list of [`RenderNode`]s, plus the layer-wide backdrop and pointer glow.
//!
//! A [`Frame`] is plain data. The host maps it onto whatever it draws with
//! (DOM nodes, a canvas, a GPU batch). Nodes are emitted in stacking order,
//! lowest first, and within a layer in catalog order.
//!
//! The whole layer is decorative: the frame and every node carry
//! [`PointerEvents::None`] so they never intercept input meant for the
//! content above.

use std::time::Duration;

use driftfield_core::animation::{Fade, Keyframes, Waveform, ease_in_out, ease_out};
use driftfield_core::geometry::{Vec2, Viewport};

use crate::catalog::{BackdropPalette, Catalog, Category, ElementId, Payload, Rgb};
use crate::idle::MotionTable;
use crate::smoother::SpringSmoother;

const BACKDROP_SWAP: Keyframes = Keyframes::new(&[0.0, 1.0, 0.0], ease_in_out);
const BACKDROP_PERIOD: Duration = Duration::from_secs(20);
const GLOW_SCALE: Keyframes = Keyframes::new(&[1.0, 1.1, 1.0], ease_in_out);
const GLOW_OPACITY: Keyframes = Keyframes::new(&[0.1, 0.15, 0.1], ease_in_out);
const GLOW_PERIOD: Duration = Duration::from_secs(2);

/// Whether a node takes part in hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEvents {
    /// Transparent to input.
    #[default]
    None,
    /// Receives input.
    Auto,
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: ElementId,
    pub category: Category,
    pub payload: Payload,
    pub color: Rgb,
    /// Font size or shape edge in pixels.
    pub size: f64,
    /// Base position in pixels.
    pub left: f64,
    pub top: f64,
    /// Field displacement plus idle and entrance offsets, in pixels.
    pub translate: Vec2,
    pub rotation_deg: f64,
    pub scale: f64,
    pub opacity: f64,
    pub z_index: i32,
    pub pointer_events: PointerEvents,
}

/// Background gradient state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropLayer {
    pub from: Rgb,
    pub to: Rgb,
    /// 0.0 draws `from → to`, 1.0 draws `to → from`.
    pub blend: f64,
}

/// Soft light that trails the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowNode {
    /// Center in pixels.
    pub position: Vec2,
    pub color: Rgb,
    pub scale: f64,
    pub opacity: f64,
}

/// Everything to draw for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    /// Opacity of the whole layer.
    pub layer_opacity: f64,
    pub pointer_events: PointerEvents,
    pub backdrop: BackdropLayer,
    /// `None` until the pointer has moved.
    pub glow: Option<GlowNode>,
    /// Ascending z-order.
    pub nodes: Vec<RenderNode>,
}

impl Frame {
    /// Node for `id`, if present.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }
}

/// Inputs for one composition pass.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub catalog: &'a Catalog,
    pub motions: &'a MotionTable,
    pub smoother: &'a SpringSmoother,
    pub viewport: Viewport,
    /// Time since the engine became ready.
    pub since_ready: Duration,
    /// Smoothed glow center, once the pointer has moved.
    pub glow: Option<Vec2>,
}

/// Stateless frame builder.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    layer_fade: Fade,
    backdrop: Waveform,
    glow_scale: Waveform,
    glow_opacity: Waveform,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Duration::from_millis(1_200))
    }
}

impl Compositor {
    /// Compositor whose layer fades in over `layer_fade`.
    #[must_use]
    pub fn new(layer_fade: Duration) -> Self {
        Self {
            layer_fade: Fade::new(layer_fade).easing(ease_out),
            backdrop: Waveform::new(BACKDROP_SWAP, BACKDROP_PERIOD),
            glow_scale: Waveform::new(GLOW_SCALE, GLOW_PERIOD),
            glow_opacity: Waveform::new(GLOW_OPACITY, GLOW_PERIOD),
        }
    }

    /// Build the frame for `scene`.
    #[must_use]
    pub fn compose(&self, scene: &Scene<'_>) -> Frame {
        let t = scene.since_ready;
        let palette: BackdropPalette = scene.catalog.backdrop();

        let mut nodes = Vec::with_capacity(scene.catalog.len());
        for element in scene.catalog.elements() {
            let Some(base) = scene.viewport.to_pixels(element.position) else {
                continue;
            };
            let (idle, entrance) = match scene.motions.get(element.id.as_str()) {
                Some(m) => (m.idle.sample(t), m.entrance.sample(t)),
                None => continue,
            };
            let displacement = scene.smoother.rendered(element.id.as_str());

            nodes.push(RenderNode {
                id: element.id.clone(),
                category: element.category,
                payload: element.payload,
                color: element.color,
                size: element.size,
                left: base.x,
                top: base.y,
                translate: displacement + Vec2::new(0.0, idle.offset_y + entrance.offset_y),
                rotation_deg: idle.rotation_deg,
                scale: idle.scale * entrance.scale,
                opacity: (idle.opacity * entrance.opacity).clamp(0.0, 1.0),
                z_index: element.category.z_index(),
                pointer_events: PointerEvents::None,
            });
        }
        // Stable: catalog order is kept within a layer.
        nodes.sort_by_key(|n| n.z_index);

        let glow = scene.glow.map(|position| GlowNode {
            position,
            color: palette.glow,
            scale: self.glow_scale.sample(t),
            opacity: self.glow_opacity.sample(t),
        });

        Frame {
            viewport: scene.viewport,
            layer_opacity: self.layer_fade.progress_at(t),
            pointer_events: PointerEvents::None,
            backdrop: BackdropLayer {
                from: palette.from,
                to: palette.to,
                blend: self.backdrop.sample(t),
            },
            glow,
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{JitterTable, Theme};
    use crate::config::CategoryTable;

    struct Fixture {
        catalog: Catalog,
        motions: MotionTable,
        smoother: SpringSmoother,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = Catalog::build(Theme::Dark, &JitterTable::generate(3, 30));
            let motions = MotionTable::build(&catalog);
            Self {
                catalog,
                motions,
                smoother: SpringSmoother::default(),
            }
        }

        fn scene(&self, since_ready: Duration) -> Scene<'_> {
            Scene {
                catalog: &self.catalog,
                motions: &self.motions,
                smoother: &self.smoother,
                viewport: Viewport::new(1200.0, 800.0),
                since_ready,
                glow: None,
            }
        }
    }

    #[test]
    fn nodes_in_z_order() {
        let fx = Fixture::new();
        let frame = Compositor::default().compose(&fx.scene(Duration::from_secs(3)));
        assert_eq!(frame.nodes.len(), fx.catalog.len());
        assert!(frame.nodes.windows(2).all(|w| w[0].z_index <= w[1].z_index));
        assert_eq!(frame.nodes[0].category, Category::Star);
        assert_eq!(frame.nodes.last().unwrap().category, Category::Terminal);

        let shapes: Vec<&str> = frame
            .nodes
            .iter()
            .filter(|n| n.category == Category::Shape)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(shapes, ["shape-1", "shape-2", "shape-3"]);
    }

    #[test]
    fn every_node_ignores_pointer() {
        let fx = Fixture::new();
        let frame = Compositor::default().compose(&fx.scene(Duration::ZERO));
        assert_eq!(frame.pointer_events, PointerEvents::None);
        assert!(frame.nodes.iter().all(|n| n.pointer_events == PointerEvents::None));
    }

    #[test]
    fn base_positions_in_pixels() {
        let fx = Fixture::new();
        let frame = Compositor::default().compose(&fx.scene(Duration::from_secs(5)));
        let shape = frame.node("shape-1").unwrap();
        assert_eq!((shape.left, shape.top), (720.0, 320.0));
        assert_eq!(shape.opacity, 0.3);
    }

    #[test]
    fn layer_fades_in() {
        let fx = Fixture::new();
        let compositor = Compositor::default();
        assert_eq!(compositor.compose(&fx.scene(Duration::ZERO)).layer_opacity, 0.0);
        let mid = compositor.compose(&fx.scene(Duration::from_millis(600))).layer_opacity;
        assert!(mid > 0.5 && mid < 1.0, "mid={mid}");
        assert_eq!(compositor.compose(&fx.scene(Duration::from_secs(2))).layer_opacity, 1.0);
    }

    #[test]
    fn backdrop_swaps_every_ten_seconds() {
        let fx = Fixture::new();
        let compositor = Compositor::default();
        let at = |s: u64| compositor.compose(&fx.scene(Duration::from_secs(s))).backdrop.blend;
        assert_eq!(at(0), 0.0);
        assert!((at(10) - 1.0).abs() < 1e-9);
        assert!(at(20).abs() < 1e-9);
    }

    #[test]
    fn glow_follows_supplied_position() {
        let fx = Fixture::new();
        let mut scene = fx.scene(Duration::from_millis(500));
        assert!(Compositor::default().compose(&scene).glow.is_none());

        scene.glow = Some(Vec2::new(300.0, 200.0));
        let glow = Compositor::default().compose(&scene).glow.unwrap();
        assert_eq!(glow.position, Vec2::new(300.0, 200.0));
        assert_eq!(glow.color, BackdropPalette::for_theme(Theme::Dark).glow);
        assert!((1.0..=1.1).contains(&glow.scale));
        assert!((0.1..=0.15).contains(&glow.opacity));
    }

    #[test]
    fn displacement_is_applied() {
        let mut fx = Fixture::new();
        let id = ElementId::new("code-1");
        let tuning = CategoryTable::default().code;
        fx.smoother.set_target(&id, Vec2::new(8.0, 0.0), tuning.spring);
        for _ in 0..200 {
            fx.smoother.advance(Duration::from_millis(16));
        }
        let frame = Compositor::default().compose(&fx.scene(Duration::from_secs(4)));
        let node = frame.node("code-1").unwrap();
        assert_eq!(node.translate.x, 8.0);
    }

    #[test]
    fn unmeasured_viewport_has_no_nodes() {
        let fx = Fixture::new();
        let mut scene = fx.scene(Duration::from_secs(1));
        scene.viewport = Viewport::UNMEASURED;
        assert!(Compositor::default().compose(&scene).nodes.is_empty());
    }
}
