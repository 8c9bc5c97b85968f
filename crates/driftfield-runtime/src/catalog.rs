#![forbid(unsafe_code)]

//! Element catalog: the decorative elements and their theme colors.
//!
//! The layout is a fixed table of code snippets, brackets, shapes and
//! terminal commands, plus a field of ambient stars. A [`Catalog`] is a pure
//! function of a [`Theme`] and a [`JitterTable`]:
//!
//! - Positions, sizes and payloads of the fixed elements never change.
//! - Colors come from the theme's palette.
//! - Everything random (star positions, entrance delays, idle periods) is
//!   drawn once into the [`JitterTable`] when the engine mounts, so rebuilding
//!   the catalog for a new theme leaves every element exactly where it was.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use driftfield_core::geometry::PercentPoint;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use self::Category::{Bracket, Code, Shape, Terminal};

/// Page color scheme supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// 24-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Build from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Element category. Drives z-order, field tuning and idle motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Star,
    Shape,
    Code,
    Bracket,
    Terminal,
}

impl Category {
    /// Every category, in ascending stacking order.
    pub const ALL: [Self; 5] = [
        Self::Star,
        Self::Shape,
        Self::Code,
        Self::Bracket,
        Self::Terminal,
    ];

    /// Fixed stacking order; higher draws on top.
    #[must_use]
    pub const fn z_index(self) -> i32 {
        match self {
            Self::Star => 0,
            Self::Shape => 1,
            Self::Code => 2,
            Self::Bracket => 3,
            Self::Terminal => 4,
        }
    }

    /// Lowercase name, used in ids and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Shape => "shape",
            Self::Code => "code",
            Self::Bracket => "bracket",
            Self::Terminal => "terminal",
        }
    }
}

/// Geometric shape drawn by a [`Category::Shape`] element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Triangle,
    Square,
}

/// Category-specific content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Code text.
    Snippet(&'static str),
    /// Bracket pair.
    Symbol(&'static str),
    /// Filled shape.
    Shape(ShapeKind),
    /// Shell command shown after a `$` prompt.
    Command(&'static str),
    /// A small glowing dot.
    Star,
}

/// Stable element identity.
///
/// Keys all per-element animation state, so it must not change across
/// rebuilds of the same layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(Rc<str>);

impl ElementId {
    /// Create an id.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(Rc::from(id))
    }

    /// The id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-element random draws, each uniform in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Jitter {
    /// Spreads entrance delays within the category's window.
    pub entrance: f64,
    /// Spreads idle periods within the category's range.
    pub period: f64,
    /// Spreads idle start delays (stars).
    pub delay: f64,
}

impl Jitter {
    fn draw(rng: &mut SmallRng) -> Self {
        Self {
            entrance: rng.random(),
            period: rng.random(),
            delay: rng.random(),
        }
    }
}

/// Random draws made once per mount and reused by every catalog rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct JitterTable {
    fixed: Vec<Jitter>,
    stars: Vec<(PercentPoint, Jitter)>,
}

impl JitterTable {
    /// Draw jitter for the fixed layout and `star_count` stars from `seed`.
    #[must_use]
    pub fn generate(seed: u64, star_count: usize) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let fixed = BLUEPRINTS.iter().map(|_| Jitter::draw(&mut rng)).collect();
        let stars = (0..star_count)
            .map(|_| {
                let at = PercentPoint::new(rng.random::<f64>() * 100.0, rng.random::<f64>() * 100.0);
                (at, Jitter::draw(&mut rng))
            })
            .collect();
        Self { fixed, stars }
    }

    /// Number of stars drawn.
    #[must_use]
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }
}

/// One decorative element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub category: Category,
    /// Base position in percent of the viewport.
    pub position: PercentPoint,
    /// Font size or shape edge in pixels.
    pub size: f64,
    pub color: Rgb,
    pub payload: Payload,
    pub jitter: Jitter,
}

/// Theme-dependent colors for the layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackdropPalette {
    /// Gradient start color.
    pub from: Rgb,
    /// Gradient end color.
    pub to: Rgb,
    /// Pointer glow color.
    pub glow: Rgb,
}

impl BackdropPalette {
    /// Palette for `theme`.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                from: Rgb::hex(0xf3f4f6),
                to: Rgb::hex(0xe5e7eb),
                glow: Rgb::hex(0x6366f1),
            },
            Theme::Dark => Self {
                from: Rgb::hex(0x0f0f10),
                to: Rgb::hex(0x1a1a1a),
                glow: Rgb::hex(0xa5b4fc),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Layout table
// ---------------------------------------------------------------------------

const BLUE: (Rgb, Rgb) = (Rgb::hex(0x1e40af), Rgb::hex(0x4f46e5));
const PINK: (Rgb, Rgb) = (Rgb::hex(0xbe185d), Rgb::hex(0xec4899));
const INDIGO: (Rgb, Rgb) = (Rgb::hex(0x6366f1), Rgb::hex(0xa5b4fc));
const GREEN: (Rgb, Rgb) = (Rgb::hex(0x10b981), Rgb::hex(0x34d399));
const AMBER: (Rgb, Rgb) = (Rgb::hex(0xf59e0b), Rgb::hex(0xfbbf24));
const RED: (Rgb, Rgb) = (Rgb::hex(0xef4444), Rgb::hex(0xf87171));
const TERMINAL: (Rgb, Rgb) = (Rgb::hex(0x047857), Rgb::hex(0x34d399));
const STAR: (Rgb, Rgb) = (Rgb::hex(0x6366f1), Rgb::hex(0xffffff));

const TERMINAL_FONT_PX: f64 = 14.0;
const STAR_SIZE_PX: f64 = 2.0;

struct Blueprint {
    id: &'static str,
    category: Category,
    x: f64,
    y: f64,
    size: f64,
    payload: Payload,
    /// (light, dark)
    colors: (Rgb, Rgb),
}

const fn bp(
    id: &'static str,
    category: Category,
    x: f64,
    y: f64,
    size: f64,
    payload: Payload,
    colors: (Rgb, Rgb),
) -> Blueprint {
    Blueprint {
        id,
        category,
        x,
        y,
        size,
        payload,
        colors,
    }
}

const BLUEPRINTS: &[Blueprint] = &[
    bp("code-1", Code, 15.0, 30.0, 32.0, Payload::Snippet("function()"), BLUE),
    bp("code-2", Code, 85.0, 70.0, 36.0, Payload::Snippet("const ="), PINK),
    bp("code-3", Code, 45.0, 85.0, 28.0, Payload::Snippet("useEffect"), INDIGO),
    bp("code-4", Code, 75.0, 25.0, 34.0, Payload::Snippet("<div />"), BLUE),
    bp("code-5", Code, 25.0, 65.0, 30.0, Payload::Snippet("import"), PINK),
    bp("code-6", Code, 55.0, 15.0, 32.0, Payload::Snippet("export"), INDIGO),
    bp("bracket-1", Bracket, 10.0, 80.0, 48.0, Payload::Symbol("{ }"), PINK),
    bp("bracket-2", Bracket, 90.0, 20.0, 52.0, Payload::Symbol("[ ]"), BLUE),
    bp("bracket-3", Bracket, 35.0, 45.0, 44.0, Payload::Symbol("( )"), INDIGO),
    bp("shape-1", Shape, 60.0, 40.0, 40.0, Payload::Shape(ShapeKind::Circle), GREEN),
    bp("shape-2", Shape, 5.0, 50.0, 35.0, Payload::Shape(ShapeKind::Triangle), AMBER),
    bp("shape-3", Shape, 95.0, 75.0, 38.0, Payload::Shape(ShapeKind::Square), RED),
    bp("term-1", Terminal, 70.0, 60.0, TERMINAL_FONT_PX, Payload::Command("npm start"), TERMINAL),
    bp("term-2", Terminal, 20.0, 15.0, TERMINAL_FONT_PX, Payload::Command("git push"), TERMINAL),
];

const fn pick(colors: (Rgb, Rgb), theme: Theme) -> Rgb {
    match theme {
        Theme::Light => colors.0,
        Theme::Dark => colors.1,
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The ordered element set for one theme.
#[derive(Debug, Clone)]
pub struct Catalog {
    theme: Theme,
    elements: Vec<Element>,
    index: AHashMap<ElementId, usize>,
}

impl Catalog {
    /// Build the element set for `theme`.
    ///
    /// Order: code, bracket, shape, terminal, then stars.
    #[must_use]
    pub fn build(theme: Theme, jitter: &JitterTable) -> Self {
        let mut elements = Vec::with_capacity(BLUEPRINTS.len() + jitter.stars.len());

        for (i, blueprint) in BLUEPRINTS.iter().enumerate() {
            elements.push(Element {
                id: ElementId::new(blueprint.id),
                category: blueprint.category,
                position: PercentPoint::new(blueprint.x, blueprint.y),
                size: blueprint.size,
                color: pick(blueprint.colors, theme),
                payload: blueprint.payload,
                jitter: jitter.fixed.get(i).copied().unwrap_or_default(),
            });
        }

        for (i, (position, star_jitter)) in jitter.stars.iter().enumerate() {
            elements.push(Element {
                id: ElementId::new(&format!("star-{}", i + 1)),
                category: Category::Star,
                position: *position,
                size: STAR_SIZE_PX,
                color: pick(STAR, theme),
                payload: Payload::Star,
                jitter: *star_jitter,
            });
        }

        let index = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();

        Self {
            theme,
            elements,
            index,
        }
    }

    /// Theme this catalog was built for.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Layer palette for this catalog's theme.
    #[must_use]
    pub const fn backdrop(&self) -> BackdropPalette {
        BackdropPalette::for_theme(self.theme)
    }

    /// Elements in catalog order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    /// Whether `id` is part of this catalog.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &ElementId> + '_ {
        self.elements.iter().map(|e| &e.id)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the catalog has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Count of elements in `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.elements
            .iter()
            .filter(|e| e.category == category)
            .count()
    }
}
