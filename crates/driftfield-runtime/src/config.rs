#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every tunable of the field engine lives in one [`EngineConfig`] that can be
//! loaded from TOML or JSON when the `config` feature is enabled:
//!
//! ```toml
//! seed = 1337
//!
//! [field]
//! radius = 240.0
//! repulsion_factor = 0.0
//!
//! [sampler]
//! policy = "throttle"
//! throttle_ms = 16
//!
//! [categories.shape]
//! strength = 0.45
//! falloff_exponent = 1.0
//! parallax_factor = 0.02
//! spring = { stiffness = 60.0, damping = 20.0, mass = 2.0 }
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("driftfield.toml")?;
//! ```
//!
//! Omitted sections and keys keep their defaults. A category table that is
//! present must spell out all four of its keys.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use driftfield_core::pointer_sampler::SamplingPolicy;

use crate::catalog::Category;
use crate::smoother::SpringConfig;

// ---------------------------------------------------------------------------
// Top-level EngineConfig
// ---------------------------------------------------------------------------

/// All engine tunables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct EngineConfig {
    /// Magnetic field shape.
    pub field: FieldConfig,

    /// Pointer sampling.
    pub sampler: SamplerConfig,

    /// Resize debounce.
    pub viewport: ViewportConfig,

    /// Start-up and frame timing.
    pub timing: TimingConfig,

    /// Ambient star field.
    pub stars: StarConfig,

    /// Seed for the per-mount jitter draws.
    pub seed: u64,

    /// Per-category field and spring tuning.
    pub categories: CategoryTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            sampler: SamplerConfig::default(),
            viewport: ViewportConfig::default(),
            timing: TimingConfig::default(),
            stars: StarConfig::default(),
            seed: DEFAULT_SEED,
            categories: CategoryTable::default(),
        }
    }
}

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x5eed_f1e1d;

impl EngineConfig {
    /// Parse from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every value and return a list of violations.
    ///
    /// An empty list means the configuration is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let field = &self.field;
        if !(field.radius.is_finite() && field.radius > 0.0) {
            errors.push(format!("field.radius must be > 0, got {}", field.radius));
        }
        if !(field.inner_radius.is_finite() && field.inner_radius >= 0.0) {
            errors.push(format!(
                "field.inner_radius must be >= 0, got {}",
                field.inner_radius
            ));
        } else if field.inner_radius >= field.radius {
            errors.push(format!(
                "field.inner_radius ({}) must be < field.radius ({})",
                field.inner_radius, field.radius
            ));
        }
        if !field.repulsion_factor.is_finite() {
            errors.push("field.repulsion_factor must be finite".to_string());
        }
        if !(field.max_pull.is_finite() && field.max_pull >= 0.0) {
            errors.push(format!(
                "field.max_pull must be >= 0, got {}",
                field.max_pull
            ));
        }
        if !(field.parallax_range_px.is_finite() && field.parallax_range_px >= 0.0) {
            errors.push(format!(
                "field.parallax_range_px must be >= 0, got {}",
                field.parallax_range_px
            ));
        }

        if self.sampler.policy == SamplerPolicyKind::Throttle && self.sampler.throttle_ms == 0 {
            errors.push("sampler.throttle_ms must be > 0 for the throttle policy".to_string());
        }
        if self.viewport.settle_ms == 0 {
            errors.push("viewport.settle_ms must be > 0".to_string());
        }
        if self.timing.max_frame_dt_ms == 0 {
            errors.push("timing.max_frame_dt_ms must be > 0".to_string());
        }

        for category in Category::ALL {
            let tuning = self.categories.get(category);
            let name = category.name();
            if !(tuning.strength.is_finite() && tuning.strength >= 0.0) {
                errors.push(format!(
                    "categories.{name}.strength must be >= 0, got {}",
                    tuning.strength
                ));
            }
            if !(1.0..=1.5).contains(&tuning.falloff_exponent) {
                errors.push(format!(
                    "categories.{name}.falloff_exponent must be in [1, 1.5], got {}",
                    tuning.falloff_exponent
                ));
            }
            if !(0.0..=0.05).contains(&tuning.parallax_factor) {
                errors.push(format!(
                    "categories.{name}.parallax_factor must be in [0, 0.05], got {}",
                    tuning.parallax_factor
                ));
            }
            validate_spring(&format!("categories.{name}.spring"), &tuning.spring, &mut errors);
        }
        validate_spring("categories.glow", &self.categories.glow, &mut errors);

        errors
    }

    /// Validate and return `self`, or every violation at once.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            tracing::warn!(
                target: "driftfield.config",
                violations = errors.len(),
                "engine configuration rejected"
            );
            Err(ConfigError::Validation(errors))
        }
    }

    /// Sampling policy for the pointer sampler.
    #[must_use]
    pub fn sampling_policy(&self) -> SamplingPolicy {
        match self.sampler.policy {
            SamplerPolicyKind::FrameAligned => SamplingPolicy::FrameAligned,
            SamplerPolicyKind::Throttle => SamplingPolicy::Throttle {
                interval: Duration::from_millis(self.sampler.throttle_ms),
            },
        }
    }
}

fn validate_spring(path: &str, spring: &SpringConfig, errors: &mut Vec<String>) {
    if !(spring.stiffness.is_finite() && spring.stiffness > 0.0) {
        errors.push(format!("{path}.stiffness must be > 0, got {}", spring.stiffness));
    }
    if !(spring.damping.is_finite() && spring.damping >= 0.0) {
        errors.push(format!("{path}.damping must be >= 0, got {}", spring.damping));
    }
    if !(spring.mass.is_finite() && spring.mass > 0.0) {
        errors.push(format!("{path}.mass must be > 0, got {}", spring.mass));
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Shape of the magnetic term.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FieldConfig {
    /// Influence radius in pixels. Nothing beyond it is pulled.
    pub radius: f64,
    /// Inside this distance the pull flips into a push.
    pub inner_radius: f64,
    /// Multiplier applied inside `inner_radius` (negative repels).
    pub repulsion_factor: f64,
    /// Peak pull in pixels before category strength.
    pub max_pull: f64,
    /// Parallax shift in pixels at the viewport edge before the category
    /// factor.
    pub parallax_range_px: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            radius: 200.0,
            inner_radius: 50.0,
            repulsion_factor: -0.5,
            max_pull: 30.0,
            parallax_range_px: 50.0,
        }
    }
}

/// Which [`SamplingPolicy`] to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum SamplerPolicyKind {
    #[default]
    FrameAligned,
    Throttle,
}

/// Pointer sampling section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SamplerConfig {
    pub policy: SamplerPolicyKind,
    /// Throttle window in milliseconds.
    pub throttle_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            policy: SamplerPolicyKind::FrameAligned,
            throttle_ms: 16,
        }
    }
}

/// Resize debounce section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewportConfig {
    /// Quiet period after the last resize before the size is applied.
    pub settle_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { settle_ms: 100 }
    }
}

impl ViewportConfig {
    /// Settle window as a duration.
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Start-up and frame timing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TimingConfig {
    /// Minimum time between mount and the first rendered frame.
    pub ready_delay_ms: u64,
    /// Layer fade-in after ready.
    pub layer_fade_ms: u64,
    /// Longest stretch of time a single frame integrates.
    pub max_frame_dt_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ready_delay_ms: 100,
            layer_fade_ms: 1_200,
            max_frame_dt_ms: 100,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub const fn ready_delay(&self) -> Duration {
        Duration::from_millis(self.ready_delay_ms)
    }

    #[must_use]
    pub const fn layer_fade(&self) -> Duration {
        Duration::from_millis(self.layer_fade_ms)
    }

    #[must_use]
    pub const fn max_frame_dt(&self) -> Duration {
        Duration::from_millis(self.max_frame_dt_ms)
    }
}

/// Ambient star section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct StarConfig {
    pub count: usize,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self { count: 30 }
    }
}

/// How one category responds to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct CategoryTuning {
    /// Scales the magnetic pull. Zero disables the field for the category.
    pub strength: f64,
    /// Falloff exponent `p` in `(1 - r/R)^p`.
    pub falloff_exponent: f64,
    /// Fraction of the pointer's offset from center applied as parallax.
    pub parallax_factor: f64,
    pub spring: SpringConfig,
}

impl CategoryTuning {
    /// Create a tuning entry.
    #[must_use]
    pub const fn new(
        strength: f64,
        falloff_exponent: f64,
        parallax_factor: f64,
        spring: SpringConfig,
    ) -> Self {
        Self {
            strength,
            falloff_exponent,
            parallax_factor,
            spring,
        }
    }
}

/// Tuning for every category plus the pointer glow spring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CategoryTable {
    pub code: CategoryTuning,
    pub bracket: CategoryTuning,
    pub shape: CategoryTuning,
    pub terminal: CategoryTuning,
    pub star: CategoryTuning,
    /// Spring the pointer glow follows the pointer with.
    pub glow: SpringConfig,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            code: CategoryTuning::new(0.4, 1.25, 0.05, SpringConfig::new(170.0, 26.0, 1.0)),
            bracket: CategoryTuning::new(0.5, 1.5, 0.03, SpringConfig::new(120.0, 22.0, 1.2)),
            shape: CategoryTuning::new(0.3, 1.0, 0.02, SpringConfig::new(60.0, 20.0, 2.0)),
            terminal: CategoryTuning::new(0.25, 1.0, 0.01, SpringConfig::new(200.0, 28.0, 1.0)),
            star: CategoryTuning::new(0.0, 1.0, 0.0, SpringConfig::new(170.0, 26.0, 1.0)),
            glow: SpringConfig::new(100.0, 30.0, 0.2),
        }
    }
}

impl CategoryTable {
    /// Tuning for `category`.
    #[must_use]
    pub const fn get(&self, category: Category) -> &CategoryTuning {
        match category {
            Category::Code => &self.code,
            Category::Bracket => &self.bracket,
            Category::Shape => &self.shape,
            Category::Terminal => &self.terminal,
            Category::Star => &self.star,
        }
    }

    /// Mutable tuning for `category`.
    pub fn get_mut(&mut self, category: Category) -> &mut CategoryTuning {
        match category {
            Category::Code => &mut self.code,
            Category::Bracket => &mut self.bracket,
            Category::Shape => &mut self.shape,
            Category::Terminal => &mut self.terminal,
            Category::Star => &mut self.star,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an engine configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
