#![forbid(unsafe_code)]

//! driftfield public facade crate.
//!
//! Re-exports the types most embedders need from the internal crates and
//! offers a small [`Background`] builder plus a prelude.
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let mut runner = Background::new(1280.0, 720.0).theme(Theme::Light).build()?;
//! runner.pointer_move(400.0, 300.0);
//! runner.advance_time(std::time::Duration::from_millis(16));
//! runner.step();
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use driftfield_core::event::{EventKind, HostEvent, PointerEvent};
pub use driftfield_core::geometry::{PercentPoint, Vec2, Viewport};
pub use driftfield_core::pointer_sampler::{PointerSignal, SamplingPolicy};

// --- Runtime re-exports ----------------------------------------------------

pub use driftfield_runtime::{
    Catalog, Category, ConfigError, EngineConfig, EngineState, EventHost, FieldEngine, Frame,
    HostClock, Listener, ListenerId, Payload, PointerEvents, RenderNode, Rgb, ShapeKind, Theme,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "input-parser")]
pub use driftfield_web::input_parser::{InputParseError, parse_host_event};
#[cfg(feature = "web")]
pub use driftfield_web::session_record::ReplayError;
#[cfg(feature = "web")]
pub use driftfield_web::{DeterministicClock, HostWindow, StepResult, StepRunner, SystemClock};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for driftfield embedders.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// A host-encoded event could not be parsed.
    #[cfg(feature = "input-parser")]
    Input(InputParseError),
    /// A recorded session could not be replayed.
    #[cfg(feature = "web")]
    Replay(ReplayError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "input-parser")]
            Self::Input(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Replay(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            #[cfg(feature = "input-parser")]
            Self::Input(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Replay(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "input-parser")]
impl From<InputParseError> for Error {
    fn from(err: InputParseError) -> Self {
        Self::Input(err)
    }
}

#[cfg(feature = "web")]
impl From<ReplayError> for Error {
    fn from(err: ReplayError) -> Self {
        Self::Replay(err)
    }
}

/// Standard result type for driftfield APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Background builder ----------------------------------------------------

/// Builder for a mounted, host-driven background.
#[cfg(feature = "web")]
#[derive(Debug, Clone)]
pub struct Background {
    config: EngineConfig,
    theme: Theme,
    width: f64,
    height: f64,
}

#[cfg(feature = "web")]
impl Background {
    /// Background for a window of the given inner size with default tuning.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            config: EngineConfig::default(),
            theme: Theme::default(),
            width,
            height,
        }
    }

    /// Replace the engine configuration.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Seed for per-mount jitter.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Load configuration from a `.json` or `.toml` file (TOML for any other
    /// extension).
    #[cfg(feature = "config")]
    pub fn load_config(mut self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        self.config = if is_json {
            EngineConfig::from_json_file(path)?
        } else {
            EngineConfig::from_toml_file(path)?
        };
        Ok(self)
    }

    /// Validate the configuration and return a mounted runner at time zero.
    pub fn build(self) -> Result<StepRunner> {
        let config = self.config.validated()?;
        let mut runner = StepRunner::new(config, self.width, self.height).with_theme(self.theme);
        runner.mount();
        Ok(runner)
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        EngineConfig, EngineState, Error, FieldEngine, Frame, HostEvent, RenderNode, Result,
        Theme, Vec2, Viewport,
    };

    #[cfg(feature = "web")]
    pub use crate::{Background, HostWindow, StepRunner};

    pub use crate::{core, runtime};
    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use driftfield_core as core;
pub use driftfield_runtime as runtime;
#[cfg(feature = "web")]
pub use driftfield_web as web;
