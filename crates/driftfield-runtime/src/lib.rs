#![forbid(unsafe_code)]

//! driftfield Runtime
//!
//! Turns pointer samples and viewport measurements from `driftfield-core`
//! into frames of a decorative, pointer-reactive background.
//!
//! # Key Components
//!
//! - [`FieldEngine`] - Lifecycle, input routing and per-frame evaluation
//! - [`Catalog`] - The decorative elements and their theme colors
//! - [`field`] - Magnetic and parallax displacement
//! - [`SpringSmoother`] - Per-element spring smoothing keyed by id
//! - [`idle`] - Periodic idle motion and entrance animation
//! - [`Compositor`] - Builds [`Frame`]s of plain render data
//! - [`EngineConfig`] - Every tunable, loadable from TOML/JSON
//!
//! # Role in driftfield
//! `driftfield-runtime` is the orchestrator. Host platforms implement
//! [`EventHost`] to feed it events, call [`FieldEngine::frame`] once per
//! display frame and draw the returned [`Frame`].
//!
//! # How it fits in the system
//! `driftfield-core` below it supplies sampling, debouncing and animation
//! math; `driftfield-web` above it provides a host window, clocks and a JSON
//! input bridge.

pub mod catalog;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod field;
pub mod host;
pub mod idle;
pub mod smoother;

pub use catalog::{Catalog, Category, Element, ElementId, Payload, Rgb, ShapeKind, Theme};
pub use compositor::{Compositor, Frame, PointerEvents, RenderNode};
pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineState, FieldEngine};
pub use host::{EventHost, HostClock, Listener, ListenerId};
pub use smoother::{SpringConfig, SpringSmoother};
