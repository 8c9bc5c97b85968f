#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! - [`spring`]: damped harmonic oscillator used to smooth pointer-driven
//!   displacement.
//! - [`waveform`]: periodic keyframe curves evaluated on wrapped time, used for
//!   idle motion that must loop forever without drift.
//! - [`Fade`]: one-shot delayed progress curve used for entrance animations.
//! - Easing curves ([`linear`], [`ease_in`], [`ease_out`], [`ease_in_out`])
//!   built on [`CubicBezier`].
//!
//! Everything here is deterministic and free of wall-clock access; callers pass
//! elapsed time explicitly.

pub mod spring;
pub mod waveform;

mod easing;
mod fade;

pub use easing::{CubicBezier, EasingFn, ease_in, ease_in_out, ease_out, linear};
pub use fade::Fade;
pub use spring::Spring;
pub use waveform::{Keyframes, Waveform, wrapped_phase};
