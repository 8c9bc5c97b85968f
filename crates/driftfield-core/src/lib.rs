// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: input sampling, viewport tracking, geometry and animation primitives.
//!
//! # Role in driftfield
//! `driftfield-core` is the input layer. It owns the raw-event side of the
//! engine (pointer sampling, debounced viewport measurement) and the math the
//! engine is built from (vectors, springs, waveforms, easing).
//!
//! # Primary responsibilities
//! - **PointerSampler**: reduces pointer moves to a bounded publish rate.
//! - **ViewportTracker**: debounces resize bursts into single updates.
//! - **Geometry**: pixel vectors, percent positions, viewport conversion.
//! - **Animation**: damped springs, looping waveforms, fades, easing.
//!
//! # How it fits in the system
//! The runtime (`driftfield-runtime`) reads [`PointerSignal`] and [`Viewport`]
//! snapshots from this crate once per frame and drives the force field,
//! smoothing and idle motion from them. Nothing here touches a clock or a
//! platform API; the host passes time in explicitly.
//!
//! [`PointerSignal`]: pointer_sampler::PointerSignal
//! [`Viewport`]: geometry::Viewport

pub mod animation;
pub mod event;
pub mod geometry;
pub mod pointer_sampler;
pub mod viewport_tracker;
