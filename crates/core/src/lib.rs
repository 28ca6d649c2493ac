#![deny(unsafe_code)]
//! Core types for the flowfield particle visualizer.
//!
//! Provides the [`VectorField`] grid and its [`FieldPolicy`] generators, the
//! [`ParticleSystem`] integrator, the [`Simulation`] that ties them together,
//! [`SimConfig`] with presets and JSON overrides, the [`RenderContext`]
//! capability a window backend implements, and the [`Visualizer`] frame loop.

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod params;
pub mod particle;
pub mod render;
pub mod simulation;
pub mod vector_field;

pub use color::Srgb;
pub use config::SimConfig;
pub use driver::{RunStats, Theme, Visualizer};
pub use error::SimError;
pub use particle::{Particle, ParticleObserver, ParticleSystem, TraceObserver};
pub use render::{FrameLimiter, Rect, RectStyle, RenderContext};
pub use simulation::Simulation;
pub use vector_field::{FieldPolicy, VectorField};
