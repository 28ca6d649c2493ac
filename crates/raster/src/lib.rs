#![deny(unsafe_code)]
//! Software rendering backend for flowfield.
//!
//! [`HeadlessContext`] implements [`flowfield_core::RenderContext`] over an
//! in-memory RGBA [`Framebuffer`], so the frame loop can run without a window.
//! With the `png` feature (default on), sprites can be loaded from PNG files
//! and presented frames written out as snapshots.

pub mod framebuffer;
pub mod headless;
pub mod pixel;
pub mod sprite;

#[cfg(feature = "png")]
pub mod snapshot;

pub use framebuffer::Framebuffer;
pub use headless::HeadlessContext;
pub use sprite::Sprite;
