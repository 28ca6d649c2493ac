//! Error types for the flowfield core.

use thiserror::Error;

/// Errors produced while building or configuring a simulation.
///
/// Stepping a simulation never fails; these only surface from construction,
/// validation and the rendering collaborator's setup.
#[derive(Debug, Error)]
pub enum SimError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A prebuilt grid did not match the requested dimensions.
    #[error("dimension mismatch: expected {expected} cells, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A parameter was present but outside its allowed range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A field policy name was not recognized.
    #[error("unknown field policy: {0}")]
    UnknownPolicy(String),

    /// A preset name was not recognized.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Loading or writing an external resource failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl SimError {
    pub(crate) fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
