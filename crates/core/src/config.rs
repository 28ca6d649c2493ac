//! Run configuration for a simulation.
//!
//! [`SimConfig::default`] is the classic setup: a 640x480 window,
//! constant gravity, ten particles, a 1/60 s step and a 60 Hz frame cap.
//! Named presets cover the three classic setups, and a JSON params object can
//! override any subset of keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SimError;
use crate::params::{param_bool, param_f64, param_str, param_u32, param_usize};
use crate::vector_field::FieldPolicy;

const DEFAULT_WIDTH: usize = 640;
const DEFAULT_HEIGHT: usize = 480;
const DEFAULT_PARTICLE_COUNT: usize = 10;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_GLYPH_SPACING: usize = 15;

/// All preset names, in listing order.
const PRESET_NAMES: &[&str] = &["gravity", "flow", "bouncing"];

/// Everything needed to build and drive a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub policy: FieldPolicy,
    pub simulate_particles: bool,
    pub particle_count: usize,
    /// Physics step per frame, in seconds.
    pub dt: f64,
    /// Frame rate cap; 0 disables the cap.
    pub target_fps: u32,
    /// Distance in pixels between drawn field glyphs.
    pub glyph_spacing: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            policy: FieldPolicy::gravity(),
            simulate_particles: true,
            particle_count: DEFAULT_PARTICLE_COUNT,
            dt: 1.0 / f64::from(DEFAULT_TARGET_FPS),
            target_fps: DEFAULT_TARGET_FPS,
            glyph_spacing: DEFAULT_GLYPH_SPACING,
        }
    }
}

impl SimConfig {
    /// Builds one of the named presets.
    ///
    /// - `gravity`: constant gravity field, no particles
    /// - `flow`: sinusoidal flow field, no particles
    /// - `bouncing`: constant gravity field with particles
    pub fn from_preset(name: &str) -> Result<Self, SimError> {
        let base = Self::default();
        match name {
            "gravity" => Ok(Self {
                simulate_particles: false,
                ..base
            }),
            "flow" => Ok(Self {
                policy: FieldPolicy::flow(),
                simulate_particles: false,
                ..base
            }),
            "bouncing" => Ok(base),
            _ => Err(SimError::UnknownPreset(name.to_string())),
        }
    }

    /// Returns a slice of all preset names.
    pub fn list_presets() -> &'static [&'static str] {
        PRESET_NAMES
    }

    /// Checks dimensions, step size, glyph spacing and the field policy.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(SimError::InvalidDimensions)?;
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::invalid_param(
                "dt",
                format!("must be finite and positive, got {}", self.dt),
            ));
        }
        if self.glyph_spacing == 0 {
            return Err(SimError::invalid_param("glyph_spacing", "must be non-zero"));
        }
        self.policy.validate()
    }

    /// Overlays a JSON params object onto this configuration.
    ///
    /// Missing or mistyped keys keep their current value. `policy` switches
    /// the field kind by name (resetting its parameters to that kind's
    /// defaults) before `gravity_x`, `gravity_y`, `damping` and `wavelength`
    /// are applied to the matching kind. Only an unknown policy name is an
    /// error; range checks happen in [`SimConfig::validate`].
    pub fn with_overrides(mut self, params: &Value) -> Result<Self, SimError> {
        self.width = param_usize(params, "width", self.width);
        self.height = param_usize(params, "height", self.height);
        self.simulate_particles =
            param_bool(params, "simulate_particles", self.simulate_particles);
        self.particle_count = param_usize(params, "particle_count", self.particle_count);
        self.dt = param_f64(params, "dt", self.dt);
        self.target_fps = param_u32(params, "target_fps", self.target_fps);
        self.glyph_spacing = param_usize(params, "glyph_spacing", self.glyph_spacing);

        if let Some(name) = param_str(params, "policy") {
            if name != self.policy.name() {
                self.policy = FieldPolicy::from_name(name)?;
            }
        }
        self.policy = match self.policy {
            FieldPolicy::Constant { x, y } => FieldPolicy::Constant {
                x: param_f64(params, "gravity_x", x),
                y: param_f64(params, "gravity_y", y),
            },
            FieldPolicy::Sinusoidal {
                damping,
                wavelength,
            } => FieldPolicy::Sinusoidal {
                damping: param_f64(params, "damping", damping),
                wavelength: param_f64(params, "wavelength", wavelength),
            },
        };
        Ok(self)
    }
}
