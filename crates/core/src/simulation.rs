//! A vector field plus an optional particle system, stepped once per frame.

use serde_json::{json, Value};

use crate::config::SimConfig;
use crate::driver::Theme;
use crate::error::SimError;
use crate::particle::{ParticleObserver, ParticleSystem};
use crate::vector_field::{FieldPolicy, VectorField};

/// The simulated world: a read-only field and, when enabled, the particles
/// moving through it.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    field: VectorField,
    particles: Option<ParticleSystem>,
    steps: u64,
}

impl Simulation {
    /// Validates `config`, fills the field and spawns the particle row.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let field = VectorField::generate(config.width, config.height, &config.policy)?;
        let particles = if config.simulate_particles {
            Some(ParticleSystem::spawn_row(
                config.particle_count,
                config.width,
                config.height,
            )?)
        } else {
            None
        };
        tracing::debug!(
            width = config.width,
            height = config.height,
            policy = config.policy.name(),
            particles = particles.as_ref().map_or(0, ParticleSystem::len),
            "simulation created"
        );
        Ok(Self {
            config,
            field,
            particles,
            steps: 0,
        })
    }

    /// Advances the particles by one frame of `dt` seconds.
    ///
    /// Field-only simulations just count the step.
    pub fn step(&mut self, dt: f64) {
        if let Some(particles) = self.particles.as_mut() {
            particles.update(&self.field, dt);
        }
        self.steps += 1;
    }

    /// Like [`Simulation::step`], reporting every particle to `observer`.
    pub fn step_observed(&mut self, dt: f64, observer: &mut dyn ParticleObserver) {
        if let Some(particles) = self.particles.as_mut() {
            particles.update_observed(&self.field, dt, observer);
        }
        self.steps += 1;
    }

    /// The force field.
    pub fn field(&self) -> &VectorField {
        &self.field
    }

    /// The particles, if this simulation has any.
    pub fn particles(&self) -> Option<&ParticleSystem> {
        self.particles.as_ref()
    }

    /// Mutable access to the particles, if this simulation has any.
    pub fn particles_mut(&mut self) -> Option<&mut ParticleSystem> {
        self.particles.as_mut()
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current parameter values as a flat JSON object, using the same keys
    /// accepted by [`SimConfig::with_overrides`].
    pub fn params(&self) -> Value {
        let c = &self.config;
        let mut params = json!({
            "width": c.width,
            "height": c.height,
            "policy": c.policy.name(),
            "simulate_particles": c.simulate_particles,
            "particle_count": c.particle_count,
            "dt": c.dt,
            "target_fps": c.target_fps,
            "glyph_spacing": c.glyph_spacing,
        });
        let extra = match c.policy {
            FieldPolicy::Constant { x, y } => json!({"gravity_x": x, "gravity_y": y}),
            FieldPolicy::Sinusoidal {
                damping,
                wavelength,
            } => json!({"damping": damping, "wavelength": wavelength}),
        };
        if let (Some(target), Some(source)) = (params.as_object_mut(), extra.as_object()) {
            target.extend(source.clone());
        }
        params
    }

    /// Schema describing every parameter, its type, range and default.
    pub fn param_schema() -> Value {
        let defaults = SimConfig::default();
        let (gravity_x, gravity_y) = match FieldPolicy::gravity() {
            FieldPolicy::Constant { x, y } => (x, y),
            FieldPolicy::Sinusoidal { .. } => (0.0, 0.0),
        };
        let (damping, wavelength) = match FieldPolicy::flow() {
            FieldPolicy::Sinusoidal {
                damping,
                wavelength,
            } => (damping, wavelength),
            FieldPolicy::Constant { .. } => (0.0, 0.0),
        };
        json!({
            "width": {
                "type": "integer", "min": 1, "default": defaults.width,
                "description": "Field and window width in pixels"
            },
            "height": {
                "type": "integer", "min": 1, "default": defaults.height,
                "description": "Field and window height in pixels"
            },
            "policy": {
                "type": "string", "enum": FieldPolicy::list_names(),
                "default": defaults.policy.name(),
                "description": "How the vector field is generated"
            },
            "gravity_x": {
                "type": "number", "default": gravity_x,
                "description": "Constant field x component"
            },
            "gravity_y": {
                "type": "number", "default": gravity_y,
                "description": "Constant field y component"
            },
            "damping": {
                "type": "number", "min": 0.0, "max": 1.0, "default": damping,
                "description": "Sinusoidal blend between x-driven and y-driven terms"
            },
            "wavelength": {
                "type": "number", "min_exclusive": 0.0, "default": wavelength,
                "description": "Sinusoidal spatial wavelength in pixels"
            },
            "simulate_particles": {
                "type": "boolean", "default": defaults.simulate_particles,
                "description": "Whether particles are simulated and drawn"
            },
            "particle_count": {
                "type": "integer", "min": 0, "default": defaults.particle_count,
                "description": "Number of particles spawned in a row"
            },
            "dt": {
                "type": "number", "min_exclusive": 0.0, "default": defaults.dt,
                "description": "Physics step per frame in seconds"
            },
            "target_fps": {
                "type": "integer", "min": 0, "default": defaults.target_fps,
                "description": "Frame rate cap, 0 for uncapped"
            },
            "glyph_spacing": {
                "type": "integer", "min": 1, "default": defaults.glyph_spacing,
                "description": "Pixels between drawn field glyphs"
            },
            "theme": {
                "type": "object", "default": Theme::default(),
                "description": "Drawing colors as hex strings: background, glyph, field_line, particle"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use serde_json::json;

    #[test]
    fn new_with_particles_spawns_configured_count() {
        let sim = Simulation::new(SimConfig::default()).unwrap();
        assert_eq!(sim.particles().map(ParticleSystem::len), Some(10));
        assert_eq!(sim.field().width(), 640);
        assert_eq!(sim.field().height(), 480);
        assert_eq!(sim.steps(), 0);
    }

    #[test]
    fn field_only_preset_has_no_particles() {
        let sim = Simulation::new(SimConfig::from_preset("flow").unwrap()).unwrap();
        assert!(sim.particles().is_none());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SimConfig {
            height: 0,
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::InvalidDimensions)
        ));
    }

    #[test]
    fn oversized_params_are_errors_not_panics() {
        let config = SimConfig::default()
            .with_overrides(&json!({"width": 1_000_000_000u64, "height": 1_000_000_000u64}))
            .unwrap();
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::InvalidDimensions)
        ));

        let config = SimConfig::default()
            .with_overrides(&json!({"particle_count": u64::MAX}))
            .unwrap();
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::InvalidParam { .. })
        ));
    }

    #[test]
    fn step_counts_even_without_particles() {
        let mut sim = Simulation::new(SimConfig::from_preset("gravity").unwrap()).unwrap();
        sim.step(1.0 / 60.0);
        sim.step(1.0 / 60.0);
        assert_eq!(sim.steps(), 2);
    }

    #[test]
    fn step_moves_particles_under_gravity() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let before: Vec<f64> = sim
            .particles()
            .unwrap()
            .particles()
            .iter()
            .map(|p| p.position.y)
            .collect();
        sim.step(1.0 / 60.0);
        let after = sim.particles().unwrap().particles();
        for (y0, p) in before.iter().zip(after) {
            assert!(p.position.y > *y0);
        }
    }

    #[test]
    fn step_observed_reports_each_particle() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let mut count = 0;
        sim.step_observed(1.0 / 60.0, &mut |_: usize, _: &Particle| count += 1);
        assert_eq!(count, 10);
        assert_eq!(sim.steps(), 1);
    }

    #[test]
    fn params_round_trip_through_overrides() {
        let config = SimConfig::default()
            .with_overrides(&json!({"policy": "sinusoidal", "damping": 0.3, "particle_count": 4}))
            .unwrap();
        let sim = Simulation::new(config.clone()).unwrap();
        let rebuilt = SimConfig::default().with_overrides(&sim.params()).unwrap();
        assert_eq!(rebuilt, config);
    }

    #[test]
    fn params_include_policy_specific_keys() {
        let sim = Simulation::new(SimConfig::default()).unwrap();
        let params = sim.params();
        assert_eq!(params["policy"], "constant");
        assert_eq!(params["gravity_y"], 9.8);
        assert!(params.get("damping").is_none());
    }

    #[test]
    fn param_schema_covers_every_param_key() {
        let schema = Simulation::param_schema();
        let sim = Simulation::new(SimConfig::from_preset("flow").unwrap()).unwrap();
        for key in sim.params().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
        assert_eq!(schema["policy"]["enum"], json!(["constant", "sinusoidal"]));
        assert_eq!(schema["damping"]["default"], 0.8);
        assert_eq!(schema["theme"]["default"]["background"], "#ffffff");
    }
}
