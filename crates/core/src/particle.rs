//! Particles driven by a [`VectorField`].
//!
//! Each frame a particle is first reflected back inside the window, then its
//! acceleration is read from the field at its rounded position, and finally
//! it is integrated with forward Euler. Velocity is kept in pixels per frame:
//! the acceleration is scaled by `dt`, the position step is not.

use glam::DVec2;

use crate::error::SimError;
use crate::vector_field::VectorField;

/// Horizontal distance between spawned particles is `width / SPAWN_DIVISOR`.
const SPAWN_DIVISOR: usize = 15;
/// Horizontal offset of the first spawned particle.
const SPAWN_OFFSET: usize = 50;

/// A point mass with position, velocity and acceleration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub acceleration: DVec2,
}

impl Particle {
    /// A particle at rest at `position`.
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Reflects the particle off the walls of `[0, bounds.x] x [0, bounds.y]`.
    ///
    /// A particle past a wall is moved onto it and the matching velocity
    /// component is set to point back inside. A particle lying exactly on a
    /// wall while still moving outward is reflected the same way; one already
    /// moving inward is left alone. Returns whether anything changed.
    ///
    /// This is not a plain negation whenever `x < 0` or `x > W`: a particle
    /// past a wall that already moves inward keeps its velocity instead of
    /// having it negated. Integration never produces that state, since the
    /// velocity is reflected before every position step; it only arises from
    /// hand-placed particles. Both rules agree for every outward-moving
    /// particle, and only this one also reflects at `x == W`.
    pub fn bounce_off_walls(&mut self, bounds: DVec2) -> bool {
        let bounced_x = reflect_axis(&mut self.position.x, &mut self.velocity.x, bounds.x);
        let bounced_y = reflect_axis(&mut self.position.y, &mut self.velocity.y, bounds.y);
        bounced_x || bounced_y
    }

    /// One forward Euler step: `v += a * dt`, then `p += v`.
    pub fn integrate(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity;
    }
}

fn reflect_axis(position: &mut f64, velocity: &mut f64, upper: f64) -> bool {
    let before = (*position, *velocity);
    if *position <= 0.0 {
        *position = 0.0;
        *velocity = velocity.abs();
    } else if *position >= upper {
        *position = upper;
        *velocity = -velocity.abs();
    }
    (*position, *velocity) != before
}

/// Hook invoked for every particle once its acceleration is sampled and
/// before it is integrated.
pub trait ParticleObserver {
    fn observe(&mut self, index: usize, particle: &Particle);
}

impl<F> ParticleObserver for F
where
    F: FnMut(usize, &Particle),
{
    fn observe(&mut self, index: usize, particle: &Particle) {
        self(index, particle);
    }
}

/// Emits one `trace` event per particle per update.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceObserver;

impl ParticleObserver for TraceObserver {
    fn observe(&mut self, index: usize, particle: &Particle) {
        tracing::trace!(
            index,
            position.x = particle.position.x,
            position.y = particle.position.y,
            velocity.x = particle.velocity.x,
            velocity.y = particle.velocity.y,
            acceleration.x = particle.acceleration.x,
            acceleration.y = particle.acceleration.y,
            "particle"
        );
    }
}

/// A fixed set of independent particles bouncing inside `[0, W] x [0, H]`.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    bounds: DVec2,
}

impl ParticleSystem {
    /// Wraps existing particles with reflection bounds `width x height`.
    pub fn new(particles: Vec<Particle>, width: usize, height: usize) -> Self {
        Self {
            particles,
            bounds: DVec2::new(width as f64, height as f64),
        }
    }

    /// Spawns `count` resting particles in a horizontal row at half height.
    ///
    /// Particle `i` starts at `((width / 15) * i + 50, height / 2)`, using
    /// integer division. Returns `SimError::InvalidParam` if `count`
    /// particles cannot be allocated.
    pub fn spawn_row(count: usize, width: usize, height: usize) -> Result<Self, SimError> {
        let spacing = width / SPAWN_DIVISOR;
        let y = (height / 2) as f64;
        let mut particles = Vec::new();
        particles
            .try_reserve_exact(count)
            .map_err(|e| SimError::invalid_param("particle_count", e.to_string()))?;
        particles.extend((0..count).map(|i| {
            let x = spacing.saturating_mul(i).saturating_add(SPAWN_OFFSET);
            Particle::at(DVec2::new(x as f64, y))
        }));
        Ok(Self::new(particles, width, height))
    }

    /// Advances every particle by one frame.
    pub fn update(&mut self, field: &VectorField, dt: f64) {
        self.update_observed(field, dt, &mut |_: usize, _: &Particle| {});
    }

    /// Advances every particle by one frame, reporting each to `observer`.
    pub fn update_observed(
        &mut self,
        field: &VectorField,
        dt: f64,
        observer: &mut dyn ParticleObserver,
    ) {
        let bounds = self.bounds;
        for (index, particle) in self.particles.iter_mut().enumerate() {
            particle.bounce_off_walls(bounds);
            particle.acceleration = field.sample_at(particle.position);
            observer.observe(index, particle);
            particle.integrate(dt);
        }
    }

    /// Read-only access to the particles in index order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles, for seeding custom initial states.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the system holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Reflection bounds `(width, height)`.
    pub fn bounds(&self) -> DVec2 {
        self.bounds
    }
}
