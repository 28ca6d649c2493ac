//! The per-frame loop: poll input, step the simulation, draw, present, cap.
//!
//! One [`Visualizer`] covers every setup. Whether the field is constant or
//! sinusoidal and whether particles are simulated both come from the
//! [`SimConfig`] the simulation was built with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Srgb;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::particle::ParticleObserver;
use crate::render::{FrameLimiter, Rect, RectStyle, RenderContext};
use crate::simulation::Simulation;

/// Half-length of the crosshair marking each field sample point.
const GLYPH_ARM: i32 = 5;
/// Half-length of the crosshair marking each particle.
const PARTICLE_ARM: i32 = 10;
/// Side of the square sprite drawn over each particle.
const PARTICLE_SPRITE_SIZE: u32 = 30;

/// Colors used when drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Srgb,
    pub glyph: Srgb,
    pub field_line: Srgb,
    pub particle: Srgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Srgb::WHITE,
            glyph: Srgb::GREEN,
            field_line: Srgb::BLUE,
            particle: Srgb::RED,
        }
    }
}

impl Theme {
    /// Reads the optional `theme` object of a params object, e.g.
    /// `{"theme": {"background": "#000000"}}`.
    ///
    /// Colors missing from the object keep their defaults. Returns
    /// `SimError::InvalidParam` if `theme` is not an object of hex colors.
    pub fn from_params(params: &Value) -> Result<Self, SimError> {
        match params.get("theme") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(theme) => Self::deserialize(theme)
                .map_err(|e| SimError::invalid_param("theme", e.to_string())),
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Frames stepped, drawn and presented.
    pub frames: u64,
    /// Context ticks between the first frame start and loop exit.
    pub elapsed_ms: u64,
}

/// Drives a [`Simulation`] against a [`RenderContext`] until it quits.
#[derive(Debug, Clone)]
pub struct Visualizer {
    simulation: Simulation,
    theme: Theme,
    limiter: FrameLimiter,
}

impl Visualizer {
    /// Builds the simulation described by `config`.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        Ok(Self::from_simulation(Simulation::new(config)?))
    }

    /// Wraps an existing simulation.
    pub fn from_simulation(simulation: Simulation) -> Self {
        let limiter = FrameLimiter::new(simulation.config().target_fps);
        Self {
            simulation,
            theme: Theme::default(),
            limiter,
        }
    }

    /// Replaces the drawing colors.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Runs frames until `ctx` reports a quit request.
    pub fn run<C: RenderContext + ?Sized>(&mut self, ctx: &mut C) -> RunStats {
        self.run_inner(ctx, None)
    }

    /// Runs frames until `ctx` quits, reporting every particle update to
    /// `observer`.
    pub fn run_observed<C: RenderContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        observer: &mut dyn ParticleObserver,
    ) -> RunStats {
        self.run_inner(ctx, Some(observer))
    }

    fn run_inner<C: RenderContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        mut observer: Option<&mut dyn ParticleObserver>,
    ) -> RunStats {
        let config = self.simulation.config();
        let span = tracing::debug_span!(
            "run",
            policy = config.policy.name(),
            particles = config.simulate_particles,
        );
        let _guard = span.enter();
        tracing::info!(
            width = config.width,
            height = config.height,
            fps = config.target_fps,
            "starting frame loop"
        );

        let dt = config.dt;
        let started = ctx.current_tick();
        let mut frames = 0;
        loop {
            let frame_start = ctx.current_tick();
            if ctx.poll_quit() {
                break;
            }
            match observer.as_deref_mut() {
                Some(observer) => self.simulation.step_observed(dt, observer),
                None => self.simulation.step(dt),
            }
            self.draw(ctx);
            ctx.present();
            frames += 1;
            self.limiter.wait(ctx, frame_start);
        }

        let stats = RunStats {
            frames,
            elapsed_ms: ctx.current_tick().saturating_sub(started),
        };
        tracing::info!(frames = stats.frames, elapsed_ms = stats.elapsed_ms, "frame loop stopped");
        stats
    }

    /// Draws the current state without stepping it.
    pub fn draw<C: RenderContext + ?Sized>(&self, ctx: &mut C) {
        ctx.clear(self.theme.background);
        self.draw_field(ctx);
        self.draw_particles(ctx);
    }

    fn draw_field<C: RenderContext + ?Sized>(&self, ctx: &mut C) {
        let field = self.simulation.field();
        let spacing = self.simulation.config().glyph_spacing;
        for x in (0..field.width()).step_by(spacing) {
            for y in (0..field.height()).step_by(spacing) {
                let v = field.sample(x as isize, y as isize);
                let (x, y) = (x as i32, y as i32);
                ctx.draw_line(x - GLYPH_ARM, y, x + GLYPH_ARM, y, self.theme.glyph);
                ctx.draw_line(x, y + GLYPH_ARM, x, y - GLYPH_ARM, self.theme.glyph);
                ctx.draw_line(
                    x,
                    y,
                    (f64::from(x) + v.x) as i32,
                    (f64::from(y) + v.y) as i32,
                    self.theme.field_line,
                );
            }
        }
    }

    fn draw_particles<C: RenderContext + ?Sized>(&self, ctx: &mut C) {
        let Some(system) = self.simulation.particles() else {
            return;
        };
        for particle in system.particles() {
            let x = particle.position.x as i32;
            let y = particle.position.y as i32;
            ctx.draw_line(x - PARTICLE_ARM, y, x + PARTICLE_ARM, y, self.theme.particle);
            ctx.draw_line(x, y + PARTICLE_ARM, x, y - PARTICLE_ARM, self.theme.particle);
            ctx.draw_rect(
                Rect::centered(x, y, PARTICLE_SPRITE_SIZE),
                RectStyle::Sprite,
            );
        }
    }
}
