#![deny(unsafe_code)]
//! CLI binary for the flowfield particle visualizer.
//!
//! Subcommands:
//! - `run` builds a simulation, drives it through the software renderer and
//!   optionally writes the last frame as a PNG
//! - `list` prints available field policies and presets
//! - `schema` prints the parameter schema as JSON

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use flowfield_core::{FieldPolicy, RunStats, SimConfig, Theme, TraceObserver, Visualizer};
use flowfield_raster::{HeadlessContext, Sprite};
use serde_json::Value;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser)]
#[command(name = "flowfield", about = "Particles moving through a 2D vector field")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the frame loop against the software renderer.
    Run(RunArgs),
    /// List field policies and presets.
    List,
    /// Print the parameter schema.
    Schema,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Starting configuration (gravity, flow, bouncing).
    #[arg(short, long, default_value = "bouncing")]
    preset: String,

    /// Field policy, replacing the preset's (constant, sinusoidal).
    #[arg(long)]
    policy: Option<String>,

    /// Simulate and draw particles.
    #[arg(long, conflicts_with = "no_particles")]
    particles: bool,

    /// Draw the field only.
    #[arg(long)]
    no_particles: bool,

    /// Window width in pixels.
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Window height in pixels.
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Number of frames to present before quitting.
    #[arg(short, long, default_value_t = 120)]
    frames: u64,

    /// Frame rate cap; 0 runs uncapped.
    #[arg(long)]
    fps: Option<u32>,

    /// PNG texture drawn over each particle.
    #[arg(long)]
    sprite: Option<PathBuf>,

    /// Write the last presented frame to this PNG file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Simulation parameters as a JSON object, applied last.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Log every particle update at trace level.
    #[arg(long)]
    trace: bool,
}

impl RunArgs {
    /// Preset, then flags, then `--params`. The theme comes from the
    /// `theme` key of `--params`.
    fn settings(&self) -> Result<(SimConfig, Theme), CliError> {
        let mut config = SimConfig::from_preset(&self.preset)?;
        if let Some(name) = &self.policy {
            config.policy = FieldPolicy::from_name(name)?;
        }
        if self.particles {
            config.simulate_particles = true;
        }
        if self.no_particles {
            config.simulate_particles = false;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }

        let params = self.params()?;
        Ok((config.with_overrides(&params)?, Theme::from_params(&params)?))
    }

    fn params(&self) -> Result<Value, CliError> {
        let params: Value = serde_json::from_str(&self.params).map_err(CliError::Params)?;
        let kind = match &params {
            Value::Object(_) => return Ok(params),
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
        };
        Err(CliError::ParamsNotObject(kind))
    }
}

fn init_logging(trace: bool) -> Result<(), CliError> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    if trace {
        filter = filter.add_directive("flowfield_core=trace".parse()?);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}

fn run_visualizer(args: &RunArgs) -> Result<(RunStats, SimConfig), CliError> {
    let (config, theme) = args.settings()?;
    let mut visualizer = Visualizer::new(config.clone())?.with_theme(theme);

    // Everything that can fail is acquired before the first frame.
    let mut ctx = HeadlessContext::new(config.width, config.height)?.with_frame_limit(args.frames);
    if let Some(path) = &args.sprite {
        let sprite = Sprite::load(path).map_err(|source| CliError::Sprite {
            path: path.clone(),
            source,
        })?;
        ctx = ctx.with_sprite(sprite);
    }

    let stats = if args.trace {
        visualizer.run_observed(&mut ctx, &mut TraceObserver)
    } else {
        visualizer.run(&mut ctx)
    };

    if let Some(path) = &args.output {
        flowfield_raster::snapshot::write_png(ctx.presented_frame(), path).map_err(|source| {
            CliError::Snapshot {
                path: path.clone(),
                source,
            }
        })?;
    }
    Ok((stats, config))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let policies = FieldPolicy::list_names();
            let presets = SimConfig::list_presets();
            if cli.json {
                let info = serde_json::json!({
                    "policies": policies,
                    "presets": presets,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Policies:");
                for name in policies {
                    println!("  {name}");
                }
                println!("Presets:");
                println!("  {}", presets.join(", "));
            }
        }
        Command::Schema => {
            let schema = flowfield_core::Simulation::param_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Run(args) => {
            init_logging(args.trace)?;
            let (stats, config) = run_visualizer(&args)?;

            if cli.json {
                let info = serde_json::json!({
                    "preset": args.preset,
                    "config": config,
                    "stats": stats,
                    "output": args.output.as_ref().map(|p| p.display().to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let target = args
                    .output
                    .as_ref()
                    .map(|p| format!(" -> {}", p.display()))
                    .unwrap_or_default();
                eprintln!(
                    "ran {} ({}x{}, {} policy, {} frames in {} ms){target}",
                    args.preset,
                    config.width,
                    config.height,
                    config.policy.name(),
                    stats.frames,
                    stats.elapsed_ms,
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.report(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {}", e.report());
        }
        process::exit(e.exit_code());
    }
}
