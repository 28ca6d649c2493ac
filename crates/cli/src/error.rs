//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error, including conflicting flags (automatic)
//! - 10: configuration rejected by the simulation (dimensions, policy, preset)
//! - 11: sprite load or snapshot write failed
//! - 12: `--params` is not a JSON object
//! - 13: JSON output could not be produced

use flowfield_core::SimError;
use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] SimError),

    #[error("cannot load sprite {}", path.display())]
    Sprite {
        path: PathBuf,
        #[source]
        source: SimError,
    },

    #[error("cannot write snapshot {}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SimError,
    },

    #[error("invalid --params JSON")]
    Params(#[source] serde_json::Error),

    #[error("--params must be a JSON object, got {0}")]
    ParamsNotObject(&'static str),

    #[error("bad log filter directive")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("cannot serialize output")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 10,
            CliError::Sprite { .. } | CliError::Snapshot { .. } => 11,
            CliError::Params(_) | CliError::ParamsNotObject(_) | CliError::LogFilter(_) => 12,
            CliError::Output(_) => 13,
        }
    }

    /// The message followed by every underlying cause, `: `-separated.
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            out.push_str(": ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}
