//! CLI command definitions and handlers.

pub mod predict;
pub mod serve;
pub mod weights;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use deepfake_adapters::weights::is_sha256_hex;
use deepfake_core::inference::DevicePreference;
use deepfake_server::{AppConfig, ModelSettings};

/// Deepfake Detect - classify images as real or fake
#[derive(Parser)]
#[command(name = "deepfake-detect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server arguments used when no subcommand is given.
    #[command(flatten)]
    pub serve: serve::ServeArgs,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve(serve::ServeArgs),
    /// Classify image files without starting a server
    Predict(predict::PredictArgs),
    /// Inspect model weights
    Weights(weights::WeightsArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Everything succeeded.
    Success,
    /// Fatal error before any work was done.
    Error,
    /// Some inputs could not be classified.
    PartialFailure,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::Error => Self::from(1),
            ExitCode::PartialFailure => Self::from(2),
        }
    }
}

/// Parse and validate a SHA-256 hex digest.
fn parse_sha256(s: &str) -> Result<String, String> {
    if is_sha256_hex(s) {
        Ok(s.to_ascii_lowercase())
    } else {
        Err(format!("'{s}' is not a 64-character hex digest"))
    }
}

/// Model selection arguments shared by `serve` and `predict`.
#[derive(Args, Clone, Debug, Default)]
pub struct ModelArgs {
    /// Weights file (.pth, .pt, .bin or .safetensors)
    #[arg(long, value_name = "FILE")]
    pub weights: Option<PathBuf>,

    /// Expected SHA-256 of the weights file
    #[arg(long, value_name = "HEX", value_parser = parse_sha256)]
    pub sha256: Option<String>,

    /// Compute device: auto or cpu
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<DevicePreference>,
}

impl ModelArgs {
    /// Resolve model settings, respecting CLI precedence over config.
    #[must_use]
    pub fn with_config(&self, config: &AppConfig) -> ModelSettings {
        ModelSettings {
            weights: self
                .weights
                .clone()
                .or_else(|| config.model.weights.clone()),
            sha256: self.sha256.clone().or_else(|| config.model.sha256.clone()),
            device: self.device.or_else(|| config.device()).unwrap_or_default(),
        }
    }
}
