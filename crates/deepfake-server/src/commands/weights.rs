//! Weights command - inspect model weights.

use anyhow::Result;
use clap::{Args, Subcommand};
use deepfake_adapters::weights::{inspect, weights_dir};
use deepfake_adapters::resolve_weights_path;
use deepfake_server::AppConfig;

/// Arguments for the weights command
#[derive(Args)]
pub struct WeightsArgs {
    #[command(subcommand)]
    pub command: WeightsCommand,
}

/// Weights subcommands
#[derive(Subcommand)]
pub enum WeightsCommand {
    /// Print the weights file that would be loaded
    Path,
    /// Show whether the weights file exists, with its size and SHA-256
    Status,
}

/// Run the weights command.
pub fn run(args: &WeightsArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        WeightsCommand::Path => print_path(config),
        WeightsCommand::Status => print_status(config),
    }
}

#[allow(clippy::unnecessary_wraps)]
fn print_path(config: &AppConfig) -> Result<()> {
    let path = resolve_weights_path(config.model.weights.as_deref());
    println!("{}", path.display());
    Ok(())
}

fn print_status(config: &AppConfig) -> Result<()> {
    let path = resolve_weights_path(config.model.weights.as_deref());
    let info = inspect(&path)?;

    println!("Shared weights directory: {}", weights_dir().display());
    println!();

    match info.fingerprint {
        Some((size, ref digest)) => {
            println!("  ✓ {} ({size} bytes)", info.path.display());
            println!("    sha256 {digest}");
            if let Some(ref expected) = config.model.sha256 {
                let verdict = if digest.eq_ignore_ascii_case(expected) {
                    "matches"
                } else {
                    "does not match"
                };
                println!("    {verdict} configured checksum");
            }
        }
        None => {
            println!("  ✗ {} (missing)", info.path.display());
            println!();
            println!("The server will start with an untrained network.");
        }
    }

    Ok(())
}
