//! Predict command - classify local files without a server.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use deepfake_core::{detect, DetectError};
use deepfake_server::{try_load_model, AppConfig};
use tracing::{info, warn};

use super::{ExitCode, ModelArgs};
use crate::output::{JsonOutput, PredictionRecord};

/// Arguments for the predict command
#[derive(Args, Clone, Debug)]
pub struct PredictArgs {
    /// Image files to classify
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Pretty-print each JSON record
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Result of running the predict command.
#[allow(dead_code)] // Counts exposed for programmatic use
#[derive(Debug)]
pub struct PredictResult {
    /// Number of files classified.
    pub classified: usize,
    /// Number of files that failed.
    pub failed: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the predict command.
///
/// Unlike the server, a model that fails to load is fatal here.
pub fn run(args: &PredictArgs, config: &AppConfig) -> Result<PredictResult> {
    info!("Running predict command on {} files", args.files.len());

    let settings = args.model.with_config(config);
    let handle = try_load_model(&settings)?;
    if !handle.status.is_trained() {
        warn!("Predictions come from an untrained network: {}", handle.status);
    }

    let output = JsonOutput::stdout(args.pretty);
    let mut classified = 0;
    let mut failed = 0;

    for path in &args.files {
        let outcome = std::fs::read(path)
            .map_err(|e| DetectError::DecodeFailure(format!("failed to read file: {e}")))
            .and_then(|bytes| detect(handle.classifier.as_ref(), &bytes));

        let record = match outcome {
            Ok(prediction) => PredictionRecord::success(path, &prediction),
            Err(e) => {
                warn!("Failed to classify {}: {e}", path.display());
                PredictionRecord::failure(path, &e)
            }
        };
        if record.is_failure() {
            failed += 1;
        } else {
            classified += 1;
        }
        output.write(&record)?;
    }
    output.flush()?;

    info!(classified, failed, "Predict complete");

    let exit_code = if failed > 0 {
        ExitCode::PartialFailure
    } else {
        ExitCode::Success
    };

    Ok(PredictResult {
        classified,
        failed,
        exit_code,
    })
}
