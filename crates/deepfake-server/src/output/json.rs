//! JSON output adapter.

use anyhow::Result;
use deepfake_core::{DetectError, Label, Prediction};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One line of `predict` output.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    /// Input file.
    pub path: PathBuf,
    /// Predicted label, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Label>,
    /// Confidence percentage, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Error kind, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Error message, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionRecord {
    /// Record for a classified file.
    #[must_use]
    pub fn success(path: &Path, prediction: &Prediction) -> Self {
        Self {
            path: path.to_path_buf(),
            prediction: Some(prediction.label),
            confidence: Some(prediction.confidence),
            kind: None,
            error: None,
        }
    }

    /// Record for a file that could not be classified.
    #[must_use]
    pub fn failure(path: &Path, error: &DetectError) -> Self {
        Self {
            path: path.to_path_buf(),
            prediction: None,
            confidence: None,
            kind: Some(error.kind().as_str()),
            error: Some(error.to_string()),
        }
    }

    /// Returns true if this record carries an error.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
        }
    }

    /// Writes one record.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write(&self, record: &PredictionRecord) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(record)?
        } else {
            serde_json::to_string(record)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    /// Flushes the underlying writer.
    #[allow(clippy::significant_drop_tightening)]
    pub fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
