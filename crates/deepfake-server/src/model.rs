//! Startup model loading.
//!
//! Runs once per process and yields the shared classifier handle, or `None`
//! when the network cannot be constructed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use deepfake_adapters::{resolve_weights_path, verify_checksum};
use deepfake_core::inference::{load_classifier, select_device, DevicePreference, WeightsStatus};
use deepfake_core::Classifier;
use tracing::{error, info};

/// Resolved model settings after config and CLI layering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSettings {
    /// Explicit weights path; `None` uses the default lookup.
    pub weights: Option<PathBuf>,
    /// Expected SHA-256 of the weights file.
    pub sha256: Option<String>,
    /// Device preference.
    pub device: DevicePreference,
}

/// A loaded classifier together with where its weights came from.
pub struct ModelHandle {
    /// Shared classifier.
    pub classifier: Arc<dyn Classifier>,
    /// Weights provenance.
    pub status: WeightsStatus,
}

/// Selects the device, verifies and loads the weights, and builds the network.
///
/// # Errors
///
/// Returns an error if the weights file exists but fails checksum
/// verification, cannot be parsed, or does not fit the network.
pub fn try_load_model(settings: &ModelSettings) -> Result<ModelHandle> {
    let device = select_device(settings.device);
    let path = resolve_weights_path(settings.weights.as_deref());

    if let Some(ref expected) = settings.sha256 {
        if path.exists() {
            verify_checksum(&path, expected)?;
        }
    }

    let loaded = load_classifier(&path, &device)?;
    Ok(ModelHandle {
        classifier: Arc::new(loaded.classifier),
        status: loaded.status,
    })
}

/// Loads the model, logging the outcome.
///
/// Returns `None` on construction failure so the server can still start and
/// answer every prediction with a model-unavailable error.
#[must_use]
pub fn load_model(settings: &ModelSettings) -> Option<Arc<dyn Classifier>> {
    match try_load_model(settings) {
        Ok(handle) => {
            info!(
                classifier = handle.classifier.name(),
                weights = %handle.status,
                "Model ready"
            );
            Some(handle.classifier)
        }
        Err(e) => {
            error!("Error loading model: {e:#}");
            None
        }
    }
}
