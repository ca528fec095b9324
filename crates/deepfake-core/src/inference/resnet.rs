//! ResNet-50 real/fake classifier.
//!
//! Standard torchvision ResNet-50 topology with the final fully connected
//! layer replaced by a two-output head. Parameter names follow torchvision,
//! so a `state_dict()` saved from `PyTorch` loads directly.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{Func, VarBuilder, VarMap};
use candle_transformers::models::resnet;
use tracing::{info, warn};

use super::load_weights;
use crate::domain::NUM_CLASSES;
use crate::ports::Classifier;

/// ResNet-50 with a two-class head, held in inference mode.
pub struct ResNetClassifier {
    model: Func<'static>,
    device: Device,
}

impl ResNetClassifier {
    /// Builds the network from a `VarBuilder`.
    ///
    /// # Errors
    ///
    /// Returns an error if a tensor is missing or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder<'static>) -> Result<Self> {
        let device = vb.device().clone();
        let model = resnet::resnet50(NUM_CLASSES, vb).context("Failed to build ResNet-50")?;
        Ok(Self { model, device })
    }

    /// Builds the network with randomly initialized parameters.
    ///
    /// Predictions from an untrained network are well-formed but meaningless.
    ///
    /// # Errors
    ///
    /// Returns an error if parameter allocation fails.
    pub fn untrained(device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        Self::new(vb)
    }
}

impl Classifier for ResNetClassifier {
    fn name(&self) -> &'static str {
        "resnet50"
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn logits(&self, input: &Tensor) -> Result<Tensor> {
        self.model
            .forward(input)
            .context("ResNet-50 forward pass failed")
    }
}

/// Where the classifier's parameters came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightsStatus {
    /// Trained weights were loaded from this file.
    Trained {
        /// Weights file path.
        path: PathBuf,
    },
    /// The weights file was absent; parameters are random.
    Untrained {
        /// Path that was looked up.
        expected: PathBuf,
    },
}

impl WeightsStatus {
    /// Returns true if trained weights were loaded.
    #[must_use]
    pub const fn is_trained(&self) -> bool {
        matches!(self, Self::Trained { .. })
    }
}

impl fmt::Display for WeightsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trained { path } => write!(f, "trained ({})", path.display()),
            Self::Untrained { expected } => {
                write!(f, "untrained ({} not found)", expected.display())
            }
        }
    }
}

/// A ready-to-serve classifier and the provenance of its weights.
pub struct LoadedClassifier {
    /// The network.
    pub classifier: ResNetClassifier,
    /// Weights provenance.
    pub status: WeightsStatus,
}

/// Builds the classifier, loading weights from `weights_path` if present.
///
/// A missing weights file is not an error: the network falls back to random
/// parameters and a warning is logged.
///
/// # Errors
///
/// Returns an error if the weights file exists but cannot be parsed or does
/// not match the ResNet-50 topology.
pub fn load_classifier(weights_path: &Path, device: &Device) -> Result<LoadedClassifier> {
    if !weights_path.exists() {
        warn!(
            "Weights file {} not found. Using untrained model; predictions are meaningless.",
            weights_path.display()
        );
        return Ok(LoadedClassifier {
            classifier: ResNetClassifier::untrained(device)?,
            status: WeightsStatus::Untrained {
                expected: weights_path.to_path_buf(),
            },
        });
    }

    let vb = load_weights(weights_path, device)?;
    let classifier = ResNetClassifier::new(vb)
        .with_context(|| format!("Weights in {} do not fit ResNet-50", weights_path.display()))?;

    info!("Successfully loaded model from {}", weights_path.display());
    Ok(LoadedClassifier {
        classifier,
        status: WeightsStatus::Trained {
            path: weights_path.to_path_buf(),
        },
    })
}
