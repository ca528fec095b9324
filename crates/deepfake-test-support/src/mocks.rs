//! Stub implementations of the classifier port.

use std::sync::{Arc, Mutex, PoisonError};

use candle_core::{Device, Tensor};
use deepfake_core::Classifier;

/// Classifier that returns the same logits for every input.
pub struct FixedLogitsClassifier {
    logits: [f32; 2],
    device: Device,
}

impl FixedLogitsClassifier {
    /// Creates a stub returning `[real, fake]` logits.
    #[must_use]
    pub const fn new(logits: [f32; 2]) -> Self {
        Self {
            logits,
            device: Device::Cpu,
        }
    }

    /// Stub that always favours `real`.
    #[must_use]
    pub const fn real() -> Self {
        Self::new([2.0, -1.0])
    }

    /// Stub that always favours `fake`.
    #[must_use]
    pub const fn fake() -> Self {
        Self::new([-0.5, 1.5])
    }
}

impl Classifier for FixedLogitsClassifier {
    fn name(&self) -> &'static str {
        "fixed-logits"
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn logits(&self, _input: &Tensor) -> anyhow::Result<Tensor> {
        Ok(Tensor::new(&[self.logits], &self.device)?)
    }
}

/// Classifier whose forward pass always fails.
pub struct FailingClassifier {
    message: String,
    device: Device,
}

impl FailingClassifier {
    /// Creates a stub failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            device: Device::Cpu,
        }
    }
}

impl Classifier for FailingClassifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn logits(&self, _input: &Tensor) -> anyhow::Result<Tensor> {
        anyhow::bail!("{}", self.message)
    }
}

/// Classifier that records the shape of every input it sees.
///
/// Logits are derived from the input mean, so identical inputs give
/// identical outputs. Clones share the same record.
#[derive(Clone)]
pub struct RecordingClassifier {
    shapes: Arc<Mutex<Vec<Vec<usize>>>>,
    device: Device,
}

impl RecordingClassifier {
    /// Creates a new recording stub.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shapes: Arc::new(Mutex::new(Vec::new())),
            device: Device::Cpu,
        }
    }

    /// Returns all recorded input shapes.
    #[must_use]
    pub fn shapes(&self) -> Vec<Vec<usize>> {
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of forward passes.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for RecordingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RecordingClassifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn logits(&self, input: &Tensor) -> anyhow::Result<Tensor> {
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.dims().to_vec());

        let mean = input.mean_all()?.to_scalar::<f32>()?;
        Ok(Tensor::new(&[[mean, -mean]], &self.device)?)
    }
}
