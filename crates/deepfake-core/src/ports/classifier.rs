//! Classifier port for running the network behind the detector.

use candle_core::{Device, Tensor};

/// Port for a two-class image classifier.
///
/// Implementations must be safe to share across requests: `logits` takes
/// `&self` and must not mutate model parameters.
pub trait Classifier: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &'static str;

    /// Device that input tensors must be placed on.
    fn device(&self) -> &Device;

    /// Runs a forward pass.
    ///
    /// # Arguments
    ///
    /// * `input` - Normalized image batch of shape `(1, 3, 224, 224)`
    ///
    /// # Returns
    ///
    /// Raw scores of shape `(1, 2)`, indexed like [`crate::Label::index`].
    ///
    /// # Errors
    ///
    /// Returns an error if the forward pass fails.
    fn logits(&self, input: &Tensor) -> anyhow::Result<Tensor>;
}
