//! Core domain types for deepfake detection.

mod error;
mod prediction;

pub use error::{DetectError, ErrorKind};
pub use prediction::{Label, Prediction, NUM_CLASSES};
