//! Deepfake Detect Core - Domain logic and inference
//!
//! This crate contains the domain types, the classifier port, the ResNet-50
//! classifier and the transport-independent detection pipeline.

pub mod detector;
pub mod domain;
pub mod inference;
pub mod ports;

pub use detector::{classify, detect, validate_content_type};
pub use domain::{DetectError, ErrorKind, Label, Prediction, NUM_CLASSES};
pub use ports::Classifier;
