//! Deepfake Detect Adapters - External adapters for deepfake-detect.
//!
//! This crate provides adapters for:
//! - Locating the weights file
//! - Weights checksum verification and inspection

pub mod weights;

pub use weights::{resolve_weights_path, verify_checksum, weights_dir, DEFAULT_WEIGHTS_FILE};
