//! Deepfake Detect Server - HTTP API over the detection pipeline
//!
//! The binary in `main.rs` wires configuration, model loading and the
//! command-line interface around this library.

pub mod api;
pub mod config;
pub mod model;
pub mod state;

pub use api::{router, serve, ApiError, ErrorBody};
pub use config::AppConfig;
pub use model::{load_model, try_load_model, ModelSettings};
pub use state::AppState;
