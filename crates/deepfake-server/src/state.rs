//! Shared application state injected into request handlers.

use std::sync::Arc;

use deepfake_core::{Classifier, DetectError};

/// State shared by all requests.
///
/// Holds the process-wide classifier, or nothing if loading failed.
#[derive(Clone)]
pub struct AppState {
    classifier: Option<Arc<dyn Classifier>>,
}

impl AppState {
    /// Creates state around an optional classifier handle.
    #[must_use]
    pub fn new(classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self { classifier }
    }

    /// Creates state around a concrete classifier.
    #[must_use]
    pub fn with_classifier(classifier: impl Classifier + 'static) -> Self {
        Self::new(Some(Arc::new(classifier)))
    }

    /// Creates state with no model loaded.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { classifier: None }
    }

    /// Returns true if a classifier is loaded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }

    /// Returns the classifier handle.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::ModelUnavailable`] if no model is loaded.
    pub fn classifier(&self) -> Result<Arc<dyn Classifier>, DetectError> {
        self.classifier
            .as_ref()
            .map(Arc::clone)
            .ok_or(DetectError::ModelUnavailable)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .finish()
    }
}
