//! Failure kinds of the detection pipeline.

use thiserror::Error;

/// An error raised while classifying an uploaded image.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DetectError {
    /// No classifier is loaded; every request fails until restart.
    #[error("model not loaded")]
    ModelUnavailable,

    /// The declared content type is not `image/*`.
    #[error("file is not an image (declared content type: {declared})")]
    InvalidContentType {
        /// Content type declared by the client, or `<none>`.
        declared: String,
    },

    /// The upload could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    DecodeFailure(String),

    /// Tensor conversion or the forward pass failed.
    #[error("inference failed: {0}")]
    InferenceFailure(String),
}

/// Stable identifier for each [`DetectError`] variant.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`DetectError::ModelUnavailable`].
    ModelUnavailable,
    /// See [`DetectError::InvalidContentType`].
    InvalidContentType,
    /// See [`DetectError::DecodeFailure`].
    DecodeFailure,
    /// See [`DetectError::InferenceFailure`].
    InferenceFailure,
}

impl ErrorKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModelUnavailable => "model_unavailable",
            Self::InvalidContentType => "invalid_content_type",
            Self::DecodeFailure => "decode_failure",
            Self::InferenceFailure => "inference_failure",
        }
    }
}

impl DetectError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ModelUnavailable => ErrorKind::ModelUnavailable,
            Self::InvalidContentType { .. } => ErrorKind::InvalidContentType,
            Self::DecodeFailure(_) => ErrorKind::DecodeFailure,
            Self::InferenceFailure(_) => ErrorKind::InferenceFailure,
        }
    }

    /// Fixed message suitable for showing to API clients.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::ModelUnavailable => "Model not loaded",
            Self::InvalidContentType { .. } => "File is not an image",
            Self::DecodeFailure(_) => "Error processing image: could not decode image data",
            Self::InferenceFailure(_) => "Error processing image: inference failed",
        }
    }

    /// Underlying error text, when the failure wraps one.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::ModelUnavailable => None,
            Self::InvalidContentType { declared } => Some(declared),
            Self::DecodeFailure(msg) | Self::InferenceFailure(msg) => Some(msg),
        }
    }

    /// Returns true if the caller sent bad input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidContentType { .. })
    }
}
