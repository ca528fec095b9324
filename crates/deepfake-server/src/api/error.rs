//! HTTP error mapping.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use deepfake_core::DetectError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Error returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure inside the detection pipeline.
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// The multipart body had no field with the expected name.
    #[error("no '{0}' field in upload")]
    MissingUpload(&'static str),

    /// The request body could not be read as multipart form data.
    #[error("malformed multipart body: {message}")]
    MalformedMultipart {
        /// Status reported by the multipart parser.
        status: StatusCode,
        /// Parser message.
        message: String,
    },
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Fixed user-facing message.
    pub detail: String,
    /// Machine-readable error kind.
    pub kind: String,
    /// Underlying error text, for diagnosis only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Detect(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Detect(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedMultipart { status, .. } => *status,
        }
    }

    /// Machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Detect(e) => e.kind().as_str(),
            Self::MissingUpload(_) => "missing_upload",
            Self::MalformedMultipart { .. } => "malformed_multipart",
        }
    }

    /// Builds the response body.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        let (detail, diagnostic) = match self {
            Self::Detect(e) => (
                e.public_message().to_string(),
                e.diagnostic().map(str::to_string),
            ),
            Self::MissingUpload(field) => (format!("Missing form field '{field}'"), None),
            Self::MalformedMultipart { message, .. } => {
                ("Malformed multipart body".to_string(), Some(message.clone()))
            }
        };

        ErrorBody {
            detail,
            kind: self.kind().to_string(),
            diagnostic,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::MalformedMultipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::MalformedMultipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), "Request failed: {self}");
        } else if matches!(self, Self::MalformedMultipart { .. }) {
            warn!(kind = self.kind(), "Rejected request: {self}");
        } else {
            debug!(kind = self.kind(), "Rejected request: {self}");
        }

        (status, Json(self.body())).into_response()
    }
}
