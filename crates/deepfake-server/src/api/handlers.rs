//! Request handlers.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use deepfake_core::{detect, validate_content_type, DetectError, Prediction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "file";

/// Greeting returned by the root endpoint.
pub const GREETING: &str = "Deepfake Detection API";

/// Body of the root endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    /// Fixed service greeting.
    pub message: String,
}

/// `GET /`
pub async fn root() -> Json<Greeting> {
    Json(Greeting {
        message: GREETING.to_string(),
    })
}

/// `POST /predict/`
///
/// Checks that a model is loaded, then locates the `file` field and rejects it
/// before reading its bytes if the declared type is not `image/*`. Decoding
/// and inference run on the blocking pool.
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let classifier = state.classifier()?;
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(name = ?field.name(), "Skipping form field");
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        validate_content_type(field.content_type())?;

        let bytes = field.bytes().await?;
        debug!(filename = ?filename, size = bytes.len(), "Received upload");

        let prediction =
            tokio::task::spawn_blocking(move || detect(classifier.as_ref(), &bytes))
                .await
                .map_err(|e| DetectError::InferenceFailure(e.to_string()))??;

        info!(
            filename = ?filename,
            prediction = %prediction.label,
            confidence = prediction.confidence,
            "Prediction complete"
        );
        return Ok(Json(prediction));
    }

    Err(ApiError::MissingUpload(UPLOAD_FIELD))
}
