//! HTTP API tests.
//!
//! Drives the router in-process with stub classifiers.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use deepfake_server::config::defaults;
use deepfake_server::{router, AppState};
use deepfake_test_support::multipart::single_file;
use deepfake_test_support::{
    FailingClassifier, FixedLogitsClassifier, MultipartBody, RecordingClassifier,
    SyntheticImageBuilder,
};
use serde_json::Value;
use tower::ServiceExt;

fn app(state: AppState) -> Router {
    router(state, defaults::BODY_LIMIT)
}

fn upload(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, MultipartBody::content_type())
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// === Root ===

#[tokio::test]
async fn test_root_returns_greeting() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(app(AppState::unavailable()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "message": "Deepfake Detection API" }));
}

// === Successful Predictions ===

#[tokio::test]
async fn test_index_one_is_fake() {
    let state = AppState::with_classifier(FixedLogitsClassifier::fake());
    let body = single_file(Some("image/png"), &SyntheticImageBuilder::sample_png());
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "fake");
    // softmax([-0.5, 1.5])[1] = 0.8808
    assert_eq!(body["confidence"].as_f64().unwrap(), 88.08);
}

#[tokio::test]
async fn test_index_zero_is_real() {
    let state = AppState::with_classifier(FixedLogitsClassifier::real());
    let jpeg = SyntheticImageBuilder::jpeg(&SyntheticImageBuilder::checkerboard(300, 200, 25));
    let body = single_file(Some("image/jpeg"), &jpeg);
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "real");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((50.0..=100.0).contains(&confidence));
    assert_eq!(body.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let state = AppState::with_classifier(FixedLogitsClassifier::fake());
    let body = single_file(Some("image/png"), &SyntheticImageBuilder::sample_png());
    let (status, body) = send(app(state), upload("/predict", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "fake");
}

#[tokio::test]
async fn test_same_image_same_answer() {
    let recorder = RecordingClassifier::new();
    let state = AppState::with_classifier(recorder.clone());
    let png = SyntheticImageBuilder::png(&SyntheticImageBuilder::gradient(120, 90));

    let (_, first) = send(
        app(state.clone()),
        upload("/predict/", single_file(Some("image/png"), &png)),
    )
    .await;
    let (_, second) = send(
        app(state),
        upload("/predict/", single_file(Some("image/png"), &png)),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(recorder.shapes(), vec![vec![1, 3, 224, 224]; 2]);
}

#[tokio::test]
async fn test_other_fields_are_ignored() {
    let state = AppState::with_classifier(FixedLogitsClassifier::real());
    let body = MultipartBody::new()
        .text("note", "hello")
        .file(
            "file",
            "face.png",
            Some("image/png"),
            &SyntheticImageBuilder::sample_png(),
        )
        .finish();
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "real");
}

// === Content Type Validation ===

#[tokio::test]
async fn test_text_plain_rejected_before_inference() {
    let recorder = RecordingClassifier::new();
    let state = AppState::with_classifier(recorder.clone());
    let body = single_file(Some("text/plain"), b"hello");
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "File is not an image");
    assert_eq!(body["kind"], "invalid_content_type");
    assert_eq!(recorder.call_count(), 0);
}

#[tokio::test]
async fn test_missing_part_content_type_rejected() {
    let state = AppState::with_classifier(FixedLogitsClassifier::real());
    let body = single_file(None, &SyntheticImageBuilder::sample_png());
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_content_type");
}

// === Processing Failures ===

#[tokio::test]
async fn test_corrupt_image_is_server_error() {
    let state = AppState::with_classifier(FixedLogitsClassifier::real());
    let body = single_file(Some("image/png"), &SyntheticImageBuilder::corrupt_png());
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "decode_failure");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Error processing image"));
}

#[tokio::test]
async fn test_inference_failure_is_server_error() {
    let state = AppState::with_classifier(FailingClassifier::new("out of memory"));
    let body = single_file(Some("image/png"), &SyntheticImageBuilder::sample_png());
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "inference_failure");
    assert!(body["diagnostic"]
        .as_str()
        .unwrap()
        .contains("out of memory"));
}

#[tokio::test]
async fn test_unloaded_model_fails_every_request() {
    let body = single_file(Some("image/png"), &SyntheticImageBuilder::sample_png());
    let (status, body) = send(app(AppState::unavailable()), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Model not loaded");
    assert_eq!(body["kind"], "model_unavailable");
}

#[tokio::test]
async fn test_unloaded_model_checked_before_content_type() {
    let body = single_file(Some("text/plain"), b"hello");
    let (status, body) = send(app(AppState::unavailable()), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "model_unavailable");
}

// === Request Shape ===

#[tokio::test]
async fn test_missing_file_field() {
    let state = AppState::with_classifier(FixedLogitsClassifier::real());
    let body = MultipartBody::new().text("image", "nope").finish();
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "missing_upload");
}

#[tokio::test]
async fn test_non_multipart_body_rejected() {
    let state = AppState::with_classifier(FixedLogitsClassifier::real());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(app(state), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "malformed_multipart");
}

#[tokio::test]
async fn test_body_over_limit_rejected() {
    let state = AppState::with_classifier(FixedLogitsClassifier::real());
    let body = single_file(Some("image/png"), &vec![0u8; 8 * 1024]);
    let (status, body) = send(router(state, 1024), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["kind"], "malformed_multipart");
}

// === CORS ===

#[tokio::test]
async fn test_cors_preflight_mirrors_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict/")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
        .body(Body::empty())
        .unwrap();
    let response = app(AppState::unavailable()).oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
}

// === Untrained Network ===

#[tokio::test]
async fn test_missing_weights_still_answers() {
    use deepfake_core::inference::DevicePreference;
    use deepfake_server::{try_load_model, ModelSettings};

    let settings = ModelSettings {
        weights: Some("/nonexistent/best_model.pth".into()),
        sha256: None,
        device: DevicePreference::Cpu,
    };
    let handle = try_load_model(&settings).unwrap();
    assert!(!handle.status.is_trained());

    let state = AppState::new(Some(handle.classifier));
    let body = single_file(Some("image/png"), &SyntheticImageBuilder::sample_png());
    let (status, body) = send(app(state), upload("/predict/", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["prediction"] == "real" || body["prediction"] == "fake");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((50.0..=100.0).contains(&confidence));
}
