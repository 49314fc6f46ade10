//! Shared helpers for HTTP-level integration tests.
//!
//! [`build_test_app`] constructs the same router + middleware stack the
//! production binary uses, so tests exercise CORS, request IDs, timeouts,
//! and panic recovery alongside the handlers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use verdict_api::config::ServerConfig;
use verdict_api::router::build_app_router;
use verdict_api::state::AppState;
use verdict_core::types::DbId;
use verdict_db::models::annotation::{Annotation, CreateAnnotation, SOURCE_GROUND_TRUTH};
use verdict_db::models::dataset::CreateDataset;
use verdict_db::models::sample::CreateSample;
use verdict_db::repositories::{AnnotationRepo, DatasetRepo, SampleRepo};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Send a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .expect("request build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a response is an error with the given status, returning the body.
pub async fn assert_error(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert!(json["error"].is_string(), "error body should carry a message");
    json
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Prediction run name used by every fixture.
pub const RUN: &str = "model-a";

async fn annotate(
    pool: &PgPool,
    dataset_id: DbId,
    sample_id: DbId,
    class_name: &str,
    bbox: (f64, f64, f64, f64),
    confidence: Option<f64>,
    source: &str,
) -> Annotation {
    AnnotationRepo::create(
        pool,
        &CreateAnnotation {
            dataset_id,
            sample_id,
            class_name: class_name.to_string(),
            x: bbox.0,
            y: bbox.1,
            width: bbox.2,
            height: bbox.3,
            confidence,
            source: source.to_string(),
        },
    )
    .await
    .expect("annotation insert")
}

async fn sample(pool: &PgPool, dataset_id: DbId, key: &str, split: Option<&str>) -> DbId {
    SampleRepo::create(
        pool,
        &CreateSample {
            dataset_id,
            external_key: key.to_string(),
            split: split.map(str::to_string),
        },
    )
    .await
    .expect("sample insert")
    .id
}

/// Ids for the seeded detection dataset.
pub struct DetectionFixture {
    pub dataset_id: DbId,
    /// Two samples; the second carries the label error and the miss.
    pub sample_ids: [DbId; 2],
    /// Spurious cat prediction on the first sample.
    pub fp_prediction_id: DbId,
    /// Cat prediction sitting on the dog ground truth of the second sample.
    pub label_error_prediction_id: DbId,
    /// Cat ground truth on the second sample that nothing predicts.
    pub missed_gt_id: DbId,
}

/// Seed a two-sample detection dataset with one outcome of every kind.
///
/// At default thresholds the expected outcomes are:
///
/// - sample 1: cat TP, dog TP, one spurious cat FP
/// - sample 2: cat-over-dog label error, one missed cat (FN)
pub async fn seed_detection_dataset(pool: &PgPool) -> DetectionFixture {
    let dataset_id = DatasetRepo::create(
        pool,
        &CreateDataset {
            name: "det-fixture".to_string(),
            task_type: "detection".to_string(),
        },
    )
    .await
    .expect("dataset insert")
    .id;

    let s1 = sample(pool, dataset_id, "img-001", Some("val")).await;
    let s2 = sample(pool, dataset_id, "img-002", Some("val")).await;

    // Sample 1 ground truth.
    annotate(pool, dataset_id, s1, "cat", (0.0, 0.0, 10.0, 10.0), None, SOURCE_GROUND_TRUTH).await;
    annotate(pool, dataset_id, s1, "dog", (20.0, 20.0, 10.0, 10.0), None, SOURCE_GROUND_TRUTH)
        .await;
    // Sample 1 predictions: exact cat hit, near dog hit (IoU 0.9), spurious cat.
    annotate(pool, dataset_id, s1, "cat", (0.0, 0.0, 10.0, 10.0), Some(0.9), RUN).await;
    annotate(pool, dataset_id, s1, "dog", (20.0, 21.0, 10.0, 9.0), Some(0.8), RUN).await;
    let fp = annotate(pool, dataset_id, s1, "cat", (50.0, 50.0, 10.0, 10.0), Some(0.7), RUN).await;

    // Sample 2 ground truth: a dog the model calls a cat, and a cat it misses.
    annotate(pool, dataset_id, s2, "dog", (0.0, 0.0, 10.0, 10.0), None, SOURCE_GROUND_TRUTH).await;
    let missed =
        annotate(pool, dataset_id, s2, "cat", (30.0, 30.0, 10.0, 10.0), None, SOURCE_GROUND_TRUTH)
            .await;
    let label_error =
        annotate(pool, dataset_id, s2, "cat", (0.0, 0.0, 10.0, 10.0), Some(0.95), RUN).await;

    DetectionFixture {
        dataset_id,
        sample_ids: [s1, s2],
        fp_prediction_id: fp.id,
        label_error_prediction_id: label_error.id,
        missed_gt_id: missed.id,
    }
}

/// Ids for the seeded classification dataset.
pub struct ClassificationFixture {
    pub dataset_id: DbId,
    /// Correct, misclassified, and unpredicted samples, in that order.
    pub sample_ids: [DbId; 3],
    /// The cat prediction on the dog sample.
    pub misclassified_prediction_id: DbId,
}

/// Seed a three-sample classification dataset: one correct prediction, one
/// misclassification, one sample with no prediction at all.
pub async fn seed_classification_dataset(pool: &PgPool) -> ClassificationFixture {
    let dataset_id = DatasetRepo::create(
        pool,
        &CreateDataset {
            name: "cls-fixture".to_string(),
            task_type: "classification".to_string(),
        },
    )
    .await
    .expect("dataset insert")
    .id;

    let s1 = sample(pool, dataset_id, "img-101", None).await;
    let s2 = sample(pool, dataset_id, "img-102", None).await;
    let s3 = sample(pool, dataset_id, "img-103", None).await;

    let zero = (0.0, 0.0, 0.0, 0.0);
    annotate(pool, dataset_id, s1, "cat", zero, None, SOURCE_GROUND_TRUTH).await;
    annotate(pool, dataset_id, s1, "cat", zero, Some(0.9), RUN).await;

    annotate(pool, dataset_id, s2, "dog", zero, None, SOURCE_GROUND_TRUTH).await;
    let mis = annotate(pool, dataset_id, s2, "cat", zero, Some(0.8), RUN).await;

    annotate(pool, dataset_id, s3, "bird", zero, None, SOURCE_GROUND_TRUTH).await;

    ClassificationFixture {
        dataset_id,
        sample_ids: [s1, s2, s3],
        misclassified_prediction_id: mis.id,
    }
}
