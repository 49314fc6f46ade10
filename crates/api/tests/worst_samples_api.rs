//! HTTP-level integration tests for `GET /datasets/{id}/worst-samples`.

mod common;

use axum::http::StatusCode;
use common::{assert_error, body_json, build_test_app, get, seed_detection_dataset, RUN};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: ranking blends error count and confidence spread
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_default_ranking(pool: PgPool) {
    let fixture = seed_detection_dataset(&pool).await;
    let app = build_test_app(pool);

    let response = get(
        app,
        &format!(
            "/api/v1/datasets/{}/worst-samples?source={RUN}",
            fixture.dataset_id
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ranked = json["data"].as_array().expect("ranked array");
    assert_eq!(ranked.len(), 2, "both samples carry at least one error");

    // Sample 1 has one error but the full 0.2 confidence spread; sample 2
    // has two errors and no spread. At 0.6/0.4 the spread term wins.
    assert_eq!(ranked[0]["sample_id"], fixture.sample_ids[0]);
    assert_eq!(ranked[0]["error_count"], 1);
    assert!((ranked[0]["confidence_spread"].as_f64().unwrap() - 0.2).abs() < 1e-9);
    assert_eq!(ranked[0]["normalized_spread"], 1.0);

    assert_eq!(ranked[1]["sample_id"], fixture.sample_ids[1]);
    assert_eq!(ranked[1]["error_count"], 2);
    assert_eq!(ranked[1]["normalized_error"], 1.0);

    let first = ranked[0]["score"].as_f64().unwrap();
    let second = ranked[1]["score"].as_f64().unwrap();
    assert!(first >= second, "ranking must be descending by score");
}

// ---------------------------------------------------------------------------
// Test: weight overrides change the order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_error_only_weights(pool: PgPool) {
    let fixture = seed_detection_dataset(&pool).await;
    let app = build_test_app(pool);

    let response = get(
        app,
        &format!(
            "/api/v1/datasets/{}/worst-samples?source={RUN}&error_weight=1.0&spread_weight=0.0",
            fixture.dataset_id
        ),
    )
    .await;
    let json = body_json(response).await;
    let ranked = json["data"].as_array().unwrap();

    // With spread ignored, the two-error sample comes first.
    assert_eq!(ranked[0]["sample_id"], fixture.sample_ids[1]);
    assert_eq!(ranked[1]["sample_id"], fixture.sample_ids[0]);
}

// ---------------------------------------------------------------------------
// Test: limit truncates the list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_limit(pool: PgPool) {
    let fixture = seed_detection_dataset(&pool).await;
    let app = build_test_app(pool);

    let response = get(
        app,
        &format!(
            "/api/v1/datasets/{}/worst-samples?source={RUN}&limit=1",
            fixture.dataset_id
        ),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: weights that do not sum to one are rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_weights_rejected(pool: PgPool) {
    let fixture = seed_detection_dataset(&pool).await;
    let app = build_test_app(pool);

    let response = get(
        app,
        &format!(
            "/api/v1/datasets/{}/worst-samples?source={RUN}&error_weight=0.9&spread_weight=0.9",
            fixture.dataset_id
        ),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST).await;
}
