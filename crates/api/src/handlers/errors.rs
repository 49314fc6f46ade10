//! Handler for the error categorization endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use verdict_core::categories::{build_error_report, ErrorReport, DEFAULT_EXAMPLE_CAP};
use verdict_core::types::DbId;

use crate::error::AppResult;
use crate::handlers::common::{build_thresholds, load_slice, resolve_dataset, run_matching};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /datasets/{id}/errors`.
#[derive(Debug, Deserialize)]
pub struct ErrorsParams {
    pub source: String,
    pub iou_threshold: Option<f64>,
    pub conf_threshold: Option<f64>,
    pub split: Option<String>,
    /// Cap on retained examples per category (default 50). Counts and
    /// histograms always cover the full slice.
    pub example_cap: Option<usize>,
}

/// GET /api/v1/datasets/{id}/errors
///
/// Re-expresses match outcomes as the presentation taxonomy with capped
/// example lists, per-class breakdowns, and confidence histograms.
pub async fn list_errors(
    State(state): State<AppState>,
    Path(dataset_id): Path<DbId>,
    Query(params): Query<ErrorsParams>,
) -> AppResult<Json<DataResponse<ErrorReport>>> {
    let (_, task) = resolve_dataset(&state.pool, dataset_id).await?;
    let thresholds = build_thresholds(params.iou_threshold, params.conf_threshold)?;

    let samples = load_slice(
        &state.pool,
        dataset_id,
        &params.source,
        params.split.as_deref(),
    )
    .await?;
    let results = run_matching(task, &samples, &thresholds);

    let report = build_error_report(
        task,
        &results,
        params.example_cap.unwrap_or(DEFAULT_EXAMPLE_CAP),
    );
    Ok(Json(DataResponse { data: report }))
}
