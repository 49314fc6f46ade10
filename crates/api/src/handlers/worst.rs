//! Handler for the composite "worst samples" ranking.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use verdict_core::scoring::{
    rank_worst_samples, SampleScore, ScoreWeights, DEFAULT_ERROR_WEIGHT, DEFAULT_SPREAD_WEIGHT,
};
use verdict_core::types::DbId;

use crate::error::AppResult;
use crate::handlers::common::{build_thresholds, load_slice, resolve_dataset, run_matching};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of ranked samples returned.
const DEFAULT_LIMIT: usize = 20;

/// Query parameters for `GET /datasets/{id}/worst-samples`.
#[derive(Debug, Deserialize)]
pub struct WorstSamplesParams {
    pub source: String,
    pub iou_threshold: Option<f64>,
    pub conf_threshold: Option<f64>,
    pub split: Option<String>,
    pub limit: Option<usize>,
    /// Weight on the normalized error count (default 0.6). The weights are
    /// empirical and tunable; they must sum to 1 with `spread_weight`.
    pub error_weight: Option<f64>,
    /// Weight on the normalized confidence spread (default 0.4).
    pub spread_weight: Option<f64>,
}

/// GET /api/v1/datasets/{id}/worst-samples
///
/// Ranks samples with at least one non-true-positive outcome by the
/// weighted combination of error count and confidence spread.
pub async fn worst_samples(
    State(state): State<AppState>,
    Path(dataset_id): Path<DbId>,
    Query(params): Query<WorstSamplesParams>,
) -> AppResult<Json<DataResponse<Vec<SampleScore>>>> {
    let (_, task) = resolve_dataset(&state.pool, dataset_id).await?;
    let thresholds = build_thresholds(params.iou_threshold, params.conf_threshold)?;

    let weights = ScoreWeights {
        error: params.error_weight.unwrap_or(DEFAULT_ERROR_WEIGHT),
        spread: params.spread_weight.unwrap_or(DEFAULT_SPREAD_WEIGHT),
    };
    weights.validate()?;

    let samples = load_slice(
        &state.pool,
        dataset_id,
        &params.source,
        params.split.as_deref(),
    )
    .await?;
    let results = run_matching(task, &samples, &thresholds);

    let ranked = rank_worst_samples(&results, &weights, params.limit.unwrap_or(DEFAULT_LIMIT));
    Ok(Json(DataResponse { data: ranked }))
}
