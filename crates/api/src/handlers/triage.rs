//! Handlers for per-annotation triage: the merged auto/override view and
//! the set/clear write operations.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use verdict_core::error::CoreError;
use verdict_core::matching::{match_sample, TaskType};
use verdict_core::triage::{merge_overrides, validate_triage_label, TriagedAnnotation};
use verdict_core::types::DbId;
use verdict_db::models::annotation::Annotation;
use verdict_db::models::triage_override::{SetTriageOverride, TriageOverride};
use verdict_db::repositories::{AnnotationRepo, SampleRepo, TriageOverrideRepo};

use crate::error::AppResult;
use crate::handlers::common::{build_thresholds, resolve_dataset};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /samples/{id}/triage`.
#[derive(Debug, Deserialize)]
pub struct TriageParams {
    pub source: String,
    pub iou_threshold: Option<f64>,
    pub conf_threshold: Option<f64>,
}

/// Response body for the per-sample triage view.
#[derive(Debug, Serialize)]
pub struct TriageResponse {
    pub sample_id: DbId,
    pub task_type: TaskType,
    pub annotations: Vec<TriagedAnnotation>,
}

/// GET /api/v1/samples/{id}/triage
///
/// Computes matching fresh for the sample, then layers stored overrides on
/// top: an override always wins over the auto-computed label.
pub async fn get_sample_triage(
    State(state): State<AppState>,
    Path(sample_id): Path<DbId>,
    Query(params): Query<TriageParams>,
) -> AppResult<Json<DataResponse<TriageResponse>>> {
    let sample = SampleRepo::find_by_id(&state.pool, sample_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Sample",
            id: sample_id,
        })?;
    let (_, task) = resolve_dataset(&state.pool, sample.dataset_id).await?;
    let thresholds = build_thresholds(params.iou_threshold, params.conf_threshold)?;

    let annotations =
        AnnotationRepo::list_for_sample(&state.pool, sample_id, &params.source).await?;
    let (ground_truths, predictions): (Vec<&Annotation>, Vec<&Annotation>) =
        annotations.iter().partition(|a| a.is_ground_truth());
    let ground_truths: Vec<_> = ground_truths.iter().map(|a| a.to_ground_truth()).collect();
    let predictions: Vec<_> = predictions.iter().map(|a| a.to_prediction()).collect();

    let result = match_sample(task, sample_id, &ground_truths, &predictions, &thresholds);

    let overrides: HashMap<DbId, String> =
        TriageOverrideRepo::list_for_sample(&state.pool, sample_id)
            .await?
            .into_iter()
            .map(|o| (o.annotation_id, o.label))
            .collect();

    Ok(Json(DataResponse {
        data: TriageResponse {
            sample_id,
            task_type: task,
            annotations: merge_overrides(&result, &overrides),
        },
    }))
}

/// Resolve an annotation or return the referential 404.
async fn resolve_annotation(state: &AppState, id: DbId) -> AppResult<Annotation> {
    Ok(AnnotationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Annotation",
            id,
        })?)
}

/// PUT /api/v1/annotations/{id}/triage
///
/// Sets (or replaces) the override for an annotation. The label must be in
/// the closed triage set; the write replaces any existing override and
/// updates the sample's bridging tag atomically.
pub async fn set_triage(
    State(state): State<AppState>,
    Path(annotation_id): Path<DbId>,
    Json(input): Json<SetTriageOverride>,
) -> AppResult<(StatusCode, Json<DataResponse<TriageOverride>>)> {
    validate_triage_label(&input.label)?;
    let annotation = resolve_annotation(&state, annotation_id).await?;

    let row = TriageOverrideRepo::set(&state.pool, &annotation, &input.label).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// Response body for the clear operation.
#[derive(Debug, Serialize)]
pub struct ClearTriageResponse {
    /// False when there was no override to remove (the call is idempotent).
    pub cleared: bool,
}

/// DELETE /api/v1/annotations/{id}/triage
///
/// Removes the override, if any, and clears the sample's bridging tag when
/// no other overridden annotation remains on the sample.
pub async fn clear_triage(
    State(state): State<AppState>,
    Path(annotation_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClearTriageResponse>>> {
    let annotation = resolve_annotation(&state, annotation_id).await?;
    let cleared = TriageOverrideRepo::clear(&state.pool, &annotation).await?;
    Ok(Json(DataResponse {
        data: ClearTriageResponse { cleared },
    }))
}
