//! Handler for the dataset evaluation endpoint: confusion matrix,
//! per-class metrics, and summary scalars.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use verdict_core::matching::TaskType;
use verdict_core::metrics::{
    classification_summary, mean_average_precision, per_class_metrics, ClassMetrics,
    ConfusionMatrix, SummaryScalars,
};
use verdict_core::types::DbId;
use verdict_db::repositories::AnnotationRepo;

use crate::error::AppResult;
use crate::handlers::common::{
    build_thresholds, class_names, load_slice, resolve_dataset, run_matching,
};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /datasets/{id}/evaluation`.
#[derive(Debug, Deserialize)]
pub struct EvaluationParams {
    /// Prediction run name.
    pub source: String,
    pub iou_threshold: Option<f64>,
    pub conf_threshold: Option<f64>,
    pub split: Option<String>,
}

/// Response body for the evaluation endpoint.
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub task_type: TaskType,
    /// False when the dataset has no predictions from the requested source;
    /// the remaining fields are then empty rather than an error, so the
    /// caller can render an empty state.
    pub has_predictions: bool,
    pub labels: Vec<String>,
    /// `confusion_matrix[actual][predicted]` over `labels`.
    pub confusion_matrix: Vec<Vec<u64>>,
    pub per_class_metrics: Vec<ClassMetrics>,
    pub summary: SummaryScalars,
}

/// GET /api/v1/datasets/{id}/sources
///
/// Prediction run names available for the dataset, for populating the
/// `source` parameter of the other endpoints.
pub async fn list_sources(
    State(state): State<AppState>,
    Path(dataset_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    resolve_dataset(&state.pool, dataset_id).await?;
    let sources = AnnotationRepo::list_sources(&state.pool, dataset_id).await?;
    Ok(Json(DataResponse { data: sources }))
}

/// GET /api/v1/datasets/{id}/evaluation
///
/// Runs the task-appropriate matcher over every sample in the slice and
/// folds the outcomes into a confusion matrix, per-class precision/recall/
/// F1, and the summary scalars for the task type.
pub async fn evaluate(
    State(state): State<AppState>,
    Path(dataset_id): Path<DbId>,
    Query(params): Query<EvaluationParams>,
) -> AppResult<Json<DataResponse<EvaluationResponse>>> {
    let (_, task) = resolve_dataset(&state.pool, dataset_id).await?;
    let thresholds = build_thresholds(params.iou_threshold, params.conf_threshold)?;

    if !AnnotationRepo::has_predictions(&state.pool, dataset_id, &params.source).await? {
        return Ok(Json(DataResponse {
            data: EvaluationResponse {
                task_type: task,
                has_predictions: false,
                labels: Vec::new(),
                confusion_matrix: Vec::new(),
                per_class_metrics: Vec::new(),
                summary: SummaryScalars {
                    accuracy: None,
                    macro_f1: None,
                    weighted_f1: None,
                    mean_average_precision: None,
                },
            },
        }));
    }

    let samples = load_slice(
        &state.pool,
        dataset_id,
        &params.source,
        params.split.as_deref(),
    )
    .await?;
    let results = run_matching(task, &samples, &thresholds);

    let mut matrix = ConfusionMatrix::new(task, class_names(&samples));
    for result in &results {
        matrix.fold_sample(result);
    }
    let per_class = per_class_metrics(&matrix);

    let summary = match task {
        TaskType::Classification => classification_summary(&matrix, &per_class),
        TaskType::Detection => SummaryScalars {
            accuracy: None,
            macro_f1: None,
            weighted_f1: None,
            mean_average_precision: Some(mean_average_precision(&samples, thresholds.iou)),
        },
    };

    tracing::debug!(
        dataset_id,
        source = %params.source,
        samples = samples.len(),
        "Evaluation computed"
    );

    Ok(Json(DataResponse {
        data: EvaluationResponse {
            task_type: task,
            has_predictions: true,
            labels: matrix.labels.clone(),
            confusion_matrix: matrix.counts.clone(),
            per_class_metrics: per_class,
            summary,
        },
    }))
}
