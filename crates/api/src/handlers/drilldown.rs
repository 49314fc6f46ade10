//! Handler for confusion-cell drill-down: recover the samples behind one
//! aggregate matrix cell.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use verdict_core::error::CoreError;
use verdict_core::matching::{MatchLabel, MatchOutcome, TaskType};
use verdict_core::metrics::BACKGROUND_CLASS;
use verdict_core::types::DbId;

use crate::error::AppResult;
use crate::handlers::common::{build_thresholds, load_slice, resolve_dataset, run_matching};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /datasets/{id}/confusion-cell`.
#[derive(Debug, Deserialize)]
pub struct DrilldownParams {
    pub source: String,
    /// Actual (row) class, or the background label for false positives.
    pub row_class: String,
    /// Predicted (column) class, or the background label for false negatives.
    pub col_class: String,
    pub iou_threshold: Option<f64>,
    pub conf_threshold: Option<f64>,
    pub split: Option<String>,
}

/// Whether an outcome falls into the `(row, col)` matrix cell.
///
/// Mirrors `ConfusionMatrix::fold_outcome` exactly: a drill-down must
/// recover precisely the outcomes the matrix counted.
fn outcome_in_cell(outcome: &MatchOutcome, row: &str, col: &str) -> bool {
    match outcome.label {
        MatchLabel::TruePositive | MatchLabel::LabelError => {
            outcome.actual_class.as_deref() == Some(row)
                && outcome.predicted_class.as_deref() == Some(col)
        }
        MatchLabel::FalsePositive => {
            row == BACKGROUND_CLASS && outcome.predicted_class.as_deref() == Some(col)
        }
        MatchLabel::FalseNegative => {
            col == BACKGROUND_CLASS && outcome.actual_class.as_deref() == Some(row)
        }
    }
}

/// GET /api/v1/datasets/{id}/confusion-cell
///
/// Re-runs matching over the slice (never cached — the result must agree
/// with a matrix computed moments earlier at the same thresholds) and
/// returns the sample ids whose outcomes land in the requested cell, in
/// sample order, one entry per contributing outcome.
pub async fn confusion_cell_samples(
    State(state): State<AppState>,
    Path(dataset_id): Path<DbId>,
    Query(params): Query<DrilldownParams>,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    let (_, task) = resolve_dataset(&state.pool, dataset_id).await?;
    let thresholds = build_thresholds(params.iou_threshold, params.conf_threshold)?;

    // The classification matrix has no background axis; a background cell
    // names a cell that does not exist there.
    if task == TaskType::Classification
        && (params.row_class == BACKGROUND_CLASS || params.col_class == BACKGROUND_CLASS)
    {
        return Err(CoreError::Validation(format!(
            "'{BACKGROUND_CLASS}' is not a class of a classification dataset"
        ))
        .into());
    }

    let samples = load_slice(
        &state.pool,
        dataset_id,
        &params.source,
        params.split.as_deref(),
    )
    .await?;
    let results = run_matching(task, &samples, &thresholds);

    let mut sample_ids = Vec::new();
    for result in &results {
        for outcome in &result.outcomes {
            if outcome_in_cell(outcome, &params.row_class, &params.col_class) {
                sample_ids.push(result.sample_id);
            }
        }
    }

    Ok(Json(DataResponse { data: sample_ids }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(
        label: MatchLabel,
        actual: Option<&str>,
        predicted: Option<&str>,
    ) -> MatchOutcome {
        MatchOutcome {
            annotation_id: 1,
            label,
            matched_annotation_id: None,
            iou: None,
            predicted_class: predicted.map(str::to_string),
            actual_class: actual.map(str::to_string),
            confidence: None,
        }
    }

    #[test]
    fn diagonal_cell_matches_true_positive() {
        let o = outcome(MatchLabel::TruePositive, Some("cat"), Some("cat"));
        assert!(outcome_in_cell(&o, "cat", "cat"));
        assert!(!outcome_in_cell(&o, "cat", "dog"));
    }

    #[test]
    fn off_diagonal_cell_matches_label_error() {
        let o = outcome(MatchLabel::LabelError, Some("dog"), Some("cat"));
        assert!(outcome_in_cell(&o, "dog", "cat"));
        assert!(!outcome_in_cell(&o, "cat", "dog"));
    }

    #[test]
    fn background_row_matches_false_positive() {
        let o = outcome(MatchLabel::FalsePositive, None, Some("cat"));
        assert!(outcome_in_cell(&o, BACKGROUND_CLASS, "cat"));
        assert!(!outcome_in_cell(&o, "cat", "cat"));
    }

    #[test]
    fn background_column_matches_false_negative() {
        let o = outcome(MatchLabel::FalseNegative, Some("dog"), None);
        assert!(outcome_in_cell(&o, "dog", BACKGROUND_CLASS));
        assert!(!outcome_in_cell(&o, BACKGROUND_CLASS, "dog"));
    }
}
