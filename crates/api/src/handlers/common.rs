//! Shared evaluation plumbing used by every read handler.

use sqlx::PgPool;
use verdict_core::error::CoreError;
use verdict_core::matching::{
    match_sample, MatchThresholds, SampleMatchResult, TaskType, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_IOU_THRESHOLD,
};
use verdict_core::metrics::SampleAnnotations;
use verdict_core::types::DbId;
use verdict_db::models::annotation::Annotation;
use verdict_db::models::dataset::Dataset;
use verdict_db::repositories::{AnnotationRepo, DatasetRepo};

use crate::error::AppResult;

/// Build match thresholds from optional query parameters, applying the
/// reference defaults and rejecting out-of-range values.
pub fn build_thresholds(
    iou_threshold: Option<f64>,
    conf_threshold: Option<f64>,
) -> Result<MatchThresholds, CoreError> {
    let thresholds = MatchThresholds {
        iou: iou_threshold.unwrap_or(DEFAULT_IOU_THRESHOLD),
        confidence: conf_threshold.unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
    };
    thresholds.validate()?;
    Ok(thresholds)
}

/// Resolve a dataset and its declared task type, or 404.
pub async fn resolve_dataset(pool: &PgPool, id: DbId) -> AppResult<(Dataset, TaskType)> {
    let dataset = DatasetRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Dataset",
            id,
        })?;
    let task = TaskType::parse(&dataset.task_type)?;
    Ok((dataset, task))
}

/// Group an annotation list (ordered by `sample_id, id`) into per-sample
/// ground truth and prediction views, preserving sample order.
pub fn group_by_sample(annotations: Vec<Annotation>) -> Vec<SampleAnnotations> {
    let mut samples: Vec<SampleAnnotations> = Vec::new();
    for annotation in annotations {
        if samples
            .last()
            .map_or(true, |s| s.sample_id != annotation.sample_id)
        {
            samples.push(SampleAnnotations {
                sample_id: annotation.sample_id,
                ground_truths: Vec::new(),
                predictions: Vec::new(),
            });
        }
        let current = samples
            .last_mut()
            .expect("pushed above when empty or sample changed");
        if annotation.is_ground_truth() {
            current.ground_truths.push(annotation.to_ground_truth());
        } else {
            current.predictions.push(annotation.to_prediction());
        }
    }
    samples
}

/// Load the evaluation slice for a dataset: ground truth plus the named
/// prediction run, grouped per sample.
pub async fn load_slice(
    pool: &PgPool,
    dataset_id: DbId,
    source: &str,
    split: Option<&str>,
) -> AppResult<Vec<SampleAnnotations>> {
    let annotations =
        AnnotationRepo::list_for_evaluation(pool, dataset_id, source, split).await?;
    Ok(group_by_sample(annotations))
}

/// Run the task-appropriate matcher over every sample in the slice.
pub fn run_matching(
    task: TaskType,
    samples: &[SampleAnnotations],
    thresholds: &MatchThresholds,
) -> Vec<SampleMatchResult> {
    samples
        .iter()
        .map(|s| {
            match_sample(
                task,
                s.sample_id,
                &s.ground_truths,
                &s.predictions,
                thresholds,
            )
        })
        .collect()
}

/// Every class name seen in ground truth or predictions across the slice.
pub fn class_names(samples: &[SampleAnnotations]) -> Vec<String> {
    let mut names = Vec::new();
    for sample in samples {
        names.extend(sample.ground_truths.iter().map(|g| g.class_name.clone()));
        names.extend(sample.predictions.iter().map(|p| p.class_name.clone()));
    }
    names
}
