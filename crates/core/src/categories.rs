//! Error categorization: re-expresses match outcomes as the presentation
//! taxonomy, with capped example lists, per-class breakdowns, and
//! confidence histograms.
//!
//! Detection: true positive / hard false positive / label error / false
//! negative. Classification: correct / misclassified / missing prediction.
//! Example lists are capped so response size stays bounded regardless of
//! dataset size; counts and histograms always cover everything.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::matching::{MatchLabel, MatchOutcome, SampleMatchResult, TaskType};
use crate::types::DbId;

/// Default cap on retained examples per category.
pub const DEFAULT_EXAMPLE_CAP: usize = 50;

/// Number of equal-width confidence histogram bins over `[0, 1]`.
pub const HISTOGRAM_BINS: usize = 10;

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// Presentation category for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    // Detection taxonomy.
    TruePositive,
    HardFalsePositive,
    LabelError,
    FalseNegative,
    // Classification taxonomy.
    Correct,
    Misclassified,
    MissingPrediction,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::TruePositive => "true_positive",
            ErrorCategory::HardFalsePositive => "hard_false_positive",
            ErrorCategory::LabelError => "label_error",
            ErrorCategory::FalseNegative => "false_negative",
            ErrorCategory::Correct => "correct",
            ErrorCategory::Misclassified => "misclassified",
            ErrorCategory::MissingPrediction => "missing_prediction",
        }
    }

    /// The fixed category order for one task type.
    pub fn for_task(task: TaskType) -> &'static [ErrorCategory] {
        match task {
            TaskType::Detection => &[
                ErrorCategory::TruePositive,
                ErrorCategory::HardFalsePositive,
                ErrorCategory::LabelError,
                ErrorCategory::FalseNegative,
            ],
            TaskType::Classification => &[
                ErrorCategory::Correct,
                ErrorCategory::Misclassified,
                ErrorCategory::MissingPrediction,
            ],
        }
    }

    /// Map a match label into the task's presentation taxonomy.
    pub fn from_label(task: TaskType, label: MatchLabel) -> ErrorCategory {
        match task {
            TaskType::Detection => match label {
                MatchLabel::TruePositive => ErrorCategory::TruePositive,
                MatchLabel::FalsePositive => ErrorCategory::HardFalsePositive,
                MatchLabel::LabelError => ErrorCategory::LabelError,
                MatchLabel::FalseNegative => ErrorCategory::FalseNegative,
            },
            TaskType::Classification => match label {
                MatchLabel::TruePositive => ErrorCategory::Correct,
                // A prediction with no ground truth is still a wrong answer
                // for classification; it joins the misclassified bucket.
                MatchLabel::LabelError | MatchLabel::FalsePositive => {
                    ErrorCategory::Misclassified
                }
                MatchLabel::FalseNegative => ErrorCategory::MissingPrediction,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One retained example: enough detail to render a thumbnail grid entry.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryExample {
    pub sample_id: DbId,
    pub annotation_id: DbId,
    pub predicted_class: Option<String>,
    pub actual_class: Option<String>,
    pub confidence: Option<f64>,
    pub iou: Option<f64>,
}

/// Counts, capped examples, and the confidence histogram for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: ErrorCategory,
    pub count: u64,
    /// Up to `example_cap` examples, in sample order.
    pub examples: Vec<CategoryExample>,
    /// Confidence counts in [`HISTOGRAM_BINS`] equal bins over `[0, 1]`.
    /// Outcomes without a confidence (false negatives) are not binned.
    pub confidence_histogram: Vec<u64>,
}

/// Per-class category counts.
#[derive(Debug, Clone, Serialize)]
pub struct ClassBreakdown {
    pub class_name: String,
    /// Category name -> count.
    pub counts: BTreeMap<&'static str, u64>,
}

/// The full error categorization response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub task_type: TaskType,
    pub categories: Vec<CategoryReport>,
    pub per_class: Vec<ClassBreakdown>,
}

// ---------------------------------------------------------------------------
// Report builder
// ---------------------------------------------------------------------------

/// Histogram bin for a confidence value; `1.0` folds into the last bin.
fn histogram_bin(confidence: f64) -> usize {
    ((confidence * HISTOGRAM_BINS as f64) as usize).min(HISTOGRAM_BINS - 1)
}

/// The class an outcome is attributed to in per-class breakdowns: the
/// ground-truth class when one is involved, the predicted class otherwise.
fn breakdown_class(outcome: &MatchOutcome) -> Option<&str> {
    outcome
        .actual_class
        .as_deref()
        .or(outcome.predicted_class.as_deref())
}

/// Build the error report from per-sample match results.
///
/// `results` must be in the caller's presentation order; example lists
/// preserve it. `example_cap` bounds each category's example list.
pub fn build_error_report(
    task: TaskType,
    results: &[SampleMatchResult],
    example_cap: usize,
) -> ErrorReport {
    let category_order = ErrorCategory::for_task(task);

    let mut reports: BTreeMap<ErrorCategory, CategoryReport> = category_order
        .iter()
        .map(|&c| {
            (
                c,
                CategoryReport {
                    category: c,
                    count: 0,
                    examples: Vec::new(),
                    confidence_histogram: vec![0; HISTOGRAM_BINS],
                },
            )
        })
        .collect();
    let mut per_class: BTreeMap<String, BTreeMap<&'static str, u64>> = BTreeMap::new();

    for result in results {
        for outcome in &result.outcomes {
            let category = ErrorCategory::from_label(task, outcome.label);
            let report = reports
                .get_mut(&category)
                .expect("category order covers every mapped category");

            report.count += 1;
            if report.examples.len() < example_cap {
                report.examples.push(CategoryExample {
                    sample_id: result.sample_id,
                    annotation_id: outcome.annotation_id,
                    predicted_class: outcome.predicted_class.clone(),
                    actual_class: outcome.actual_class.clone(),
                    confidence: outcome.confidence,
                    iou: outcome.iou,
                });
            }
            if let Some(confidence) = outcome.confidence {
                report.confidence_histogram[histogram_bin(confidence)] += 1;
            }

            if let Some(class) = breakdown_class(outcome) {
                *per_class
                    .entry(class.to_string())
                    .or_default()
                    .entry(category.as_str())
                    .or_insert(0) += 1;
            }
        }
    }

    ErrorReport {
        task_type: task,
        categories: category_order
            .iter()
            .map(|c| reports.remove(c).expect("initialized above"))
            .collect(),
        per_class: per_class
            .into_iter()
            .map(|(class_name, counts)| ClassBreakdown { class_name, counts })
            .collect(),
    }
}
