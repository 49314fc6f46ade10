//! Confusion matrices and evaluation metrics.
//!
//! The matrix axes are the sorted union of all class names seen in ground
//! truth or predictions. Detection appends a synthetic background row and
//! column: a false positive has no true row, so it lands in
//! `background -> predicted_class`; a false negative has no predicted
//! column, so it lands in `actual_class -> background`. Classification has
//! no background axis — a missing prediction leaves the matrix untouched.
//!
//! Every zero-denominator case resolves locally to `0.0`. Returning NaN or
//! an error here would leak into JSON responses; the zero policy is
//! deliberate and load-bearing.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::matching::{
    match_detections, GroundTruth, MatchLabel, MatchOutcome, MatchThresholds, Prediction,
    SampleMatchResult, TaskType,
};
use crate::types::DbId;

/// Synthetic class name for the background row/column in detection matrices.
pub const BACKGROUND_CLASS: &str = "(background)";

// ---------------------------------------------------------------------------
// Confusion matrix
// ---------------------------------------------------------------------------

/// A confusion matrix with `labels[i]` as row i (actual) and column i
/// (predicted).
#[derive(Debug, Clone, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    /// `counts[actual][predicted]`.
    pub counts: Vec<Vec<u64>>,
    task: TaskType,
}

impl ConfusionMatrix {
    /// Build an empty matrix over the sorted union of class names present in
    /// ground truth or predictions. Detection appends the background axis.
    pub fn new(task: TaskType, class_names: impl IntoIterator<Item = String>) -> Self {
        let sorted: BTreeSet<String> = class_names.into_iter().collect();
        let mut labels: Vec<String> = sorted.into_iter().collect();
        if task == TaskType::Detection {
            labels.push(BACKGROUND_CLASS.to_string());
        }
        let n = labels.len();
        Self {
            labels,
            counts: vec![vec![0; n]; n],
            task,
        }
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Increment the `(actual, predicted)` cell. Unknown labels are ignored;
    /// the axes are built from the same annotation set the outcomes came
    /// from, so a miss cannot happen in practice.
    pub fn increment(&mut self, actual: &str, predicted: &str) {
        if let (Some(r), Some(c)) = (self.index_of(actual), self.index_of(predicted)) {
            self.counts[r][c] += 1;
        }
    }

    /// Fold one match outcome into the matrix.
    pub fn fold_outcome(&mut self, outcome: &MatchOutcome) {
        match outcome.label {
            MatchLabel::TruePositive | MatchLabel::LabelError => {
                if let (Some(actual), Some(predicted)) =
                    (&outcome.actual_class, &outcome.predicted_class)
                {
                    self.increment(actual, predicted);
                }
            }
            MatchLabel::FalsePositive => {
                if self.task == TaskType::Detection {
                    if let Some(predicted) = &outcome.predicted_class {
                        self.increment(BACKGROUND_CLASS, predicted);
                    }
                }
            }
            MatchLabel::FalseNegative => {
                if self.task == TaskType::Detection {
                    if let Some(actual) = &outcome.actual_class {
                        self.increment(actual, BACKGROUND_CLASS);
                    }
                }
            }
        }
    }

    /// Fold every outcome of a per-sample result into the matrix.
    pub fn fold_sample(&mut self, result: &SampleMatchResult) {
        for outcome in &result.outcomes {
            self.fold_outcome(outcome);
        }
    }

    pub fn get(&self, actual: &str, predicted: &str) -> u64 {
        match (self.index_of(actual), self.index_of(predicted)) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal.
    pub fn trace(&self) -> u64 {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    fn row_sum(&self, i: usize) -> u64 {
        self.counts[i].iter().sum()
    }

    fn col_sum(&self, j: usize) -> u64 {
        self.counts.iter().map(|row| row[j]).sum()
    }

    /// Class labels excluding the synthetic background axis.
    pub fn class_labels(&self) -> impl Iterator<Item = &String> {
        self.labels.iter().filter(|l| l.as_str() != BACKGROUND_CLASS)
    }
}

// ---------------------------------------------------------------------------
// Per-class metrics
// ---------------------------------------------------------------------------

/// Precision/recall/F1 for one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassMetrics {
    pub class_name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of actual instances of the class (matrix row sum).
    pub support: u64,
}

/// Divide, resolving a zero denominator to `0.0` instead of NaN.
fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Harmonic mean of precision and recall, `0.0` when both are zero.
fn f1_score(precision: f64, recall: f64) -> f64 {
    safe_div(2.0 * precision * recall, precision + recall)
}

/// Compute per-class precision, recall, and F1 from the matrix.
///
/// The background axis contributes to row/column sums (false positives and
/// negatives count against precision and recall) but gets no entry of its
/// own.
pub fn per_class_metrics(matrix: &ConfusionMatrix) -> Vec<ClassMetrics> {
    let mut metrics = Vec::new();
    for (i, label) in matrix.labels.iter().enumerate() {
        if label == BACKGROUND_CLASS {
            continue;
        }
        let diagonal = matrix.counts[i][i] as f64;
        let precision = safe_div(diagonal, matrix.col_sum(i) as f64);
        let recall = safe_div(diagonal, matrix.row_sum(i) as f64);
        metrics.push(ClassMetrics {
            class_name: label.clone(),
            precision,
            recall,
            f1: f1_score(precision, recall),
            support: matrix.row_sum(i),
        });
    }
    metrics
}

// ---------------------------------------------------------------------------
// Summary scalars
// ---------------------------------------------------------------------------

/// Scalar summary metrics; which fields are set depends on the task type.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryScalars {
    /// Classification: `trace / total`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Classification: unweighted mean of per-class F1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macro_f1: Option<f64>,
    /// Classification: support-weighted mean of per-class F1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_f1: Option<f64>,
    /// Detection: mean average precision over the confidence sweep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_average_precision: Option<f64>,
}

/// Classification summary: accuracy, macro-F1, and weighted-F1.
pub fn classification_summary(
    matrix: &ConfusionMatrix,
    per_class: &[ClassMetrics],
) -> SummaryScalars {
    let accuracy = safe_div(matrix.trace() as f64, matrix.total() as f64);

    let macro_f1 = safe_div(
        per_class.iter().map(|m| m.f1).sum(),
        per_class.len() as f64,
    );

    let total_support: u64 = per_class.iter().map(|m| m.support).sum();
    let weighted_f1 = safe_div(
        per_class
            .iter()
            .map(|m| m.f1 * m.support as f64)
            .sum::<f64>(),
        total_support as f64,
    );

    SummaryScalars {
        accuracy: Some(accuracy),
        macro_f1: Some(macro_f1),
        weighted_f1: Some(weighted_f1),
        mean_average_precision: None,
    }
}

// ---------------------------------------------------------------------------
// Mean average precision (detection)
// ---------------------------------------------------------------------------

/// All annotations for one sample, grouped for evaluation.
#[derive(Debug, Clone)]
pub struct SampleAnnotations {
    pub sample_id: DbId,
    pub ground_truths: Vec<GroundTruth>,
    pub predictions: Vec<Prediction>,
}

/// Compute mean average precision over a confidence sweep.
///
/// For each class, the distinct confidence values of that class's
/// predictions are the cut points. Matching is re-run at every cut, giving
/// one precision/recall pair per cut; the precision envelope is integrated
/// over recall. AP is averaged over classes that appear in ground truth.
/// Classes seen only in predictions have undefined recall and are excluded.
pub fn mean_average_precision(samples: &[SampleAnnotations], iou_threshold: f64) -> f64 {
    let gt_classes: BTreeSet<&str> = samples
        .iter()
        .flat_map(|s| s.ground_truths.iter().map(|g| g.class_name.as_str()))
        .collect();
    if gt_classes.is_empty() {
        return 0.0;
    }

    let mut ap_sum = 0.0;
    for class in &gt_classes {
        ap_sum += average_precision(samples, class, iou_threshold);
    }
    ap_sum / gt_classes.len() as f64
}

/// Average precision for one class over the confidence sweep.
fn average_precision(samples: &[SampleAnnotations], class: &str, iou_threshold: f64) -> f64 {
    let total_gt: usize = samples
        .iter()
        .map(|s| {
            s.ground_truths
                .iter()
                .filter(|g| g.class_name == class)
                .count()
        })
        .sum();
    if total_gt == 0 {
        return 0.0;
    }

    // Cut points: distinct confidences of this class's predictions,
    // descending, so recall grows monotonically along the sweep.
    let mut cuts: Vec<f64> = samples
        .iter()
        .flat_map(|s| {
            s.predictions
                .iter()
                .filter(|p| p.class_name == class)
                .map(|p| p.confidence)
        })
        .collect();
    cuts.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    cuts.dedup();
    if cuts.is_empty() {
        return 0.0;
    }

    // One precision/recall point per cut.
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(cuts.len());
    for cut in cuts {
        let thresholds = MatchThresholds {
            iou: iou_threshold,
            confidence: cut,
        };
        let mut tp = 0usize;
        let mut fp = 0usize;
        for sample in samples {
            let result = match_detections(
                sample.sample_id,
                &sample.ground_truths,
                &sample.predictions,
                &thresholds,
            );
            for outcome in &result.outcomes {
                if outcome.predicted_class.as_deref() != Some(class) {
                    continue;
                }
                match outcome.label {
                    MatchLabel::TruePositive => tp += 1,
                    // Wrong-class and unmatched predictions both count
                    // against this class's precision.
                    MatchLabel::LabelError | MatchLabel::FalsePositive => fp += 1,
                    MatchLabel::FalseNegative => {}
                }
            }
        }
        let precision = safe_div(tp as f64, (tp + fp) as f64);
        let recall = tp as f64 / total_gt as f64;
        points.push((recall, precision));
    }

    integrate_precision_recall(&mut points)
}

/// Integrate a precision/recall curve: sort by recall, take the running
/// precision envelope from the right, and sum envelope * recall increments.
fn integrate_precision_recall(points: &mut [(f64, f64)]) -> f64 {
    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Precision envelope: each point takes the max precision at >= recall.
    let mut envelope = vec![0.0; points.len()];
    let mut running_max: f64 = 0.0;
    for (i, &(_, p)) in points.iter().enumerate().rev() {
        running_max = running_max.max(p);
        envelope[i] = running_max;
    }

    let mut ap = 0.0;
    let mut prev_recall = 0.0;
    for (i, &(recall, _)) in points.iter().enumerate() {
        ap += (recall - prev_recall) * envelope[i];
        prev_recall = recall;
    }
    ap
}
