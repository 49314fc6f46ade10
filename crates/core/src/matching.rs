//! Prediction/ground-truth matching for one sample.
//!
//! Two matchers share one output contract: the greedy spatial matcher for
//! detection datasets and the label-equality matcher for classification
//! datasets. Aggregation, drill-down, and triage are written once against
//! [`SampleMatchResult`] and never branch on the mode again.
//!
//! Determinism is a hard requirement: triage overrides are merged on top of
//! these results, so identical inputs must produce identical outputs. The
//! greedy pass sorts predictions by confidence descending with ties broken
//! by original input order (stable sort), and ties in IoU resolve to the
//! first ground-truth box in input order.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::{iou_matrix, BoundingBox};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Threshold constants
// ---------------------------------------------------------------------------

/// Default IoU threshold for spatial matching.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;
/// Default confidence threshold below which predictions are dropped.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.25;

/// Matching thresholds, always supplied per request and never persisted.
#[derive(Debug, Clone, Copy)]
pub struct MatchThresholds {
    pub iou: f64,
    pub confidence: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            iou: DEFAULT_IOU_THRESHOLD,
            confidence: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl MatchThresholds {
    /// Validate that both thresholds lie in `[0.0, 1.0]`.
    ///
    /// Out-of-range values are rejected, never silently clamped.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.iou) {
            return Err(CoreError::Validation(format!(
                "IoU threshold must be between 0.0 and 1.0, got {}",
                self.iou
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(CoreError::Validation(format!(
                "Confidence threshold must be between 0.0 and 1.0, got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Task type
// ---------------------------------------------------------------------------

pub const TASK_TYPE_DETECTION: &str = "detection";
pub const TASK_TYPE_CLASSIFICATION: &str = "classification";

/// The declared task type of a dataset, selecting which matcher runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Detection,
    Classification,
}

impl TaskType {
    /// Parse a dataset's stored `task_type` string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            TASK_TYPE_DETECTION => Ok(TaskType::Detection),
            TASK_TYPE_CLASSIFICATION => Ok(TaskType::Classification),
            other => Err(CoreError::Validation(format!(
                "Invalid task type '{other}'. Must be one of: {TASK_TYPE_DETECTION}, {TASK_TYPE_CLASSIFICATION}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Detection => TASK_TYPE_DETECTION,
            TaskType::Classification => TASK_TYPE_CLASSIFICATION,
        }
    }
}

// ---------------------------------------------------------------------------
// Matcher inputs
// ---------------------------------------------------------------------------

/// A ground-truth annotation as seen by the matcher.
#[derive(Debug, Clone)]
pub struct GroundTruth {
    pub annotation_id: DbId,
    pub class_name: String,
    pub bbox: BoundingBox,
}

/// A prediction annotation as seen by the matcher.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub annotation_id: DbId,
    pub class_name: String,
    pub bbox: BoundingBox,
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Matcher outputs
// ---------------------------------------------------------------------------

/// Outcome label for one annotation after matching.
///
/// `LabelError` is a spatial match with the wrong class (detection) or a
/// misclassification (classification). `FalseNegative` attaches to the
/// unmatched ground-truth annotation; the other three attach to predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLabel {
    TruePositive,
    FalsePositive,
    LabelError,
    FalseNegative,
}

impl MatchLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::TruePositive => "true_positive",
            MatchLabel::FalsePositive => "false_positive",
            MatchLabel::LabelError => "label_error",
            MatchLabel::FalseNegative => "false_negative",
        }
    }
}

/// The computed outcome for one annotation. Ephemeral — recomputed from
/// current annotation state on every query, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    /// The annotation this outcome belongs to (prediction, or ground truth
    /// for false negatives).
    pub annotation_id: DbId,
    pub label: MatchLabel,
    /// The matched counterpart's annotation id, when a spatial or label
    /// match consumed a ground-truth box.
    pub matched_annotation_id: Option<DbId>,
    /// Overlap score of the match. Spatial mode only.
    pub iou: Option<f64>,
    /// Class predicted by the model, absent for false negatives.
    pub predicted_class: Option<String>,
    /// Ground-truth class involved in this outcome, absent for hard false
    /// positives.
    pub actual_class: Option<String>,
    /// Prediction confidence, absent for false negatives.
    pub confidence: Option<f64>,
}

/// All outcomes for one sample, ordered by annotation id.
#[derive(Debug, Clone, Serialize)]
pub struct SampleMatchResult {
    pub sample_id: DbId,
    pub outcomes: Vec<MatchOutcome>,
}

impl SampleMatchResult {
    /// Look up the outcome for a specific annotation.
    pub fn outcome_for(&self, annotation_id: DbId) -> Option<&MatchOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.annotation_id == annotation_id)
    }

    /// Count outcomes with the given label.
    pub fn count(&self, label: MatchLabel) -> usize {
        self.outcomes.iter().filter(|o| o.label == label).count()
    }
}

// ---------------------------------------------------------------------------
// Detection matching (greedy bipartite)
// ---------------------------------------------------------------------------

/// Match predictions against ground-truth boxes for one detection sample.
///
/// Greedy assignment in confidence order:
///
/// 1. Predictions below the confidence threshold are dropped entirely.
/// 2. Remaining predictions are processed by confidence descending, ties
///    broken by original input order.
/// 3. Each prediction takes the *unmatched* ground-truth box with maximum
///    IoU. At or above the IoU threshold the box is consumed: same class is
///    a true positive, different class a label error. Below threshold (or
///    no box left) the prediction is a false positive.
/// 4. Ground-truth boxes never consumed become false negatives.
pub fn match_detections(
    sample_id: DbId,
    ground_truths: &[GroundTruth],
    predictions: &[Prediction],
    thresholds: &MatchThresholds,
) -> SampleMatchResult {
    // Indices of predictions above the confidence cut, in greedy order.
    let mut order: Vec<usize> = predictions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.confidence >= thresholds.confidence)
        .map(|(i, _)| i)
        .collect();
    // Stable sort keeps input order for equal confidences.
    order.sort_by(|&a, &b| {
        predictions[b]
            .confidence
            .partial_cmp(&predictions[a].confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let pred_boxes: Vec<BoundingBox> = predictions.iter().map(|p| p.bbox).collect();
    let gt_boxes: Vec<BoundingBox> = ground_truths.iter().map(|g| g.bbox).collect();
    let overlaps = iou_matrix(&pred_boxes, &gt_boxes);

    let mut gt_matched = vec![false; ground_truths.len()];
    let mut outcomes: Vec<MatchOutcome> = Vec::with_capacity(order.len() + ground_truths.len());

    for &pi in &order {
        let pred = &predictions[pi];

        // Best unmatched ground-truth box by IoU; first index wins ties.
        let mut best: Option<(usize, f64)> = None;
        for (gi, matched) in gt_matched.iter().enumerate() {
            if *matched {
                continue;
            }
            let score = overlaps[pi][gi];
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((gi, score));
            }
        }

        let outcome = match best {
            Some((gi, score)) if score >= thresholds.iou => {
                let gt = &ground_truths[gi];
                gt_matched[gi] = true;
                let label = if gt.class_name == pred.class_name {
                    MatchLabel::TruePositive
                } else {
                    MatchLabel::LabelError
                };
                MatchOutcome {
                    annotation_id: pred.annotation_id,
                    label,
                    matched_annotation_id: Some(gt.annotation_id),
                    iou: Some(score),
                    predicted_class: Some(pred.class_name.clone()),
                    actual_class: Some(gt.class_name.clone()),
                    confidence: Some(pred.confidence),
                }
            }
            _ => MatchOutcome {
                annotation_id: pred.annotation_id,
                label: MatchLabel::FalsePositive,
                matched_annotation_id: None,
                iou: None,
                predicted_class: Some(pred.class_name.clone()),
                actual_class: None,
                confidence: Some(pred.confidence),
            },
        };
        outcomes.push(outcome);
    }

    for (gi, gt) in ground_truths.iter().enumerate() {
        if gt_matched[gi] {
            continue;
        }
        outcomes.push(MatchOutcome {
            annotation_id: gt.annotation_id,
            label: MatchLabel::FalseNegative,
            matched_annotation_id: None,
            iou: None,
            predicted_class: None,
            actual_class: Some(gt.class_name.clone()),
            confidence: None,
        });
    }

    outcomes.sort_by_key(|o| o.annotation_id);
    SampleMatchResult {
        sample_id,
        outcomes,
    }
}

// ---------------------------------------------------------------------------
// Classification matching (label equality)
// ---------------------------------------------------------------------------

/// Match a classification sample: at most one ground-truth label and at most
/// one prediction above the confidence threshold.
///
/// No geometry and no greedy assignment — this is intentionally the
/// degenerate case of the detection contract. The dataset invariant is
/// single-label ground truth; if ingestion accepted extra rows the one with
/// the lowest annotation id wins, deterministically.
///
/// - No prediction above threshold → false negative on the ground truth.
/// - Prediction label equals ground truth → true positive.
/// - Prediction label differs → label error (misclassification).
/// - Prediction with no ground truth at all → false positive.
pub fn match_classification(
    sample_id: DbId,
    ground_truths: &[GroundTruth],
    predictions: &[Prediction],
    thresholds: &MatchThresholds,
) -> SampleMatchResult {
    let gt = ground_truths.iter().min_by_key(|g| g.annotation_id);

    // Highest-confidence prediction above the cut; lowest id wins ties.
    let pred = predictions
        .iter()
        .filter(|p| p.confidence >= thresholds.confidence)
        .min_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.annotation_id.cmp(&b.annotation_id))
        });

    let mut outcomes = Vec::new();
    match (gt, pred) {
        (Some(gt), Some(pred)) => {
            let label = if gt.class_name == pred.class_name {
                MatchLabel::TruePositive
            } else {
                MatchLabel::LabelError
            };
            outcomes.push(MatchOutcome {
                annotation_id: pred.annotation_id,
                label,
                matched_annotation_id: Some(gt.annotation_id),
                iou: None,
                predicted_class: Some(pred.class_name.clone()),
                actual_class: Some(gt.class_name.clone()),
                confidence: Some(pred.confidence),
            });
        }
        (Some(gt), None) => {
            outcomes.push(MatchOutcome {
                annotation_id: gt.annotation_id,
                label: MatchLabel::FalseNegative,
                matched_annotation_id: None,
                iou: None,
                predicted_class: None,
                actual_class: Some(gt.class_name.clone()),
                confidence: None,
            });
        }
        (None, Some(pred)) => {
            outcomes.push(MatchOutcome {
                annotation_id: pred.annotation_id,
                label: MatchLabel::FalsePositive,
                matched_annotation_id: None,
                iou: None,
                predicted_class: Some(pred.class_name.clone()),
                actual_class: None,
                confidence: Some(pred.confidence),
            });
        }
        (None, None) => {}
    }

    outcomes.sort_by_key(|o| o.annotation_id);
    SampleMatchResult {
        sample_id,
        outcomes,
    }
}

// ---------------------------------------------------------------------------
// Matcher selection
// ---------------------------------------------------------------------------

/// Run the matcher appropriate for the dataset's task type.
///
/// Downstream code (aggregation, drill-down, triage) calls this and treats
/// both modes uniformly through [`SampleMatchResult`].
pub fn match_sample(
    task: TaskType,
    sample_id: DbId,
    ground_truths: &[GroundTruth],
    predictions: &[Prediction],
    thresholds: &MatchThresholds,
) -> SampleMatchResult {
    match task {
        TaskType::Detection => match_detections(sample_id, ground_truths, predictions, thresholds),
        TaskType::Classification => {
            match_classification(sample_id, ground_truths, predictions, thresholds)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn gt(id: DbId, class: &str, x: f64, y: f64, w: f64, h: f64) -> GroundTruth {
        GroundTruth {
            annotation_id: id,
            class_name: class.to_string(),
            bbox: BoundingBox::new(x, y, w, h),
        }
    }

    fn pred(id: DbId, class: &str, x: f64, y: f64, w: f64, h: f64, conf: f64) -> Prediction {
        Prediction {
            annotation_id: id,
            class_name: class.to_string(),
            bbox: BoundingBox::new(x, y, w, h),
            confidence: conf,
        }
    }

    fn label_gt(id: DbId, class: &str) -> GroundTruth {
        gt(id, class, 0.0, 0.0, 0.0, 0.0)
    }

    fn label_pred(id: DbId, class: &str, conf: f64) -> Prediction {
        pred(id, class, 0.0, 0.0, 0.0, 0.0, conf)
    }

    // -- Thresholds ----------------------------------------------------------

    #[test]
    fn thresholds_accept_unit_interval() {
        assert!(MatchThresholds {
            iou: 0.0,
            confidence: 1.0
        }
        .validate()
        .is_ok());
        assert!(MatchThresholds::default().validate().is_ok());
    }

    #[test]
    fn thresholds_reject_out_of_range() {
        assert!(MatchThresholds {
            iou: 1.1,
            confidence: 0.5
        }
        .validate()
        .is_err());
        assert!(MatchThresholds {
            iou: 0.5,
            confidence: -0.1
        }
        .validate()
        .is_err());
    }

    #[test]
    fn task_type_parses_known_values() {
        assert_eq!(TaskType::parse("detection").unwrap(), TaskType::Detection);
        assert_eq!(
            TaskType::parse("classification").unwrap(),
            TaskType::Classification
        );
        assert_matches!(
            TaskType::parse("segmentation"),
            Err(CoreError::Validation(_))
        );
    }

    // -- Detection matching --------------------------------------------------

    #[test]
    fn detection_mixed_outcomes_scenario() {
        // Two GT boxes (cat, dog) and two cat predictions: one true positive
        // on the cat, one label error over the dog, no false negatives.
        let gts = vec![
            gt(1, "cat", 0.0, 0.0, 10.0, 10.0),
            gt(2, "dog", 20.0, 20.0, 10.0, 10.0),
        ];
        let preds = vec![
            pred(10, "cat", 1.0, 1.0, 10.0, 10.0, 0.9),
            pred(11, "cat", 20.0, 20.0, 10.0, 10.0, 0.8),
        ];
        let thresholds = MatchThresholds {
            iou: 0.5,
            confidence: 0.25,
        };
        let result = match_detections(7, &gts, &preds, &thresholds);

        assert_eq!(result.count(MatchLabel::TruePositive), 1);
        assert_eq!(result.count(MatchLabel::LabelError), 1);
        assert_eq!(result.count(MatchLabel::FalseNegative), 0);
        assert_eq!(result.count(MatchLabel::FalsePositive), 0);

        let tp = result.outcome_for(10).unwrap();
        assert_eq!(tp.label, MatchLabel::TruePositive);
        assert_eq!(tp.matched_annotation_id, Some(1));
        assert!(tp.iou.unwrap() > 0.5);

        let le = result.outcome_for(11).unwrap();
        assert_eq!(le.label, MatchLabel::LabelError);
        assert_eq!(le.matched_annotation_id, Some(2));
        assert_eq!(le.actual_class.as_deref(), Some("dog"));
        assert_eq!(le.predicted_class.as_deref(), Some("cat"));
    }

    #[test]
    fn detection_low_confidence_predictions_dropped() {
        let gts = vec![gt(1, "cat", 0.0, 0.0, 10.0, 10.0)];
        let preds = vec![pred(10, "cat", 0.0, 0.0, 10.0, 10.0, 0.1)];
        let result = match_detections(1, &gts, &preds, &MatchThresholds::default());

        // The prediction is gone entirely and the GT becomes a false negative.
        assert!(result.outcome_for(10).is_none());
        assert_eq!(result.outcome_for(1).unwrap().label, MatchLabel::FalseNegative);
    }

    #[test]
    fn detection_no_overlap_is_false_positive_and_false_negative() {
        let gts = vec![gt(1, "cat", 0.0, 0.0, 10.0, 10.0)];
        let preds = vec![pred(10, "cat", 50.0, 50.0, 10.0, 10.0, 0.9)];
        let result = match_detections(1, &gts, &preds, &MatchThresholds::default());

        assert_eq!(result.outcome_for(10).unwrap().label, MatchLabel::FalsePositive);
        assert_eq!(result.outcome_for(1).unwrap().label, MatchLabel::FalseNegative);
    }

    #[test]
    fn detection_higher_confidence_wins_contested_box() {
        // Both predictions overlap the single GT box; the higher-confidence
        // one consumes it, the other becomes a false positive.
        let gts = vec![gt(1, "cat", 0.0, 0.0, 10.0, 10.0)];
        let preds = vec![
            pred(10, "cat", 1.0, 1.0, 10.0, 10.0, 0.6),
            pred(11, "cat", 0.0, 0.0, 10.0, 10.0, 0.9),
        ];
        let result = match_detections(1, &gts, &preds, &MatchThresholds::default());

        assert_eq!(result.outcome_for(11).unwrap().label, MatchLabel::TruePositive);
        assert_eq!(result.outcome_for(10).unwrap().label, MatchLabel::FalsePositive);
    }

    #[test]
    fn detection_confidence_ties_break_by_input_order() {
        let gts = vec![gt(1, "cat", 0.0, 0.0, 10.0, 10.0)];
        let preds = vec![
            pred(10, "cat", 0.0, 0.0, 10.0, 10.0, 0.9),
            pred(11, "cat", 0.0, 0.0, 10.0, 10.0, 0.9),
        ];
        let result = match_detections(1, &gts, &preds, &MatchThresholds::default());

        // First in input order takes the box.
        assert_eq!(result.outcome_for(10).unwrap().label, MatchLabel::TruePositive);
        assert_eq!(result.outcome_for(11).unwrap().label, MatchLabel::FalsePositive);
    }

    #[test]
    fn detection_label_error_consumes_ground_truth() {
        // The wrong-class match consumes the GT box, so a later same-class
        // prediction cannot claim it.
        let gts = vec![gt(1, "dog", 0.0, 0.0, 10.0, 10.0)];
        let preds = vec![
            pred(10, "cat", 0.0, 0.0, 10.0, 10.0, 0.9),
            pred(11, "dog", 0.0, 0.0, 10.0, 10.0, 0.5),
        ];
        let result = match_detections(1, &gts, &preds, &MatchThresholds::default());

        assert_eq!(result.outcome_for(10).unwrap().label, MatchLabel::LabelError);
        assert_eq!(result.outcome_for(11).unwrap().label, MatchLabel::FalsePositive);
        assert_eq!(result.count(MatchLabel::FalseNegative), 0);
    }

    #[test]
    fn detection_conservation_properties() {
        let gts = vec![
            gt(1, "cat", 0.0, 0.0, 10.0, 10.0),
            gt(2, "dog", 30.0, 30.0, 10.0, 10.0),
            gt(3, "bird", 60.0, 60.0, 10.0, 10.0),
        ];
        let preds = vec![
            pred(10, "cat", 0.0, 0.0, 10.0, 10.0, 0.95),
            pred(11, "cat", 31.0, 31.0, 10.0, 10.0, 0.7),
            pred(12, "dog", 200.0, 200.0, 10.0, 10.0, 0.6),
            pred(13, "cat", 0.0, 0.0, 10.0, 10.0, 0.1), // below cut
        ];
        let result = match_detections(1, &gts, &preds, &MatchThresholds::default());

        let tp = result.count(MatchLabel::TruePositive);
        let le = result.count(MatchLabel::LabelError);
        let fp = result.count(MatchLabel::FalsePositive);
        let fnn = result.count(MatchLabel::FalseNegative);

        // Every surviving prediction gets exactly one outcome.
        assert_eq!(tp + le + fp, 3);
        // Every GT box is matched at most once.
        assert_eq!(tp + le + fnn, 3);
    }

    #[test]
    fn detection_is_deterministic() {
        let gts = vec![
            gt(1, "cat", 0.0, 0.0, 10.0, 10.0),
            gt(2, "cat", 5.0, 5.0, 10.0, 10.0),
        ];
        let preds = vec![
            pred(10, "cat", 2.0, 2.0, 10.0, 10.0, 0.8),
            pred(11, "cat", 3.0, 3.0, 10.0, 10.0, 0.8),
        ];
        let thresholds = MatchThresholds {
            iou: 0.3,
            confidence: 0.25,
        };
        let first = match_detections(1, &gts, &preds, &thresholds);
        for _ in 0..10 {
            let again = match_detections(1, &gts, &preds, &thresholds);
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&again).unwrap()
            );
        }
    }

    #[test]
    fn detection_empty_inputs() {
        let result = match_detections(1, &[], &[], &MatchThresholds::default());
        assert!(result.outcomes.is_empty());
    }

    // -- Classification matching ---------------------------------------------

    #[test]
    fn classification_correct_label_is_true_positive() {
        let result = match_classification(
            1,
            &[label_gt(1, "bird")],
            &[label_pred(10, "bird", 0.8)],
            &MatchThresholds::default(),
        );
        let o = result.outcome_for(10).unwrap();
        assert_eq!(o.label, MatchLabel::TruePositive);
        assert_eq!(o.matched_annotation_id, Some(1));
        assert!(o.iou.is_none());
    }

    #[test]
    fn classification_wrong_label_is_label_error() {
        let result = match_classification(
            1,
            &[label_gt(1, "bird")],
            &[label_pred(10, "plane", 0.8)],
            &MatchThresholds::default(),
        );
        let o = result.outcome_for(10).unwrap();
        assert_eq!(o.label, MatchLabel::LabelError);
        assert_eq!(o.actual_class.as_deref(), Some("bird"));
        assert_eq!(o.predicted_class.as_deref(), Some("plane"));
    }

    #[test]
    fn classification_all_predictions_below_threshold() {
        // Ground truth "bird", prediction below the confidence cut: the
        // category is a missing prediction on the ground-truth annotation.
        let result = match_classification(
            1,
            &[label_gt(1, "bird")],
            &[label_pred(10, "bird", 0.1)],
            &MatchThresholds::default(),
        );
        assert!(result.outcome_for(10).is_none());
        let o = result.outcome_for(1).unwrap();
        assert_eq!(o.label, MatchLabel::FalseNegative);
        assert_eq!(o.actual_class.as_deref(), Some("bird"));
    }

    #[test]
    fn classification_prediction_without_ground_truth_is_false_positive() {
        let result = match_classification(
            1,
            &[],
            &[label_pred(10, "bird", 0.8)],
            &MatchThresholds::default(),
        );
        assert_eq!(result.outcome_for(10).unwrap().label, MatchLabel::FalsePositive);
    }

    #[test]
    fn classification_highest_confidence_prediction_wins() {
        let result = match_classification(
            1,
            &[label_gt(1, "bird")],
            &[label_pred(10, "plane", 0.6), label_pred(11, "bird", 0.9)],
            &MatchThresholds::default(),
        );
        assert_eq!(result.outcome_for(11).unwrap().label, MatchLabel::TruePositive);
        assert!(result.outcome_for(10).is_none());
    }

    #[test]
    fn classification_extra_ground_truth_rows_lowest_id_wins() {
        // Multi-label ingestion is out of evaluation scope; the lowest
        // annotation id is used deterministically.
        let result = match_classification(
            1,
            &[label_gt(5, "plane"), label_gt(2, "bird")],
            &[label_pred(10, "bird", 0.9)],
            &MatchThresholds::default(),
        );
        let o = result.outcome_for(10).unwrap();
        assert_eq!(o.label, MatchLabel::TruePositive);
        assert_eq!(o.matched_annotation_id, Some(2));
    }

    #[test]
    fn classification_empty_sample_has_no_outcomes() {
        let result = match_classification(1, &[], &[], &MatchThresholds::default());
        assert!(result.outcomes.is_empty());
    }

    // -- Mode selection ------------------------------------------------------

    #[test]
    fn match_sample_dispatches_by_task_type() {
        let gts = vec![label_gt(1, "bird")];
        let preds = vec![label_pred(10, "bird", 0.9)];
        let c = match_sample(
            TaskType::Classification,
            1,
            &gts,
            &preds,
            &MatchThresholds::default(),
        );
        assert_eq!(c.outcome_for(10).unwrap().label, MatchLabel::TruePositive);

        // Under detection rules the sentinel boxes have zero area, so the
        // same inputs produce a false positive and a false negative.
        let d = match_sample(
            TaskType::Detection,
            1,
            &gts,
            &preds,
            &MatchThresholds::default(),
        );
        assert_eq!(d.outcome_for(10).unwrap().label, MatchLabel::FalsePositive);
        assert_eq!(d.outcome_for(1).unwrap().label, MatchLabel::FalseNegative);
    }
}
