//! Triage label validation and override merging.
//!
//! Triage overrides are the only durable state the engine owns: a
//! user-authored correction that wins over the auto-computed label for one
//! annotation. The closed label set and the read-time merge live here;
//! persistence is in `verdict-db`.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::matching::{MatchLabel, SampleMatchResult};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Closed label set
// ---------------------------------------------------------------------------

pub const TRIAGE_TRUE_POSITIVE: &str = "true_positive";
pub const TRIAGE_FALSE_POSITIVE: &str = "false_positive";
pub const TRIAGE_FALSE_NEGATIVE: &str = "false_negative";
pub const TRIAGE_MISTAKE: &str = "mistake";
pub const VALID_TRIAGE_LABELS: &[&str] = &[
    TRIAGE_TRUE_POSITIVE,
    TRIAGE_FALSE_POSITIVE,
    TRIAGE_FALSE_NEGATIVE,
    TRIAGE_MISTAKE,
];

/// The bridging tag written into `samples.tags` while a sample has at least
/// one active override. Other subsystems key highlighting off this string
/// without depending on the override schema.
pub const TRIAGE_SAMPLE_TAG: &str = "triaged";

/// Validate that `label` is in the closed triage label set.
pub fn validate_triage_label(label: &str) -> Result<(), CoreError> {
    if VALID_TRIAGE_LABELS.contains(&label) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid triage label '{label}'. Must be one of: {}",
            VALID_TRIAGE_LABELS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Read-time merge
// ---------------------------------------------------------------------------

/// One annotation's triage view: the fresh auto label with any stored
/// override layered on top.
#[derive(Debug, Clone, Serialize)]
pub struct TriagedAnnotation {
    pub annotation_id: DbId,
    pub auto_label: MatchLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_label: Option<String>,
    pub is_override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_annotation_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iou: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Layer stored overrides over a freshly computed match result.
///
/// `overrides` maps annotation id to the stored label. Overrides for
/// annotations absent from the result (stale rows awaiting cleanup) are
/// ignored; the auto computation always defines the annotation universe.
pub fn merge_overrides(
    result: &SampleMatchResult,
    overrides: &HashMap<DbId, String>,
) -> Vec<TriagedAnnotation> {
    result
        .outcomes
        .iter()
        .map(|outcome| {
            let override_label = overrides.get(&outcome.annotation_id).cloned();
            TriagedAnnotation {
                annotation_id: outcome.annotation_id,
                auto_label: outcome.label,
                is_override: override_label.is_some(),
                override_label,
                matched_annotation_id: outcome.matched_annotation_id,
                iou: outcome.iou,
                confidence: outcome.confidence,
            }
        })
        .collect()
}
