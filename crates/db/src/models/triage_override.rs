//! Triage override model: a durable, user-authored correction to one
//! computed match outcome.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use verdict_core::types::{DbId, Timestamp};

/// A row from the `triage_overrides` table.
///
/// At most one active row exists per annotation, enforced by
/// delete-then-insert inside one transaction (never update-in-place).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TriageOverride {
    pub id: DbId,
    pub annotation_id: DbId,
    pub dataset_id: DbId,
    pub sample_id: DbId,
    /// One of the closed set in `verdict_core::triage::VALID_TRIAGE_LABELS`.
    pub label: String,
    pub is_override: bool,
    pub created_at: Timestamp,
}

/// Request body for setting an override.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTriageOverride {
    pub label: String,
}
