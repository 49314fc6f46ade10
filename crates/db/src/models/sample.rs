//! Sample model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use verdict_core::types::{DbId, Timestamp};

/// A row from the `samples` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sample {
    pub id: DbId,
    pub dataset_id: DbId,
    pub external_key: String,
    pub split: Option<String>,
    /// Free-form tag strings (JSONB array). Verdict writes only the
    /// bridging `"triaged"` entry.
    pub tags: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Sample {
    /// Whether the tag array contains the given string.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_array()
            .map(|a| a.iter().any(|t| t.as_str() == Some(tag)))
            .unwrap_or(false)
    }
}

/// DTO for creating a sample.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSample {
    pub dataset_id: DbId,
    pub external_key: String,
    pub split: Option<String>,
}
