//! Dataset model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use verdict_core::types::{DbId, Timestamp};

/// A row from the `datasets` table.
///
/// `task_type` is `'detection'` or `'classification'` and selects which
/// matcher evaluation runs; parse it with
/// [`verdict_core::matching::TaskType::parse`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dataset {
    pub id: DbId,
    pub name: String,
    pub task_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDataset {
    pub name: String,
    pub task_type: String,
}
