//! Repository for the `datasets` table.

use sqlx::PgPool;
use verdict_core::types::DbId;

use crate::models::dataset::{CreateDataset, Dataset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, task_type, created_at, updated_at";

/// Provides lookups for datasets. Datasets are created by the ingestion
/// collaborator; the create method exists for fixtures and tooling.
pub struct DatasetRepo;

impl DatasetRepo {
    /// Find a dataset by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dataset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM datasets WHERE id = $1");
        sqlx::query_as::<_, Dataset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a dataset, returning the created row.
    pub async fn create(pool: &PgPool, body: &CreateDataset) -> Result<Dataset, sqlx::Error> {
        let query = format!(
            "INSERT INTO datasets (name, task_type)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dataset>(&query)
            .bind(&body.name)
            .bind(&body.task_type)
            .fetch_one(pool)
            .await
    }
}
