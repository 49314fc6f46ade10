//! Repository for the `samples` table.

use sqlx::PgPool;
use verdict_core::types::DbId;

use crate::models::sample::{CreateSample, Sample};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dataset_id, external_key, split, tags, created_at, updated_at";

/// Provides lookups for samples. Samples are created by the ingestion
/// collaborator; the create method exists for fixtures and tooling.
pub struct SampleRepo;

impl SampleRepo {
    /// Find a sample by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Sample>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM samples WHERE id = $1");
        sqlx::query_as::<_, Sample>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a sample, returning the created row.
    pub async fn create(pool: &PgPool, body: &CreateSample) -> Result<Sample, sqlx::Error> {
        let query = format!(
            "INSERT INTO samples (dataset_id, external_key, split)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sample>(&query)
            .bind(body.dataset_id)
            .bind(&body.external_key)
            .bind(&body.split)
            .fetch_one(pool)
            .await
    }
}
