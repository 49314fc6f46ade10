//! Repository for the `triage_overrides` table.
//!
//! Writes are delete-then-insert inside one transaction; a unique index on
//! `annotation_id` backs the "at most one active override per annotation"
//! invariant against concurrent writers (the loser of a racing pair gets a
//! unique violation, surfaced as a conflict). Every write also re-derives
//! the sample's bridging tag from the override table inside the same
//! transaction, under a per-sample row lock, so the tag can never drift
//! from the rows.

use sqlx::{PgPool, Postgres, Transaction};
use verdict_core::triage::TRIAGE_SAMPLE_TAG;
use verdict_core::types::DbId;

use crate::models::annotation::Annotation;
use crate::models::triage_override::TriageOverride;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, annotation_id, dataset_id, sample_id, label, is_override, created_at";

/// Provides atomic set/clear operations and lookups for triage overrides.
pub struct TriageOverrideRepo;

impl TriageOverrideRepo {
    /// List the active overrides for one sample.
    pub async fn list_for_sample(
        pool: &PgPool,
        sample_id: DbId,
    ) -> Result<Vec<TriageOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM triage_overrides
             WHERE sample_id = $1
             ORDER BY annotation_id"
        );
        sqlx::query_as::<_, TriageOverride>(&query)
            .bind(sample_id)
            .fetch_all(pool)
            .await
    }

    /// Find the active override for one annotation, if any.
    pub async fn find_for_annotation(
        pool: &PgPool,
        annotation_id: DbId,
    ) -> Result<Option<TriageOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM triage_overrides WHERE annotation_id = $1"
        );
        sqlx::query_as::<_, TriageOverride>(&query)
            .bind(annotation_id)
            .fetch_optional(pool)
            .await
    }

    /// Set (or replace) the override for an annotation.
    ///
    /// The caller resolves and validates the annotation first; the label
    /// must already have passed
    /// [`verdict_core::triage::validate_triage_label`]. Deletes any existing
    /// row, inserts the new one, and re-syncs the sample tag, all in one
    /// transaction.
    pub async fn set(
        pool: &PgPool,
        annotation: &Annotation,
        label: &str,
    ) -> Result<TriageOverride, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM triage_overrides WHERE annotation_id = $1")
            .bind(annotation.id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO triage_overrides (annotation_id, dataset_id, sample_id, label)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TriageOverride>(&query)
            .bind(annotation.id)
            .bind(annotation.dataset_id)
            .bind(annotation.sample_id)
            .bind(label)
            .fetch_one(&mut *tx)
            .await?;

        Self::sync_sample_tag(&mut tx, annotation.sample_id).await?;
        tx.commit().await?;

        tracing::debug!(
            annotation_id = annotation.id,
            sample_id = annotation.sample_id,
            label,
            "Triage override set"
        );
        Ok(row)
    }

    /// Clear the override for an annotation, if one exists. Idempotent.
    ///
    /// Returns whether a row was actually deleted. The sample tag is
    /// re-synced either way inside the same transaction.
    pub async fn clear(pool: &PgPool, annotation: &Annotation) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM triage_overrides WHERE annotation_id = $1")
            .bind(annotation.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        Self::sync_sample_tag(&mut tx, annotation.sample_id).await?;
        tx.commit().await?;

        Ok(deleted > 0)
    }

    /// Re-derive the bridging sample tag from the override table.
    ///
    /// The tag is recomputed from scratch on every write rather than
    /// patched incrementally: clearing one of two overridden annotations on
    /// a sample must leave the tag set, and only a fresh existence check
    /// gets that right under concurrency.
    async fn sync_sample_tag(
        tx: &mut Transaction<'_, Postgres>,
        sample_id: DbId,
    ) -> Result<(), sqlx::Error> {
        // Writers touching the same sample serialize here; the existence
        // check below then runs against the previous writer's committed rows.
        sqlx::query("SELECT id FROM samples WHERE id = $1 FOR UPDATE")
            .bind(sample_id)
            .execute(&mut **tx)
            .await?;

        let (has_override,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM triage_overrides WHERE sample_id = $1)",
        )
        .bind(sample_id)
        .fetch_one(&mut **tx)
        .await?;

        if has_override {
            sqlx::query(
                "UPDATE samples
                 SET tags = CASE
                         WHEN jsonb_exists(tags, $2) THEN tags
                         ELSE tags || jsonb_build_array($2::text)
                     END,
                     updated_at = now()
                 WHERE id = $1",
            )
            .bind(sample_id)
            .bind(TRIAGE_SAMPLE_TAG)
            .execute(&mut **tx)
            .await?;
        } else {
            sqlx::query(
                "UPDATE samples SET tags = tags - $2, updated_at = now() WHERE id = $1",
            )
            .bind(sample_id)
            .bind(TRIAGE_SAMPLE_TAG)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
