//! Read-mostly repository for the `annotations` table.
//!
//! Evaluation enumerates ground truth plus one named prediction run for a
//! dataset slice; triage reads one sample at a time. Rows are ordered by
//! `(sample_id, id)` so downstream grouping and matching stay
//! deterministic.

use sqlx::PgPool;
use verdict_core::types::DbId;

use crate::models::annotation::{Annotation, CreateAnnotation, SOURCE_GROUND_TRUTH};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dataset_id, sample_id, class_name, x, y, width, height, area, \
                       confidence, source, created_at, updated_at";

/// The same columns qualified with the `a` alias for joined queries.
const COLUMNS_QUALIFIED: &str =
    "a.id, a.dataset_id, a.sample_id, a.class_name, a.x, a.y, a.width, a.height, a.area, \
     a.confidence, a.source, a.created_at, a.updated_at";

/// Provides read access to annotations plus inserts for fixtures/tooling.
pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Find an annotation by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Annotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM annotations WHERE id = $1");
        sqlx::query_as::<_, Annotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ground truth plus the named prediction run for a dataset,
    /// optionally restricted to one split, ordered by `(sample_id, id)`.
    pub async fn list_for_evaluation(
        pool: &PgPool,
        dataset_id: DbId,
        source: &str,
        split: Option<&str>,
    ) -> Result<Vec<Annotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_QUALIFIED} FROM annotations a
             JOIN samples s ON s.id = a.sample_id
             WHERE a.dataset_id = $1
               AND a.source IN ($2, $3)
               AND ($4::text IS NULL OR s.split = $4)
             ORDER BY a.sample_id, a.id"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(dataset_id)
            .bind(SOURCE_GROUND_TRUTH)
            .bind(source)
            .bind(split)
            .fetch_all(pool)
            .await
    }

    /// List ground truth plus the named prediction run for one sample,
    /// ordered by id.
    pub async fn list_for_sample(
        pool: &PgPool,
        sample_id: DbId,
        source: &str,
    ) -> Result<Vec<Annotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM annotations
             WHERE sample_id = $1 AND source IN ($2, $3)
             ORDER BY id"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(sample_id)
            .bind(SOURCE_GROUND_TRUTH)
            .bind(source)
            .fetch_all(pool)
            .await
    }

    /// Whether the dataset has any predictions from the named run.
    pub async fn has_predictions(
        pool: &PgPool,
        dataset_id: DbId,
        source: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM annotations WHERE dataset_id = $1 AND source = $2
             )",
        )
        .bind(dataset_id)
        .bind(source)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List the distinct prediction run names present for a dataset.
    pub async fn list_sources(pool: &PgPool, dataset_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT source FROM annotations
             WHERE dataset_id = $1 AND source <> $2
             ORDER BY source",
        )
        .bind(dataset_id)
        .bind(SOURCE_GROUND_TRUTH)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    /// Insert an annotation, returning the created row. The area column is
    /// derived from the box dimensions; sentinel boxes store zero.
    pub async fn create(pool: &PgPool, body: &CreateAnnotation) -> Result<Annotation, sqlx::Error> {
        let area = if body.width > 0.0 && body.height > 0.0 {
            body.width * body.height
        } else {
            0.0
        };
        let query = format!(
            "INSERT INTO annotations
                (dataset_id, sample_id, class_name, x, y, width, height, area, confidence, source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(body.dataset_id)
            .bind(body.sample_id)
            .bind(&body.class_name)
            .bind(body.x)
            .bind(body.y)
            .bind(body.width)
            .bind(body.height)
            .bind(area)
            .bind(body.confidence)
            .bind(&body.source)
            .fetch_one(pool)
            .await
    }
}
