//! Annotation model: one ground-truth or predicted label for one sample.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use verdict_core::geometry::BoundingBox;
use verdict_core::matching::{GroundTruth, Prediction};
use verdict_core::types::{DbId, Timestamp};

/// Provenance value marking ground-truth annotations; anything else is a
/// named prediction run.
pub const SOURCE_GROUND_TRUTH: &str = "ground_truth";

/// A row from the `annotations` table.
///
/// Detection rows carry real box geometry; classification rows carry the
/// all-zero sentinel box. `confidence` is NULL for ground truth.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Annotation {
    pub id: DbId,
    pub dataset_id: DbId,
    pub sample_id: DbId,
    pub class_name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub confidence: Option<f64>,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Annotation {
    pub fn is_ground_truth(&self) -> bool {
        self.source == SOURCE_GROUND_TRUTH
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    /// View this row as a matcher ground-truth input.
    pub fn to_ground_truth(&self) -> GroundTruth {
        GroundTruth {
            annotation_id: self.id,
            class_name: self.class_name.clone(),
            bbox: self.bbox(),
        }
    }

    /// View this row as a matcher prediction input. Rows without a stored
    /// confidence (malformed imports) are treated as confidence 0 and fall
    /// below any positive threshold.
    pub fn to_prediction(&self) -> Prediction {
        Prediction {
            annotation_id: self.id,
            class_name: self.class_name.clone(),
            bbox: self.bbox(),
            confidence: self.confidence.unwrap_or(0.0),
        }
    }
}

/// DTO for creating an annotation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnotation {
    pub dataset_id: DbId,
    pub sample_id: DbId,
    pub class_name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: Option<f64>,
    pub source: String,
}
