//! Axis-aligned box geometry: conversions, areas, and pairwise IoU.
//!
//! Boxes are `(x, y, width, height)` in absolute pixel units. Classification
//! annotations carry an all-zero sentinel box and never reach the geometric
//! paths. No database access — pure math.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area. Non-positive dimensions yield `0.0`.
    pub fn area(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 0.0;
        }
        self.width * self.height
    }

    /// True for the all-zero sentinel used by classification annotations.
    pub fn is_empty(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }
}

/// Compute intersection-over-union between two boxes.
///
/// Returns a value in `[0.0, 1.0]`. Returns `0.0` when the boxes do not
/// overlap or when either box has non-positive area.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let area_a = a.area();
    let area_b = b.area();
    if area_a == 0.0 || area_b == 0.0 {
        return 0.0;
    }

    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = (a.x + a.width).min(b.x + b.width);
    let bottom = (a.y + a.height).min(b.y + b.height);

    if right <= left || bottom <= top {
        return 0.0;
    }

    let intersection = (right - left) * (bottom - top);
    let union = area_a + area_b - intersection;
    if union == 0.0 {
        return 0.0;
    }

    intersection / union
}

/// Compute the full M×N pairwise IoU matrix between `rows` and `cols`.
///
/// `result[i][j]` is `iou(&rows[i], &cols[j])`. The matcher uses this to
/// score every prediction against every ground-truth box in one call.
pub fn iou_matrix(rows: &[BoundingBox], cols: &[BoundingBox]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|r| cols.iter().map(|c| iou(r, c)).collect())
        .collect()
}
