//! Composite "worst samples" scoring.
//!
//! Ranks samples by a weighted combination of error count and prediction
//! confidence spread, each normalized by the observed maximum within the
//! current result set. The reference weights (0.6 / 0.4) are empirical and
//! exposed as tunable request parameters, not constants baked into callers.

use serde::Serialize;

use crate::error::CoreError;
use crate::matching::{MatchLabel, SampleMatchResult};
use crate::types::DbId;

/// Default weight on the normalized error count.
pub const DEFAULT_ERROR_WEIGHT: f64 = 0.6;
/// Default weight on the normalized confidence spread.
pub const DEFAULT_SPREAD_WEIGHT: f64 = 0.4;

/// Weights for the two composite score terms.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub error: f64,
    pub spread: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            error: DEFAULT_ERROR_WEIGHT,
            spread: DEFAULT_SPREAD_WEIGHT,
        }
    }
}

impl ScoreWeights {
    /// Validate that both weights are non-negative and sum to 1.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.error < 0.0 || self.spread < 0.0 {
            return Err(CoreError::Validation(
                "Score weights must be non-negative".to_string(),
            ));
        }
        if (self.error + self.spread - 1.0).abs() > 1e-9 {
            return Err(CoreError::Validation(format!(
                "Score weights must sum to 1.0, got {} + {}",
                self.error, self.spread
            )));
        }
        Ok(())
    }
}

/// Score breakdown for one ranked sample.
#[derive(Debug, Clone, Serialize)]
pub struct SampleScore {
    pub sample_id: DbId,
    pub score: f64,
    pub error_count: u64,
    pub confidence_spread: f64,
    pub normalized_error: f64,
    pub normalized_spread: f64,
}

/// Rank samples with at least one non-true-positive outcome, worst first.
///
/// Normalization divides by the maximum observed value in this result set;
/// a zero maximum contributes `0.0` for that term. Ties in score break by
/// sample id ascending so the ranking is deterministic. The result is
/// truncated to `limit`.
pub fn rank_worst_samples(
    results: &[SampleMatchResult],
    weights: &ScoreWeights,
    limit: usize,
) -> Vec<SampleScore> {
    struct RawScore {
        sample_id: DbId,
        error_count: u64,
        confidence_spread: f64,
    }

    let raw: Vec<RawScore> = results
        .iter()
        .filter_map(|result| {
            let error_count = result
                .outcomes
                .iter()
                .filter(|o| o.label != MatchLabel::TruePositive)
                .count() as u64;
            if error_count == 0 {
                return None;
            }

            let confidences: Vec<f64> =
                result.outcomes.iter().filter_map(|o| o.confidence).collect();
            let confidence_spread = match (
                confidences.iter().cloned().reduce(f64::min),
                confidences.iter().cloned().reduce(f64::max),
            ) {
                (Some(min), Some(max)) => max - min,
                _ => 0.0,
            };

            Some(RawScore {
                sample_id: result.sample_id,
                error_count,
                confidence_spread,
            })
        })
        .collect();

    let max_errors = raw.iter().map(|r| r.error_count).max().unwrap_or(0) as f64;
    let max_spread = raw
        .iter()
        .map(|r| r.confidence_spread)
        .fold(0.0, f64::max);

    let mut scores: Vec<SampleScore> = raw
        .into_iter()
        .map(|r| {
            let normalized_error = if max_errors == 0.0 {
                0.0
            } else {
                r.error_count as f64 / max_errors
            };
            let normalized_spread = if max_spread == 0.0 {
                0.0
            } else {
                r.confidence_spread / max_spread
            };
            SampleScore {
                sample_id: r.sample_id,
                score: weights.error * normalized_error + weights.spread * normalized_spread,
                error_count: r.error_count,
                confidence_spread: r.confidence_spread,
                normalized_error,
                normalized_spread,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.sample_id.cmp(&b.sample_id))
    });
    scores.truncate(limit);
    scores
}
