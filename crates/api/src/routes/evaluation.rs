//! Route definitions for dataset evaluation endpoints.
//!
//! ```text
//! /datasets/{id}/sources           prediction run names (GET)
//! /datasets/{id}/evaluation        confusion matrix + metrics (GET)
//! /datasets/{id}/errors            error categorization (GET)
//! /datasets/{id}/confusion-cell    drill-down to sample ids (GET)
//! /datasets/{id}/worst-samples     composite ranking (GET)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::{drilldown, errors, evaluation, worst};
use crate::state::AppState;

/// Evaluation routes, nested at `/datasets`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/datasets/{id}/sources", get(evaluation::list_sources))
        .route("/datasets/{id}/evaluation", get(evaluation::evaluate))
        .route("/datasets/{id}/errors", get(errors::list_errors))
        .route(
            "/datasets/{id}/confusion-cell",
            get(drilldown::confusion_cell_samples),
        )
        .route("/datasets/{id}/worst-samples", get(worst::worst_samples))
}
