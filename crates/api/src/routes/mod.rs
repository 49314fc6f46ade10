pub mod evaluation;
pub mod health;
pub mod triage;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /datasets/{id}/sources           prediction run names (GET)
/// /datasets/{id}/evaluation        confusion matrix + metrics (GET)
/// /datasets/{id}/errors            error categorization (GET)
/// /datasets/{id}/confusion-cell    drill-down to sample ids (GET)
/// /datasets/{id}/worst-samples     composite ranking (GET)
///
/// /samples/{id}/triage             merged auto/override view (GET)
/// /annotations/{id}/triage         set, clear override (PUT, DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(evaluation::router())
        .merge(triage::router())
}
