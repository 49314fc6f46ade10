//! Route definitions for triage endpoints.
//!
//! ```text
//! /samples/{id}/triage        merged auto/override view (GET)
//! /annotations/{id}/triage    set, clear override (PUT, DELETE)
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::triage;
use crate::state::AppState;

/// Triage routes for samples and annotations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/samples/{id}/triage", get(triage::get_sample_triage))
        .route(
            "/annotations/{id}/triage",
            put(triage::set_triage).delete(triage::clear_triage),
        )
}
