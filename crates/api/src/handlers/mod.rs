//! Request handlers.
//!
//! Handlers orchestrate: load annotations through `verdict-db`, run the
//! pure matching/aggregation functions from `verdict-core`, and shape the
//! JSON response. Matching is recomputed from current annotation state on
//! every request; nothing here caches.

pub mod common;
pub mod drilldown;
pub mod errors;
pub mod evaluation;
pub mod triage;
pub mod worst;
