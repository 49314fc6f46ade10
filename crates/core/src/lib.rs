//! Pure domain logic for the Verdict evaluation engine.
//!
//! Everything in this crate is synchronous, deterministic, and free of
//! database access: box geometry, prediction/ground-truth matching,
//! confusion matrices and metrics, error categorization, composite
//! scoring, and triage label validation. Persistence lives in
//! `verdict-db`; HTTP orchestration lives in `verdict-api`.

pub mod categories;
pub mod error;
pub mod geometry;
pub mod matching;
pub mod metrics;
pub mod scoring;
pub mod triage;
pub mod types;
