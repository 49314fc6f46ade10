//! Domain-level error type shared across Verdict crates.

/// Errors produced by domain logic in `verdict-core`.
///
/// HTTP handlers map these onto status codes in `verdict-api`; repositories
/// surface them for referential failures (e.g. an override targeting an
/// annotation that no longer exists).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity referenced by id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// An input failed validation (bad threshold, unknown triage label, ...).
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with current state.
    #[error("{0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}
