//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod annotation;
pub mod dataset;
pub mod sample;
pub mod triage_override;
