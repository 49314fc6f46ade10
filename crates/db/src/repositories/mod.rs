//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod annotation_repo;
pub mod dataset_repo;
pub mod sample_repo;
pub mod triage_override_repo;

pub use annotation_repo::AnnotationRepo;
pub use dataset_repo::DatasetRepo;
pub use sample_repo::SampleRepo;
pub use triage_override_repo::TriageOverrideRepo;
