//! Data transfer objects (DTOs) for upstream payloads and API responses.
//!
//! - `diff`: FileChangeRecord, BranchDiff, DiffLine, FileChangeResult,
//!   AggregationResult, PrChanges
//! - `repository`: RepositoryInfo, BranchInfo for the listing endpoints

pub mod diff;
pub mod repository;

pub use diff::*;
pub use repository::*;
