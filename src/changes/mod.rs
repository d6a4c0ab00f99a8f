//! Pull request change digest.
//!
//! - `differ`: line-numbered annotated listing between two file versions
//! - `aggregate`: branch diff → bounded per-file summary for the tool layer
//!
//! Upstream access goes through the `GitSource` trait so the aggregator can be
//! driven by the Azure DevOps client or by an in-memory double.

pub mod aggregate;
pub mod differ;

pub use aggregate::{get_pr_changes, DEFAULT_MAX_FILES};

use crate::error::Result;
use crate::models::BranchDiff;

/// File content as returned upstream: already text, or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Bytes(Vec<u8>),
}

impl FileContent {
    /// Decode to text, substituting a placeholder for non-UTF-8 content.
    pub fn into_text(self) -> String {
        match self {
            FileContent::Text(text) => text,
            FileContent::Bytes(bytes) => String::from_utf8(bytes)
                .unwrap_or_else(|e| format!("[Binary content - {} bytes]", e.as_bytes().len())),
        }
    }
}

pub trait GitSource {
    /// Changes needed to go from `base_version` to `target_version`.
    fn get_branch_diff(
        &self,
        repository_id: &str,
        base_version: &str,
        target_version: &str,
    ) -> Result<BranchDiff>;

    /// Content of `path` at the tip of branch `git_ref`.
    fn get_file_content(&self, repository_id: &str, git_ref: &str, path: &str) -> Result<FileContent>;
}
