//! Azure DevOps REST client.
//!
//! - `client`: authenticated request plumbing (PAT basic auth, api-version)
//! - `git`: repository, branch, branch-diff and file-content endpoints

pub mod client;
pub mod git;

use std::sync::Arc;

pub use client::AzureDevOpsClient;

pub type SharedClient = Arc<AzureDevOpsClient>;
