//! Change-related DTOs.
//!
//! - `FileChangeRecord`: one entry of an upstream branch diff
//! - `BranchDiff`: the upstream branch-comparison result
//! - `DiffLine`: single rendered line (unchanged, removed or added)
//! - `FileChangeResult`: one file's outcome in the aggregated summary
//! - `AggregationResult` / `PrChanges`: what the tool layer receives
//!
//! Used by: `changes::aggregate` and the `pr-changes` route

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeType {
    Add,
    Edit,
    Delete,
    Rename,
    /// Anything else upstream reports, lower-cased (e.g. "edit, rename")
    Other(String),
}

impl ChangeType {
    pub fn as_str(&self) -> &str {
        match self {
            ChangeType::Add => "add",
            ChangeType::Edit => "edit",
            ChangeType::Delete => "delete",
            ChangeType::Rename => "rename",
            ChangeType::Other(raw) => raw,
        }
    }

    /// Summary key: first letter upper-cased, the rest lower-cased.
    pub fn label(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for ChangeType {
    fn from(raw: String) -> Self {
        let lower = raw.to_lowercase();
        match lower.as_str() {
            "add" => ChangeType::Add,
            "edit" => ChangeType::Edit,
            "delete" => ChangeType::Delete,
            "rename" => ChangeType::Rename,
            _ => ChangeType::Other(lower),
        }
    }
}

impl From<ChangeType> for String {
    fn from(change_type: ChangeType) -> Self {
        change_type.as_str().to_string()
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawChange")]
pub struct FileChangeRecord {
    pub path: String,
    pub change_type: ChangeType,
    pub is_folder: bool,
}

// Upstream shape: {"changeType": "edit", "item": {"path": "/a.rs", "isFolder": false}}
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChange {
    #[serde(default)]
    change_type: String,
    #[serde(default)]
    item: RawItem,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    #[serde(default)]
    path: String,
    #[serde(default)]
    is_folder: bool,
}

impl From<RawChange> for FileChangeRecord {
    fn from(raw: RawChange) -> Self {
        Self {
            path: raw.item.path,
            change_type: ChangeType::from(raw.change_type),
            is_folder: raw.item.is_folder,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDiff {
    #[serde(default)]
    pub changes: Vec<FileChangeRecord>,
    /// Counts as reported upstream; these include folders.
    #[serde(default)]
    pub change_counts: BTreeMap<String, u64>,
}

/// One rendered line of a file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Unchanged { old: usize, new: usize, text: String },
    Removed { old: usize, text: String },
    Added { new: usize, text: String },
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffLine::Unchanged { old, new, text } => write!(f, "{:4} {:4}  {}", old, new, text),
            DiffLine::Removed { old, text } => write!(f, "{:4}      - {}", old, text),
            DiffLine::Added { new, text } => write!(f, "     {:4} + {}", new, text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChangeResult {
    pub path: String,
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub diff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content_error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub total_files_changed: usize,
    pub change_types: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    pub summary: ChangeSummary,
    pub files: Vec<FileChangeResult>,
}

/// Tool-facing outcome: either the summary or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrChanges {
    Changes(AggregationResult),
    Failed { error: String },
}
