//! Pull request change aggregation.
//!
//! Builds an `AggregationResult` from a branch diff:
//! 1. Fetch the diff from the PR's target branch (base) to its source branch
//! 2. Drop folders and recount change types from what is left
//! 3. Walk files in order, skipping low-value extensions, up to `max_files`
//! 4. For edits diff both versions; for adds list the new file; others carry
//!    only path and change type
//!
//! A failed branch diff fails the whole call. A failed content fetch only marks
//! that file with `content_error`.

use std::collections::BTreeMap;

use crate::changes::differ::{render_added_file, render_diff};
use crate::changes::GitSource;
use crate::error::Result;
use crate::models::{
    AggregationResult, ChangeSummary, ChangeType, FileChangeRecord, FileChangeResult, PrChanges,
};

pub const DEFAULT_MAX_FILES: usize = 20;

/// Files with these extensions add nothing useful to a review summary.
const SKIPPED_EXTENSIONS: &[&str] = &[".lock", ".pyc", ".svg", ".ico", ".woff", ".ttf"];

fn is_skipped(path: &str) -> bool {
    SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Entry point for the tool layer. Never fails: a batch-level failure is
/// reported as `PrChanges::Failed`.
pub fn get_pr_changes<S: GitSource + ?Sized>(
    source: &S,
    repository_id: &str,
    source_branch: &str,
    target_branch: &str,
    max_files: usize,
) -> PrChanges {
    match aggregate_pr_changes(source, repository_id, source_branch, target_branch, max_files) {
        Ok(result) => PrChanges::Changes(result),
        Err(e) => {
            tracing::error!(
                "Failed to retrieve changes for {} ({} -> {}): {}",
                repository_id,
                source_branch,
                target_branch,
                e
            );
            PrChanges::Failed { error: e.to_string() }
        }
    }
}

pub fn aggregate_pr_changes<S: GitSource + ?Sized>(
    source: &S,
    repository_id: &str,
    source_branch: &str,
    target_branch: &str,
    max_files: usize,
) -> Result<AggregationResult> {
    let diff = source.get_branch_diff(repository_id, target_branch, source_branch)?;
    tracing::debug!(
        "Branch diff: {} entries, upstream counts {:?}",
        diff.changes.len(),
        diff.change_counts
    );

    let changes: Vec<FileChangeRecord> =
        diff.changes.into_iter().filter(|c| !c.is_folder).collect();

    let mut change_types: BTreeMap<String, usize> = BTreeMap::new();
    for change in &changes {
        *change_types.entry(change.change_type.label()).or_insert(0) += 1;
    }

    let mut summary = ChangeSummary {
        total_files_changed: changes.len(),
        change_types,
        note: None,
    };

    let mut files = Vec::new();

    for change in &changes {
        if files.len() >= max_files {
            break;
        }

        if change.is_folder || is_skipped(&change.path) {
            continue;
        }

        files.push(describe_change(source, repository_id, source_branch, target_branch, change));
    }

    if files.len() >= max_files && changes.len() > max_files {
        summary.note = Some(format!(
            "Only showing {} of {} changed files.",
            max_files,
            changes.len()
        ));
    }

    tracing::info!(
        "Collected {} of {} changed files for {} ({} -> {})",
        files.len(),
        changes.len(),
        repository_id,
        source_branch,
        target_branch
    );

    Ok(AggregationResult { summary, files })
}

fn describe_change<S: GitSource + ?Sized>(
    source: &S,
    repository_id: &str,
    source_branch: &str,
    target_branch: &str,
    change: &FileChangeRecord,
) -> FileChangeResult {
    let path = change.path.trim_start_matches('/');

    let content = match change.change_type {
        ChangeType::Edit => Some(
            source
                .get_file_content(repository_id, source_branch, path)
                .and_then(|current| {
                    let previous = source.get_file_content(repository_id, target_branch, path)?;
                    Ok(render_diff(&previous.into_text(), &current.into_text()))
                }),
        ),
        ChangeType::Add => Some(
            source
                .get_file_content(repository_id, source_branch, path)
                .map(|content| render_added_file(&content.into_text())),
        ),
        _ => None,
    };

    let (diff, content_error) = match content {
        Some(Ok(diff)) => (Some(diff), None),
        Some(Err(e)) => {
            tracing::warn!("Could not fetch content for {}: {}", change.path, e);
            (None, Some(e.to_string()))
        }
        None => (None, None),
    };

    FileChangeResult {
        path: change.path.clone(),
        change_type: change.change_type.clone(),
        diff,
        content_error,
    }
}
