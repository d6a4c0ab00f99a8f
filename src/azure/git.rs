//! Git repository endpoints of the Azure DevOps REST API.
//!
//! - `get_branch_diff`: GET /_apis/git/repositories/{id}/diffs/commits
//! - `get_file_content`: GET /_apis/git/repositories/{id}/items (raw bytes)
//! - `get_repositories`: GET [/{project}]/_apis/git/repositories
//! - `get_branches`: GET /_apis/git/repositories/{id}/refs

use reqwest::Method;
use serde::Deserialize;

use crate::azure::client::{AzureDevOpsClient, RequestOptions};
use crate::changes::{FileContent, GitSource};
use crate::error::Result;
use crate::models::{BranchDiff, BranchInfo, RepositoryInfo};

/// List responses wrap their items as `{"count": n, "value": [...]}`.
#[derive(Debug, Deserialize)]
struct ValueList<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitRef {
    name: String,
    #[serde(default)]
    object_id: String,
}

impl From<GitRef> for BranchInfo {
    fn from(git_ref: GitRef) -> Self {
        let name = git_ref
            .name
            .strip_prefix("refs/heads/")
            .unwrap_or(git_ref.name.as_str())
            .to_string();
        BranchInfo {
            name,
            ref_name: git_ref.name,
            object_id: git_ref.object_id,
        }
    }
}

pub struct GitResource<'a> {
    client: &'a AzureDevOpsClient,
}

impl<'a> GitResource<'a> {
    pub fn new(client: &'a AzureDevOpsClient) -> Self {
        Self { client }
    }

    pub fn get_branch_diff(
        &self,
        repository_id: &str,
        base_version: &str,
        target_version: &str,
    ) -> Result<BranchDiff> {
        let endpoint = format!("/_apis/git/repositories/{}/diffs/commits", repository_id);
        self.client.request_json(
            Method::GET,
            &endpoint,
            RequestOptions::query(vec![
                ("baseVersion", base_version.to_string()),
                ("targetVersion", target_version.to_string()),
            ]),
        )
    }

    /// Raw file content at the tip of `branch`. The body is never parsed, so
    /// JSON files come back as their text.
    pub fn get_file_content(&self, repository_id: &str, branch: &str, path: &str) -> Result<Vec<u8>> {
        let endpoint = format!("/_apis/git/repositories/{}/items", repository_id);
        self.client.send(
            Method::GET,
            &endpoint,
            RequestOptions::query(vec![
                ("path", path.to_string()),
                ("versionDescriptor.version", branch.to_string()),
                ("versionDescriptor.versionType", "branch".to_string()),
                ("$format", "octetStream".to_string()),
            ]),
        )
    }

    pub fn get_repositories(&self, project: Option<&str>) -> Result<Vec<RepositoryInfo>> {
        let endpoint = match project {
            Some(project) => format!("/{}/_apis/git/repositories", project),
            None => "/_apis/git/repositories".to_string(),
        };
        let list: ValueList<RepositoryInfo> =
            self.client.request_json(Method::GET, &endpoint, RequestOptions::default())?;
        Ok(list.value)
    }

    pub fn get_branches(&self, repository_id: &str, filter_prefix: Option<&str>) -> Result<Vec<BranchInfo>> {
        let endpoint = format!("/_apis/git/repositories/{}/refs", repository_id);
        let filter = filter_prefix.unwrap_or("heads/").to_string();
        let list: ValueList<GitRef> = self.client.request_json(
            Method::GET,
            &endpoint,
            RequestOptions::query(vec![("filter", filter)]),
        )?;
        Ok(list.value.into_iter().map(BranchInfo::from).collect())
    }
}

impl GitSource for AzureDevOpsClient {
    fn get_branch_diff(
        &self,
        repository_id: &str,
        base_version: &str,
        target_version: &str,
    ) -> Result<BranchDiff> {
        self.git().get_branch_diff(repository_id, base_version, target_version)
    }

    fn get_file_content(&self, repository_id: &str, git_ref: &str, path: &str) -> Result<FileContent> {
        self.git()
            .get_file_content(repository_id, git_ref, path)
            .map(FileContent::Bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn branch_refs_are_shortened() {
        let refs: ValueList<GitRef> = serde_json::from_value(json!({
            "count": 2,
            "value": [
                {"name": "refs/heads/main", "objectId": "a1b2"},
                {"name": "refs/heads/feature/login", "objectId": "c3d4"}
            ]
        }))
        .unwrap();

        let branches: Vec<BranchInfo> = refs.value.into_iter().map(BranchInfo::from).collect();

        assert_eq!(
            branches[1],
            BranchInfo {
                name: "feature/login".into(),
                ref_name: "refs/heads/feature/login".into(),
                object_id: "c3d4".into(),
            }
        );
        assert_eq!(branches[0].name, "main");
    }

    #[test]
    fn non_branch_refs_keep_full_name() {
        let branch = BranchInfo::from(GitRef {
            name: "refs/tags/v1.0".into(),
            object_id: String::new(),
        });
        assert_eq!(branch.name, "refs/tags/v1.0");
    }

    #[test]
    fn repositories_read_camel_case_fields() {
        let repos: ValueList<RepositoryInfo> = serde_json::from_value(json!({
            "value": [{
                "id": "5febef5a",
                "name": "Fabrikam",
                "defaultBranch": "refs/heads/main",
                "webUrl": "https://dev.azure.com/contoso/_git/Fabrikam",
                "project": {"id": "6ce954b1", "name": "Fabrikam-Fiber", "state": "wellFormed"}
            }]
        }))
        .unwrap();

        let repo = &repos.value[0];
        assert_eq!(repo.default_branch.as_deref(), Some("refs/heads/main"));
        assert_eq!(repo.project.as_ref().map(|p| p.name.as_str()), Some("Fabrikam-Fiber"));

        let out = serde_json::to_value(repo).unwrap();
        assert_eq!(out["default_branch"], "refs/heads/main");
    }

    #[test]
    fn missing_value_is_empty_list() {
        let list: ValueList<GitRef> = serde_json::from_value(json!({})).unwrap();
        assert!(list.value.is_empty());
    }
}
