//! Repository and branch listing endpoints.
//!
//! - GET /api/v1/repositories?project=
//!   Lists git repositories in the organization, or in one project.
//!
//! - GET /api/v1/repositories/{repository_id}/branches?filter=
//!   Lists branches (refs under `heads/` unless another filter is given).

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::azure::SharedClient;
use crate::error::Result;
use crate::models::{BranchInfo, RepositoryInfo};
use crate::routes::run_blocking;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route("/api/v1/repositories", get(list_repositories))
        .route("/api/v1/repositories/{repository_id}/branches", get(list_branches))
        .with_state(client)
}

#[derive(Debug, Deserialize)]
struct RepositoriesQuery {
    project: Option<String>,
}

async fn list_repositories(
    State(client): State<SharedClient>,
    Query(query): Query<RepositoriesQuery>,
) -> Result<Json<Vec<RepositoryInfo>>> {
    let repositories =
        run_blocking(move || client.git().get_repositories(query.project.as_deref())).await?;
    Ok(Json(repositories))
}

#[derive(Debug, Deserialize)]
struct BranchesQuery {
    filter: Option<String>,
}

async fn list_branches(
    State(client): State<SharedClient>,
    Path(repository_id): Path<String>,
    Query(query): Query<BranchesQuery>,
) -> Result<Json<Vec<BranchInfo>>> {
    let branches = run_blocking(move || {
        client
            .git()
            .get_branches(&repository_id, query.filter.as_deref())
    })
    .await?;
    Ok(Json(branches))
}
