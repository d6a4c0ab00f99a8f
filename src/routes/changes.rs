//! Pull request change digest endpoint.
//!
//! GET /api/v1/repositories/{repository_id}/pr-changes?source=&target=&max_files=
//!
//! Returns the per-file change summary between the PR's target and source
//! branches. A failed branch diff still answers 200 with `{"error": "..."}`,
//! which is what the tool layer checks for.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::azure::SharedClient;
use crate::changes::{self, DEFAULT_MAX_FILES};
use crate::error::Result;
use crate::models::PrChanges;
use crate::routes::run_blocking;

pub fn routes(client: SharedClient) -> Router {
    Router::new()
        .route("/api/v1/repositories/{repository_id}/pr-changes", get(get_pr_changes))
        .with_state(client)
}

#[derive(Debug, Deserialize)]
struct PrChangesQuery {
    source: String,
    target: String,
    max_files: Option<usize>,
}

async fn get_pr_changes(
    State(client): State<SharedClient>,
    Path(repository_id): Path<String>,
    Query(query): Query<PrChangesQuery>,
) -> Result<Json<PrChanges>> {
    let max_files = query.max_files.unwrap_or(DEFAULT_MAX_FILES);
    let result = run_blocking(move || {
        Ok(changes::get_pr_changes(
            client.as_ref(),
            &repository_id,
            &query.source,
            &query.target,
            max_files,
        ))
    })
    .await?;
    Ok(Json(result))
}
