//! API route handlers - maps HTTP endpoints to Azure DevOps operations.
//!
//! Each submodule defines routes for a feature area:
//! - `repositories`: Repository and branch listing
//! - `changes`: Pull request change digest for the tool layer

pub mod changes;
pub mod repositories;

use axum::Router;

use crate::azure::SharedClient;
use crate::error::{AppError, Result};

pub fn create_router(client: SharedClient) -> Router {
    Router::new()
        .merge(repositories::routes(client.clone()))
        .merge(changes::routes(client))
}

/// Run a blocking upstream call off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Worker task failed: {}", e)))?
}
