//! Azure DevOps PR change digest - summarizes a pull request's file changes
//! for LLM consumption.
//!
//! # Usage
//! ```bash
//! azdo-pr-changes                                   # Start server
//! azdo-pr-changes --port 8080                       # Start on another port
//! azdo-pr-changes changes <REPO_ID> --source feature/x --target main
//! ```
//!
//! Connection settings come from `--org-url`/`--token` or the
//! `AZURE_ORGANIZATION_URL`/`AZURE_PERSONAL_ACCESS_TOKEN` environment
//! variables (a `.env` file is honoured).

mod azure;
mod changes;
mod config;
mod error;
mod models;
mod routes;

use std::sync::Arc;

use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use azure::{AzureDevOpsClient, SharedClient};
use changes::DEFAULT_MAX_FILES;
use config::{AzureArgs, AzureConfig};
use models::PrChanges;

/// Azure DevOps PR change digest - serve or print pull request change summaries
#[derive(Parser)]
#[command(name = "azdo-pr-changes")]
#[command(about = "Summarize Azure DevOps pull request changes for LLM tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    azure: AzureArgs,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the change summary between two branches as JSON
    Changes {
        /// Repository ID or name
        #[arg(value_name = "REPOSITORY_ID")]
        repository_id: String,

        /// Branch containing the changes
        #[arg(short, long)]
        source: String,

        /// Branch the changes would merge into
        #[arg(short, long)]
        target: String,

        /// Maximum number of files to include
        #[arg(long, default_value_t = DEFAULT_MAX_FILES)]
        max_files: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr so `changes` output stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match AzureConfig::from_args(&cli.azure) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ {}", e);
            eprintln!("  Pass --org-url and --token, or set them in the environment or a .env file");
            std::process::exit(1);
        }
    };

    // Built outside the async runtime: the blocking client must not be
    // created or dropped on an executor thread.
    let client = AzureDevOpsClient::new(config)?;

    match cli.command {
        Some(Commands::Changes {
            repository_id,
            source,
            target,
            max_files,
        }) => {
            let result = changes::get_pr_changes(&client, &repository_id, &source, &target, max_files);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if matches!(result, PrChanges::Failed { .. }) {
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(Arc::new(client.clone()), cli.port))
        }
    }
}

async fn serve(client: SharedClient, port: u16) -> anyhow::Result<()> {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(client))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Bind to the port
    let addr = format!("127.0.0.1:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    let url = format!("http://{}", addr);
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │         Azure DevOps PR change digest       │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Server: {}", url);
    println!();
    println!("  Endpoints:");
    println!("    GET /api/v1/repositories?project=");
    println!("    GET /api/v1/repositories/{{id}}/branches");
    println!("    GET /api/v1/repositories/{{id}}/pr-changes?source=&target=&max_files=");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
