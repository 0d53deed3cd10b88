use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cadence::api::{create_router, AppState};
use cadence::config::Config;
use cadence::db::{Database, DatabaseBackend, LibSqlBackend};
use cadence::embeddings::{Embedder, EmbeddingProvider};
use cadence::migration::{self, MigrationDecision};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Self-hostable AI memory and pattern-insight engine")]
struct Args {
    /// Accept a changed embedding dimension without the interactive prompt
    #[arg(long)]
    accept_dimension_change: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cadence=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "CADENCE_API_KEYS is not set — protected routes are locked until keys are configured"
        );
    }

    let db: Arc<dyn DatabaseBackend> =
        Arc::new(LibSqlBackend::new(Database::new(&config.database).await?));
    tracing::info!(url = %config.database.url, "database ready");

    let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingProvider::new(&config.embeddings)?);
    tracing::info!(model = %config.embeddings.model, "embedding provider configured");

    match migration::check_dimension_compatibility(&*db, &*embedder, args.accept_dimension_change)
        .await?
    {
        MigrationDecision::NotNeeded => {}
        MigrationDecision::Approved => {
            migration::accept_dimension_change(&*db, embedder.dimensions()).await?;
        }
        MigrationDecision::Rejected => {
            anyhow::bail!(
                "embedding dimension mismatch — rerun with --accept-dimension-change to proceed"
            );
        }
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(config, db, embedder));

    tracing::info!("cadence listening on http://{addr}");
    tracing::info!("  health:  http://{addr}/api/v1/health");
    tracing::info!("  docs:    http://{addr}/api/v1/docs");
    tracing::info!("  openapi: http://{addr}/api/v1/openapi.json");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    }

    tracing::info!("shutdown signal received");
}
