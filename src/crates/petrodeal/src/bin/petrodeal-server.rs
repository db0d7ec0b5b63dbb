//! PetroDealHub server binary
//!
//! Standalone server providing the REST API, the WebSocket vessel feed and
//! the background vessel simulation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use llm::{remote::OpenAiClient, RemoteLlmConfig};
use tracing_subscriber::EnvFilter;

use petrodeal::api::ws::BroadcastState;
use petrodeal::api::{create_router, AppState};
use petrodeal::config::{LlmSettings, ServerConfig};
use petrodeal::db::repositories::ConfigurationRepository;
use petrodeal::db::seed::seed_reference_data;
use petrodeal::db::DatabaseConnection;
use petrodeal::services::AuthService;
use petrodeal::simulation::BackgroundTasks;
use petrodeal::voyage::{LlmNarrator, VoyageNarrator};

#[derive(Debug, Parser)]
#[command(name = "petrodeal-server", version, about = "PetroDealHub maritime oil-trading API server")]
struct Cli {
    /// Configuration file (defaults to CONFIG_PATH or config/petrodeal-server.toml)
    #[arg(short, long, env = "PETRODEAL_CONFIG")]
    config: Option<PathBuf>,

    /// Insert sample companies, ports, refineries and vessels
    #[arg(long)]
    seed: bool,
}

fn build_narrator(settings: &LlmSettings) -> Option<Arc<dyn VoyageNarrator>> {
    if !settings.enabled {
        tracing::info!("LLM narratives disabled, using template narrator");
        return None;
    }

    let client = RemoteLlmConfig::from_env(&settings.api_key_env, &settings.base_url, &settings.model)
        .map(|config| config.with_timeout(settings.timeout()))
        .and_then(OpenAiClient::new);

    match client {
        Ok(client) => {
            tracing::info!(model = %settings.model, "LLM narratives enabled");
            Some(Arc::new(LlmNarrator::new(Arc::new(client))))
        }
        Err(e) => {
            tracing::warn!("LLM client unavailable, using template narrator: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting {}", petrodeal::version::user_agent());

    let config = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    tracing::info!(
        simulation = config.simulation.enabled,
        llm = config.llm.enabled,
        "Configuration loaded"
    );

    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::with_max_connections(&database_url, config.database.max_connections)
        .await
        .context("connecting to database")?;

    tracing::info!("Running database migrations");
    db.run_migrations().await.context("running migrations")?;
    db.health_check().await.context("database health check")?;

    let pool = db.pool();
    ConfigurationRepository::set(pool, "server.name", &config.server.name, "string").await?;
    let uuid = ConfigurationRepository::get_or_insert(pool, "server.uuid", &uuid::Uuid::new_v4().to_string()).await?;
    tracing::info!("Server name: {} ({})", config.server.name, uuid);

    if cli.seed {
        let report = seed_reference_data(pool).await.context("seeding reference data")?;
        tracing::info!(inserted = report.total(), "Seeded reference data");
    }

    let purged = AuthService::new(config.session.ttl_hours).purge_expired(pool).await?;
    if purged > 0 {
        tracing::info!(purged, "Removed expired sessions");
    }

    let broadcast = BroadcastState::new();
    let tasks = BackgroundTasks::spawn(db.clone(), broadcast.clone(), &config);

    let addr = config.bind_address();
    let mut state = AppState::new(db.clone(), config.clone()).with_broadcast(broadcast);
    if let Some(narrator) = build_narrator(&config.llm) {
        state = state.with_narrator(narrator);
    }
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tasks.shutdown();
    db.close().await;
    tracing::info!("PetroDealHub server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
