use std::net::SocketAddr;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use oipet_api::api::handlers::initialize_server_start_time;
use oipet_api::api::{create_app, AppState};
use oipet_api::config::{AppConfig, StorageKind};
use oipet_data::database::{initialize_database_pool, DatabasePool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting OiPet Saúde API server");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let pool = open_storage(&config);

    initialize_server_start_time();

    let state = AppState::new(pool, config.auth.clone(), config.environment.clone());
    let app = create_app(state, config.cors_allow_origin.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Open the configured store. A SQLite failure falls back to in-memory storage.
fn open_storage(config: &AppConfig) -> Option<DatabasePool> {
    match config.storage {
        StorageKind::Memory => {
            info!("Using in-memory storage");
            None
        }
        StorageKind::Sqlite => match initialize_database_pool(&config.database) {
            Ok(pool) => {
                info!("Database pool initialized successfully");
                Some(pool)
            }
            Err(e) => {
                error!("Failed to initialize database pool: {}", e);
                warn!("Falling back to in-memory storage");
                None
            }
        },
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
