use std::sync::Arc;

use notes_api::{app, config, repository::PgNoteStore, service::NoteService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notes_api=info,tower_http=info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });

    // Store creation and migration
    let store = PgNoteStore::new(&cfg.database_dsn, cfg.pool_size).unwrap_or_else(|e| {
        tracing::error!("Failed to create database pool: {e}");
        panic!("failed to create database pool: {e}");
    });

    store.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation
    let service = Arc::new(NoteService::new(Arc::new(store)));

    // Router config
    let router = app(service, &cfg).unwrap_or_else(|e| {
        tracing::error!("Invalid HTTP configuration: {e}");
        panic!("invalid HTTP configuration: {e}");
    });

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind {}: {e}", cfg.listen_addr);
            panic!("failed to bind {}: {e}", cfg.listen_addr);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Notes API starting, listening on {}", addr),
        Err(_) => tracing::info!("Notes API starting, listening on {}", cfg.listen_addr),
    }

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("HTTP server error: {e}");
    }

    tracing::info!("Notes API stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
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
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
