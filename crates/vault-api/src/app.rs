//! Application builder: wires stores, services, router and middleware into
//! an Axum app, and runs the server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use vault_auth::{AuthProvider, LocalAuthProvider};
use vault_core::config::AppConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_database::Repositories;
use vault_service::{AccessService, FileService, ShareService, UploadService, VersionService};
use vault_storage::build_blob_store;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Connect the configured stores and construct every service.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    info!(
        database = %config.database.provider,
        storage = %config.storage.provider,
        "Initializing stores"
    );
    let repositories = Repositories::from_config(&config.database).await?;
    let blobs = build_blob_store(&config.storage).await?;

    let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(
        Arc::clone(&repositories.users),
        &config.auth,
    ));

    let file_service = Arc::new(FileService::new(
        Arc::clone(&repositories.files),
        Arc::clone(&blobs),
    ));
    let upload_service = Arc::new(UploadService::new(
        Arc::clone(&repositories.files),
        Arc::clone(&blobs),
        config.storage.clone(),
    ));
    let version_service = Arc::new(VersionService::new(
        Arc::clone(&repositories.files),
        Arc::clone(&blobs),
    ));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&repositories.files),
        Arc::clone(&repositories.shares),
        config.share.clone(),
    ));
    let access_service = Arc::new(AccessService::new(
        Arc::clone(&repositories.files),
        Arc::clone(&repositories.shares),
        Arc::clone(&blobs),
    ));

    Ok(AppState {
        config: Arc::new(config),
        repositories,
        blobs,
        auth,
        file_service,
        upload_service,
        version_service,
        share_service,
        access_service,
    })
}

/// Runs the Vault server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting Vault v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.server.bind_address();
    let purge_interval = config.share.purge_interval_minutes;
    let state = build_state(config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let purge_handle = if purge_interval > 0 {
        let share_service = Arc::clone(&state.share_service);
        let interval = Duration::from_secs(purge_interval * 60);
        Some(tokio::spawn(async move {
            share_service.run_purge_loop(interval, shutdown_rx).await;
        }))
    } else {
        None
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Vault server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = purge_handle {
        if let Err(e) = handle.await {
            error!(error = %e, "Purge task ended abnormally");
        }
    }

    info!("Vault server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
