//! Route definitions for the Vault HTTP API.
//!
//! Authenticated routes are mounted under `/api`; share redemption lives
//! under `/shared` so share URLs stay short. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(share_routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(shared_routes())
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}

/// Account endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(handlers::auth::sign_up))
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
        .route(
            "/auth/me",
            get(handlers::auth::me).put(handlers::auth::update_me),
        )
        .route("/users", get(handlers::auth::list_users))
}

/// File upload, download, versions
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            get(handlers::file::list_files).post(handlers::file::upload_file),
        )
        .route(
            "/files/{id}",
            get(handlers::file::get_file).delete(handlers::file::delete_file),
        )
        .route("/files/{id}/view", get(handlers::file::view_file))
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/versions", get(handlers::file::list_versions))
        .route(
            "/files/{id}/versions/{version_id}/download",
            get(handlers::file::download_version),
        )
}

/// Share management
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files/{id}/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route(
            "/shares/{id}",
            axum::routing::delete(handlers::share::revoke_share),
        )
}

/// Public share access (no auth required)
fn shared_routes() -> Router<AppState> {
    Router::new()
        .route("/shared/{token}", get(handlers::shared::resolve_share))
        .route(
            "/shared/{token}/download",
            get(handlers::shared::download_shared),
        )
}
