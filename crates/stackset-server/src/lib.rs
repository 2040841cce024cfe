pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use stackset_core::StackSetService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(service: Arc<StackSetService>) -> Router {
    let app_state = state::AppState::new(service);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard
        .route("/api/stacksets", get(routes::dashboard::get_dashboard))
        // Organization
        .route(
            "/get_organization_accounts",
            get(routes::accounts::get_organization_accounts),
        )
        // Actions
        .route(
            "/add_undeployed_accounts",
            post(routes::actions::add_undeployed_accounts),
        )
        .route(
            "/remove_suspended_accounts",
            post(routes::actions::remove_suspended_accounts),
        )
        .route(
            "/retry_failed_instances",
            post(routes::actions::retry_failed_instances),
        )
        .route(
            "/retry_drifted_instances",
            post(routes::actions::retry_drifted_instances),
        )
        // Instance listings
        .route(
            "/get_in_sync_instances",
            post(routes::instances::get_in_sync_instances),
        )
        .route(
            "/get_drifted_instances",
            post(routes::instances::get_drifted_instances),
        )
        .route(
            "/get_succeeded_instances",
            post(routes::instances::get_succeeded_instances),
        )
        .route(
            "/get_failed_instances",
            post(routes::instances::get_failed_instances),
        )
        .route(
            "/get_skipped_suspended_account_instances",
            post(routes::instances::get_skipped_suspended_account_instances),
        )
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the dashboard server on `addr` (e.g. `0.0.0.0:1980`).
pub async fn serve(
    service: Arc<StackSetService>,
    addr: &str,
    open_browser: bool,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(service, listener, open_browser).await
}

/// Start the dashboard server on a pre-bound listener.
///
/// Accepts a `TcpListener` that was already bound so the caller can read the
/// actual port before starting (useful when `port = 0`).
pub async fn serve_on(
    service: Arc<StackSetService>,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(service);

    tracing::info!("StackSet dashboard listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
