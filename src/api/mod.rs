//! Web API module for Taskflow

pub mod error;
pub mod handlers;
pub mod state;

use axum::{routing::get, Router};
use std::path::PathBuf;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub use state::AppState;

/// Create the API router
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        // Tasks API
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        // Stats API
        .route("/stats", get(handlers::stats::get_stats))
        // Auxiliary feeds
        .route("/quote", get(handlers::quote::get_quote))
        .route("/weather", get(handlers::weather::get_weather))
        .route("/version", get(handlers::version::get_version))
}

/// Create the full router with static file serving
pub fn create_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest("/api", create_api_router())
        .with_state(state);

    // Add static file serving if directory is provided
    let router = if let Some(dir) = static_dir {
        let index_file = dir.join("index.html");
        let serve_dir = ServeDir::new(&dir).not_found_service(ServeFile::new(&index_file));
        router.fallback_service(serve_dir)
    } else {
        router
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// Resolve when Ctrl+C is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Start the web server (API + optional static files)
pub async fn start_server(
    host: &str,
    port: u16,
    state: AppState,
    static_dir: Option<PathBuf>,
) -> std::io::Result<()> {
    if let Some(dir) = &static_dir {
        tracing::info!(dir = %dir.display(), "serving static client files");
    } else {
        tracing::info!("no static directory configured, API only mode");
    }

    let app = create_router(state, static_dir);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Taskflow server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(std::io::Error::other)
}
