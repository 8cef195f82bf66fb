use std::future::Future;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{
    game_versions_handler, health_handler, verify_link_handler, verify_password_handler,
};
use crate::state::AppState;

/// Upper bound on request bodies; a password request is a few hundred bytes.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/game-versions", get(game_versions_handler))
            .route("/verify-password", post(verify_password_handler))
            .route("/get-link", post(verify_password_handler))
            .route("/verify-link", post(verify_link_handler))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Serves the router on `listener` until `shutdown` completes.
    pub async fn serve(
        listener: TcpListener,
        state: AppState,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        info!(listen_addr = %listener.local_addr()?, "starting gateway server");

        axum::serve(listener, Self::router(state))
            .with_graceful_shutdown(shutdown)
            .await
    }
}
