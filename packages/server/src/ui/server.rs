//! Store service: router construction and the serve loop.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::domain::GameStateStore;

use super::{
    handler::{get_lobby, health_check, insert_lobby, update_lobby, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the store service router
///
/// Exposed separately from [`Server::run`] so tests can serve it on an ephemeral port.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // 変更フィード
        .route("/ws", get(websocket_handler))
        // 行の読み書き
        .route("/api/health", get(health_check))
        .route("/api/lobbies", post(insert_lobby))
        .route("/api/lobbies/{lobby_id}", get(get_lobby).patch(update_lobby))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Lobby store server
///
/// # Example
///
/// ```ignore
/// let feed = Arc::new(ChannelChangeFeed::new());
/// let store = Arc::new(InMemoryGameStateStore::new(feed));
/// Server::new(store, None).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    store: Arc<dyn GameStateStore>,
    api_key: Option<String>,
}

impl Server {
    /// サーバーを作成
    ///
    /// # Arguments
    ///
    /// * `store` - Store backing every lobby row
    /// * `api_key` - Key clients must present, or `None` to accept every request
    pub fn new(store: Arc<dyn GameStateStore>, api_key: Option<String>) -> Self {
        Self { store, api_key }
    }

    /// Run the server until Ctrl+C
    ///
    /// # Errors
    ///
    /// Bind or serve failures.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        if self.api_key.is_none() {
            tracing::warn!("No API key configured; every request will be accepted");
        }
        let app = build_router(Arc::new(AppState::new(self.store, self.api_key)));

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Sanmoku store listening on {}", listener.local_addr()?);
        tracing::info!("Change feed: ws://{}/ws?lobby_id=<lobby>", bind_addr);
        tracing::info!("Stop with Ctrl+C");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Sanmoku store stopped");

        Ok(())
    }
}
