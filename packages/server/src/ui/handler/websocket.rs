//! WebSocket change-feed handler.
//!
//! 接続ごとに 1 つの購読を作り、そのロビーに書き込まれた行をすべて push する。
//! クライアントからのメッセージは Close 以外は無視する。

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;

use crate::{
    domain::{LobbyId, Subscription},
    infrastructure::dto::{
        row::GameRowDto,
        websocket::{MessageType, RowUpdatedMessage, SubscribedMessage},
    },
    ui::state::AppState,
};

use super::error::ApiError;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    pub lobby_id: String,
    pub apikey: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubscribeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.is_authorized(query.apikey.as_deref()) {
        return Err(ApiError::unauthorized());
    }
    let lobby_id = LobbyId::new(query.lobby_id)?;

    let subscription = state.store.subscribe(&lobby_id).await?;
    tracing::info!(
        "Subscription {} opened for lobby '{}'",
        subscription.id(),
        lobby_id
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, subscription)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, mut subscription: Subscription) {
    let (mut sender, mut receiver) = socket.split();
    let subscription_id = subscription.id();

    let subscribed = SubscribedMessage {
        r#type: MessageType::Subscribed,
        lobby_id: subscription.lobby_id().to_string(),
        subscription_id: subscription_id.to_string(),
    };
    match serde_json::to_string(&subscribed) {
        Ok(json) => {
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::error!("Failed to send subscribed to {}: {}", subscription_id, e);
                release(&state, subscription).await;
                return;
            }
        }
        Err(e) => tracing::error!("Failed to serialize subscribed message: {}", e),
    }

    loop {
        tokio::select! {
            row = subscription.recv() => {
                let Some(row) = row else { break };
                let message = RowUpdatedMessage {
                    r#type: MessageType::RowUpdated,
                    row: GameRowDto::from(row),
                };
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize row: {}", e);
                        continue;
                    }
                };
                tracing::debug!("Pushing version {} to {}", message.row.version, subscription_id);
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Subscription {} closed by client", subscription_id);
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on {}: {}", subscription_id, e);
                        break;
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    release(&state, subscription).await;
}

async fn release(state: &AppState, subscription: Subscription) {
    let subscription_id = subscription.id();
    match state.store.unsubscribe(subscription).await {
        Ok(()) => tracing::info!("Subscription {} released", subscription_id),
        Err(e) => tracing::warn!("Failed to release subscription {}: {}", subscription_id, e),
    }
}
