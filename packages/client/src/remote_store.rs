//! `GameStateStore` backed by the Sanmoku store service.
//!
//! Reads and writes go over HTTP (`reqwest`); `subscribe` opens a WebSocket
//! (`tokio-tungstenite`) and a reader task that forwards every pushed row.
//! Any transport failure is reported as `StoreError::Unavailable`.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{StatusCode, Url};
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use sanmoku_server::{
    domain::{
        GameState, GameStatePatch, GameStateStore, LobbyId, StoreError, Subscription,
        SubscriptionId,
    },
    infrastructure::dto::{
        http::{API_KEY_HEADER, ErrorDto},
        row::{GameRowDto, GameRowPatchDto},
        websocket::{RowUpdatedMessage, SubscribedMessage},
    },
};

use crate::error::ClientError;

/// Remote store client
pub struct RemoteGameStateStore {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    /// Key: 購読 ID / Value: WebSocket を読むタスク
    readers: Arc<Mutex<HashMap<SubscriptionId, JoinHandle<()>>>>,
}

fn unavailable(err: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl RemoteGameStateStore {
    /// Create a client for the service at `base_url` (e.g. `http://127.0.0.1:8080`)
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            readers: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    fn lobby_url(&self, lobby_id: Option<&LobbyId>) -> Result<Url, StoreError> {
        let path = match lobby_id {
            Some(id) => format!("api/lobbies/{}", id),
            None => "api/lobbies".to_string(),
        };
        self.base_url.join(&path).map_err(unavailable)
    }

    fn feed_url(&self, lobby_id: &LobbyId) -> Result<Url, StoreError> {
        let mut url = self.base_url.join("ws").map_err(unavailable)?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| unavailable(format!("cannot use scheme {}", scheme)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("lobby_id", lobby_id.as_str());
            if let Some(key) = &self.api_key {
                query.append_pair(API_KEY_HEADER, key);
            }
        }
        Ok(url)
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// 購読中の WebSocket の数
    pub async fn active_subscriptions(&self) -> usize {
        self.readers.lock().await.len()
    }
}

/// Map a non-success response to a `StoreError`
async fn error_from_response(
    response: reqwest::Response,
    lobby_id: &LobbyId,
    expected_version: Option<u64>,
) -> StoreError {
    let status = response.status();
    let body = response.json::<ErrorDto>().await.ok();
    let message = body
        .as_ref()
        .map(|b| b.error.clone())
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(lobby_id.clone()),
        StatusCode::CONFLICT => match (expected_version, body.and_then(|b| b.current_version)) {
            (Some(expected), Some(actual)) => StoreError::VersionConflict { expected, actual },
            _ => StoreError::AlreadyExists(lobby_id.clone()),
        },
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
            StoreError::InvalidRow(message)
        }
        _ => StoreError::Unavailable(format!("{}: {}", status, message)),
    }
}

#[async_trait]
impl GameStateStore for RemoteGameStateStore {
    async fn get(&self, lobby_id: &LobbyId) -> Result<Option<GameState>, StoreError> {
        let url = self.lobby_url(Some(lobby_id))?;
        let response = self
            .with_key(self.http.get(url))
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            StatusCode::OK => {
                let dto: GameRowDto = response.json().await.map_err(unavailable)?;
                Ok(Some(GameState::try_from(dto)?))
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from_response(response, lobby_id, None).await),
        }
    }

    async fn insert(&self, row: GameState) -> Result<GameState, StoreError> {
        let lobby_id = row.id.clone();
        let url = self.lobby_url(None)?;
        let response = self
            .with_key(self.http.post(url))
            .json(&GameRowDto::from(row))
            .send()
            .await
            .map_err(unavailable)?;

        if response.status() == StatusCode::CREATED {
            let dto: GameRowDto = response.json().await.map_err(unavailable)?;
            return GameState::try_from(dto);
        }
        Err(error_from_response(response, &lobby_id, None).await)
    }

    async fn update(&self, lobby_id: &LobbyId, patch: GameStatePatch) -> Result<(), StoreError> {
        let expected_version = patch.expected_version;
        let url = self.lobby_url(Some(lobby_id))?;
        let response = self
            .with_key(self.http.patch(url))
            .json(&GameRowPatchDto::from(patch))
            .send()
            .await
            .map_err(unavailable)?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(error_from_response(response, lobby_id, expected_version).await)
    }

    async fn subscribe(&self, lobby_id: &LobbyId) -> Result<Subscription, StoreError> {
        let url = self.feed_url(lobby_id)?;
        let (mut ws_stream, _response) = connect_async(url.as_str()).await.map_err(unavailable)?;

        // サーバーが購読を登録するまで待つ（これ以降の書き込みは必ず届く）
        let server_id = loop {
            match ws_stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let message: SubscribedMessage =
                        serde_json::from_str(text.as_str()).map_err(unavailable)?;
                    break message.subscription_id;
                }
                Some(Ok(Message::Close(_))) | None => {
                    return Err(unavailable("change feed closed before subscribing"));
                }
                Some(Err(e)) => return Err(unavailable(e)),
                Some(Ok(_)) => {}
            }
        };

        let id = SubscriptionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        tracing::debug!("Subscribed to lobby '{}' (server id {})", lobby_id, server_id);

        // 登録が終わるまでロックを保持し、先に終了したタスクの削除と順序が入れ替わらないようにする
        let mut readers = self.readers.lock().await;
        let registry = self.readers.clone();
        let reader = tokio::spawn(async move {
            while let Some(message) = ws_stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        let row = serde_json::from_str::<RowUpdatedMessage>(text.as_str())
                            .map_err(|e| e.to_string())
                            .and_then(|m| GameState::try_from(m.row).map_err(|e| e.to_string()));
                        match row {
                            Ok(row) => {
                                if tx.send(row).is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!("Ignoring unreadable pushed row: {}", e),
                        }
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!("Server closed the change feed");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Change feed read error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            registry.lock().await.remove(&id);
        });
        readers.insert(id, reader);
        drop(readers);

        Ok(Subscription::new(id, lobby_id.clone(), rx))
    }

    async fn unsubscribe(&self, subscription: Subscription) -> Result<(), StoreError> {
        if let Some(reader) = self.readers.lock().await.remove(&subscription.id()) {
            reader.abort();
        }
        Ok(())
    }
}
