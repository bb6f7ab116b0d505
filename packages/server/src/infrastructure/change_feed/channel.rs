//! mpsc チャンネルを使った ChangeFeed 実装
//!
//! ## 責務
//!
//! - 購読者ごとの `UnboundedSender` を管理
//! - 行が書き込まれたら、そのロビーの購読者全員へ配信
//!
//! WebSocket への中継は UI 層（`ui/handler/websocket.rs`）が受信側で行います。
//! この実装は WebSocket を知りません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChangeFeed, FeedChannel, GameState, LobbyId, SubscriptionId};

/// チャンネルを使った ChangeFeed 実装
#[derive(Default)]
pub struct ChannelChangeFeed {
    /// Key: 購読 ID / Value: (購読しているロビー, 配信チャンネル)
    subscribers: Arc<Mutex<HashMap<SubscriptionId, (LobbyId, FeedChannel)>>>,
}

impl ChannelChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の購読者数
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}

#[async_trait]
impl ChangeFeed for ChannelChangeFeed {
    async fn register(&self, subscription_id: SubscriptionId, lobby_id: LobbyId, sender: FeedChannel) {
        let mut subscribers = self.subscribers.lock().await;
        tracing::debug!(
            "Subscription '{}' registered for lobby '{}'",
            subscription_id,
            lobby_id
        );
        subscribers.insert(subscription_id, (lobby_id, sender));
    }

    async fn unregister(&self, subscription_id: &SubscriptionId) {
        let mut subscribers = self.subscribers.lock().await;
        if subscribers.remove(subscription_id).is_some() {
            tracing::debug!("Subscription '{}' unregistered", subscription_id);
        }
    }

    async fn publish(&self, row: &GameState) -> usize {
        let mut subscribers = self.subscribers.lock().await;
        let mut delivered = 0;
        let mut closed = Vec::new();

        for (subscription_id, (lobby_id, sender)) in subscribers.iter() {
            if lobby_id != &row.id {
                continue;
            }
            // 受信側が破棄された購読は配信失敗を許容し、後で取り除く
            if sender.send(row.clone()).is_err() {
                closed.push(*subscription_id);
            } else {
                delivered += 1;
            }
        }

        for subscription_id in closed {
            tracing::warn!(
                "Subscription '{}' is closed, removing it from the feed",
                subscription_id
            );
            subscribers.remove(&subscription_id);
        }

        tracing::debug!(
            "Published lobby '{}' version {} to {} subscriber(s)",
            row.id,
            row.version,
            delivered
        );
        delivered
    }
}
