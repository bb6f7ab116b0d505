//! Store trait 定義
//!
//! ゲーム行の保存先（読み取り・挿入・更新・購読）へのインターフェース。
//! UseCase 層はこの trait に依存し、インメモリ実装にもリモート実装にも依存しない。

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{GameState, GameStatePatch, LobbyId, StoreError};

/// 購読者へ行を届けるチャンネル
pub type FeedChannel = mpsc::UnboundedSender<GameState>;

/// 購読の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ロビー行の変更フィード
///
/// 書き込みが成功するたびに、書き込んだクライアント自身を含む全購読者へ新しい行が届く。
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    lobby_id: LobbyId,
    receiver: mpsc::UnboundedReceiver<GameState>,
}

impl Subscription {
    pub fn new(
        id: SubscriptionId,
        lobby_id: LobbyId,
        receiver: mpsc::UnboundedReceiver<GameState>,
    ) -> Self {
        Self {
            id,
            lobby_id,
            receiver,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn lobby_id(&self) -> &LobbyId {
        &self.lobby_id
    }

    /// 次に届いた行を待つ。フィードが閉じられると `None`。
    pub async fn recv(&mut self) -> Option<GameState> {
        self.receiver.recv().await
    }
}

/// GameState Store trait
///
/// 1 ロビーにつき 1 行。書き込みは行単位の後勝ち（`expected_version` 指定時のみ条件付き）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameStateStore: Send + Sync {
    /// 行を取得（存在しなければ `None`）
    async fn get(&self, lobby_id: &LobbyId) -> Result<Option<GameState>, StoreError>;

    /// 行を挿入し、保存された行を返す
    async fn insert(&self, row: GameState) -> Result<GameState, StoreError>;

    /// 行を部分更新
    async fn update(&self, lobby_id: &LobbyId, patch: GameStatePatch) -> Result<(), StoreError>;

    /// 行の変更を購読
    async fn subscribe(&self, lobby_id: &LobbyId) -> Result<Subscription, StoreError>;

    /// 購読を解除
    async fn unsubscribe(&self, subscription: Subscription) -> Result<(), StoreError>;
}

/// 変更通知の配信先を管理する trait
///
/// 購読者ごとのチャンネルを保持し、行が書き込まれたらそのロビーの購読者全員に配信する。
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn register(&self, subscription_id: SubscriptionId, lobby_id: LobbyId, sender: FeedChannel);

    async fn unregister(&self, subscription_id: &SubscriptionId);

    /// `row` のロビーの購読者に配信し、届いた数を返す
    async fn publish(&self, row: &GameState) -> usize;
}
