//! InMemory GameState Store 実装
//!
//! ドメイン層が定義する `GameStateStore` trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、書き込みのたびに ChangeFeed へ配信します。
//!
//! 行の検証はここ（Store の境界）で行います。不変条件を満たさない行は保存されません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{
    ChangeFeed, GameState, GameStatePatch, GameStateStore, LobbyId, StoreError, Subscription,
    SubscriptionId,
};

/// インメモリ GameState Store 実装
pub struct InMemoryGameStateStore {
    /// Key: ロビー ID / Value: ゲーム行
    rows: Arc<Mutex<HashMap<LobbyId, GameState>>>,
    change_feed: Arc<dyn ChangeFeed>,
}

impl InMemoryGameStateStore {
    pub fn new(change_feed: Arc<dyn ChangeFeed>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
            change_feed,
        }
    }

    /// 保存されている行の数
    pub async fn count_rows(&self) -> usize {
        self.rows.lock().await.len()
    }
}

#[async_trait]
impl GameStateStore for InMemoryGameStateStore {
    async fn get(&self, lobby_id: &LobbyId) -> Result<Option<GameState>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.get(lobby_id).cloned())
    }

    async fn insert(&self, mut row: GameState) -> Result<GameState, StoreError> {
        row.validate()?;

        let mut rows = self.rows.lock().await;
        if rows.contains_key(&row.id) {
            return Err(StoreError::AlreadyExists(row.id));
        }
        row.version = 1;
        rows.insert(row.id.clone(), row.clone());
        tracing::info!("Lobby '{}' created", row.id);

        // 配信順が書き込み順と一致するよう、ロックを保持したまま配信する
        self.change_feed.publish(&row).await;
        Ok(row)
    }

    async fn update(&self, lobby_id: &LobbyId, patch: GameStatePatch) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        let current = rows
            .get(lobby_id)
            .ok_or_else(|| StoreError::NotFound(lobby_id.clone()))?;

        let next = current.apply_patch(patch)?;
        tracing::debug!("Lobby '{}' updated to version {}", lobby_id, next.version);
        rows.insert(lobby_id.clone(), next.clone());

        self.change_feed.publish(&next).await;
        Ok(())
    }

    async fn subscribe(&self, lobby_id: &LobbyId) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriptionId::generate();
        self.change_feed.register(id, lobby_id.clone(), tx).await;
        Ok(Subscription::new(id, lobby_id.clone(), rx))
    }

    async fn unsubscribe(&self, subscription: Subscription) -> Result<(), StoreError> {
        self.change_feed.unregister(&subscription.id()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{GameStatus, Mark, Scores},
        infrastructure::change_feed::ChannelChangeFeed,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 行の取得・挿入・部分更新・購読
    // - Store の境界での行の検証
    //
    // 【どのようなシナリオをテストするか】
    // 1. 存在しない行の取得は None
    // 2. 挿入した行の取得、二重挿入はエラー
    // 3. 更新は全購読者（書き手自身を含む）へ配信される
    // 4. 不正な行・版番号の競合は保存されない
    // ========================================

    fn create_test_store() -> (InMemoryGameStateStore, Arc<ChannelChangeFeed>) {
        let feed = Arc::new(ChannelChangeFeed::new());
        (InMemoryGameStateStore::new(feed.clone()), feed)
    }

    fn new_row() -> GameState {
        GameState::new_lobby(LobbyId::default(), 1000)
    }

    #[tokio::test]
    async fn test_get_missing_row_returns_none() {
        // テスト項目: 存在しないロビーの取得は None を返す
        let (store, _feed) = create_test_store();
        let result = store.get(&LobbyId::default()).await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        // テスト項目: 挿入した行を取得でき、版番号は 1 になる
        // given (前提条件):
        let (store, _feed) = create_test_store();

        // when (操作):
        let inserted = store.insert(new_row()).await.unwrap();
        let fetched = store.get(&LobbyId::default()).await.unwrap();

        // then (期待する結果):
        assert_eq!(inserted.version, 1);
        assert_eq!(fetched, Some(inserted));
        assert_eq!(store.count_rows().await, 1);
    }

    #[tokio::test]
    async fn test_insert_twice_is_rejected() {
        // テスト項目: 同じロビーの二重挿入は AlreadyExists
        // given (前提条件):
        let (store, _feed) = create_test_store();
        store.insert(new_row()).await.unwrap();

        // when (操作):
        let result = store.insert(new_row()).await;

        // then (期待する結果):
        assert_eq!(result, Err(StoreError::AlreadyExists(LobbyId::default())));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        // テスト項目: 存在しない行の更新は NotFound
        let (store, _feed) = create_test_store();
        let result = store
            .update(&LobbyId::default(), GameStatePatch::default())
            .await;
        assert_eq!(result, Err(StoreError::NotFound(LobbyId::default())));
    }

    #[tokio::test]
    async fn test_update_is_pushed_to_every_subscriber() {
        // テスト項目: 更新された行は全購読者へ配信される
        // given (前提条件):
        let (store, _feed) = create_test_store();
        store.insert(new_row()).await.unwrap();
        let mut first = store.subscribe(&LobbyId::default()).await.unwrap();
        let mut second = store.subscribe(&LobbyId::default()).await.unwrap();

        // when (操作):
        store
            .update(
                &LobbyId::default(),
                GameStatePatch {
                    status: Some(GameStatus::Ongoing),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // then (期待する結果):
        let pushed_first = first.recv().await.unwrap();
        let pushed_second = second.recv().await.unwrap();
        assert_eq!(pushed_first.status, GameStatus::Ongoing);
        assert_eq!(pushed_first.version, 2);
        assert_eq!(pushed_first, pushed_second);
    }

    #[tokio::test]
    async fn test_invalid_patch_is_not_stored() {
        // テスト項目: 盤面と矛盾する勝者を書き込もうとすると拒否され、行は変わらない
        // given (前提条件):
        let (store, _feed) = create_test_store();
        let before = store.insert(new_row()).await.unwrap();

        // when (操作):
        let result = store
            .update(
                &LobbyId::default(),
                GameStatePatch {
                    winner: Some(Some(Mark::X)),
                    scores: Some(Scores { x: 1, o: 0 }),
                    ..Default::default()
                },
            )
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::InvalidRow(_))));
        assert_eq!(store.get(&LobbyId::default()).await.unwrap(), Some(before));
    }

    #[tokio::test]
    async fn test_version_checked_update_conflict() {
        // テスト項目: 古い版を前提にした条件付き更新は競合になる
        // given (前提条件):
        let (store, _feed) = create_test_store();
        store.insert(new_row()).await.unwrap();
        store
            .update(
                &LobbyId::default(),
                GameStatePatch {
                    status: Some(GameStatus::Ongoing),
                    expected_version: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // when (操作): 版 1 を前提にもう一度更新
        let result = store
            .update(
                &LobbyId::default(),
                GameStatePatch {
                    status: Some(GameStatus::Waiting),
                    expected_version: Some(1),
                    ..Default::default()
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(StoreError::VersionConflict {
                expected: 1,
                actual: 2
            })
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_releases_feed() {
        // テスト項目: 購読解除でフィードから登録が外れる
        // given (前提条件):
        let (store, feed) = create_test_store();
        let subscription = store.subscribe(&LobbyId::default()).await.unwrap();
        assert_eq!(feed.subscriber_count().await, 1);

        // when (操作):
        store.unsubscribe(subscription).await.unwrap();

        // then (期待する結果):
        assert_eq!(feed.subscriber_count().await, 0);
    }
}
