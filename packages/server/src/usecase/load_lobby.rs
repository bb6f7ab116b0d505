//! UseCase: ロビー行の読み込み
//!
//! ### 何をテストしているか
//! - 行が無ければ作成し、あればそのまま返すこと
//! - 作成が他のクライアントと競合した場合に読み直すこと

use std::sync::Arc;

use sanmoku_shared::time::Clock;

use crate::domain::{GameState, GameStateStore, LobbyConfig, LobbyId, StoreError};

use super::error::LobbyError;

/// 行を取得し、無ければ新しいロビー行を挿入する
pub(crate) async fn load_or_create(
    store: &dyn GameStateStore,
    lobby_id: &LobbyId,
    clock: &dyn Clock,
) -> Result<GameState, StoreError> {
    if let Some(row) = store.get(lobby_id).await? {
        return Ok(row);
    }

    let fresh = GameState::new_lobby(lobby_id.clone(), clock.now_millis());
    match store.insert(fresh).await {
        Ok(row) => Ok(row),
        Err(StoreError::AlreadyExists(_)) => {
            // 他のクライアントが先に作成した
            tracing::debug!("Lobby '{}' was created concurrently, re-reading", lobby_id);
            store
                .get(lobby_id)
                .await?
                .ok_or_else(|| StoreError::NotFound(lobby_id.clone()))
        }
        Err(e) => Err(e),
    }
}

/// ロビー読み込みのユースケース
pub struct LoadLobbyUseCase {
    store: Arc<dyn GameStateStore>,
    config: LobbyConfig,
    clock: Arc<dyn Clock>,
}

impl LoadLobbyUseCase {
    pub fn new(store: Arc<dyn GameStateStore>, config: LobbyConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// ロビー行を返す（初回アクセス時に作成）
    pub async fn execute(&self) -> Result<GameState, LobbyError> {
        let row = load_or_create(self.store.as_ref(), &self.config.lobby_id, self.clock.as_ref())
            .await?;
        Ok(row)
    }
}
