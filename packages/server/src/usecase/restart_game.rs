//! UseCase: 次のゲームの開始
//!
//! 盤面・勝者・引き分けフラグ・手番を初期化する。スコアとプレイヤーはそのまま。

use std::sync::Arc;

use crate::domain::{GameState, GameStateStore, LobbyConfig};

use super::error::LobbyError;

/// リスタートのユースケース
pub struct RestartGameUseCase {
    store: Arc<dyn GameStateStore>,
    config: LobbyConfig,
}

impl RestartGameUseCase {
    pub fn new(store: Arc<dyn GameStateStore>, config: LobbyConfig) -> Self {
        Self { store, config }
    }

    /// リスタートを実行
    ///
    /// 行をまだ受け取っていない場合は何もせず `Ok(false)` を返す。
    /// 決着前でも実行できる（誰でも盤面を消せる）。
    pub async fn execute(&self, last_known: Option<&GameState>) -> Result<bool, LobbyError> {
        let Some(row) = last_known else {
            tracing::debug!("Restart ignored: no game row loaded");
            return Ok(false);
        };

        let mut patch = row.restart_patch();
        patch.expected_version = self.config.write_mode.expected_version(row.version);

        self.store.update(&self.config.lobby_id, patch).await?;
        tracing::info!("Lobby '{}' restarted", self.config.lobby_id);
        Ok(true)
    }
}
