//! UseCase: プレイヤー退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveGameUseCase::execute() メソッド
//! - 参加者の削除、人数に応じた状態の更新、冪等性
//!
//! ### どのような状況を想定しているか
//! - 正常系：対戦中に 1 人抜けると待機中に戻る
//! - エッジケース：未登録のセッション、行が存在しない（どちらも何もしない）

use std::sync::Arc;

use crate::domain::{GameStateStore, LobbyConfig, SessionId};

use super::error::LobbyError;

/// プレイヤー退出のユースケース
pub struct LeaveGameUseCase {
    store: Arc<dyn GameStateStore>,
    config: LobbyConfig,
}

impl LeaveGameUseCase {
    pub fn new(store: Arc<dyn GameStateStore>, config: LobbyConfig) -> Self {
        Self { store, config }
    }

    /// 退出を実行
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 参加者から削除した
    /// * `Ok(false)` - 削除対象が無かった（書き込みは行わない）
    pub async fn execute(&self, session_id: &SessionId) -> Result<bool, LobbyError> {
        let Some(row) = self.store.get(&self.config.lobby_id).await? else {
            return Ok(false);
        };

        let Some(mut patch) = row.leave_patch(session_id) else {
            tracing::debug!(
                "Session '{}' is not in lobby '{}', nothing to remove",
                session_id,
                self.config.lobby_id
            );
            return Ok(false);
        };
        patch.expected_version = self.config.write_mode.expected_version(row.version);

        self.store.update(&self.config.lobby_id, patch).await?;
        tracing::info!(
            "Session '{}' left lobby '{}'",
            session_id,
            self.config.lobby_id
        );
        Ok(true)
    }
}
