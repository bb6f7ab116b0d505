//! UseCase: 着手処理（ターン制御）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ApplyMoveUseCase::execute() メソッド
//! - 前提条件（セッション・行・未決着・手番・空きマス）を満たさない着手は黙って無視されること
//! - 勝利・引き分けの判定、スコア加算、手番の交代が 1 回の書き込みで行われること
//!
//! ### 既知の競合
//! 前提条件はクライアントが最後に受け取った行で判定する。その行が古ければ、
//! 2 つのクライアントが同じ手番で書き込むことがあり得る（後勝ち）。

use std::sync::Arc;

use crate::domain::{
    CellPosition, GameState, GameStateStore, LobbyConfig, Mark, MoveRejection, PlayerSession,
};

use super::error::LobbyError;

/// 着手の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// 書き込んだ。反映は Store からの配信を待つ。
    Applied { winner: Option<Mark>, is_draw: bool },
    /// 前提条件を満たさないため何もしなかった
    Ignored(MoveRejection),
}

/// 着手のユースケース
pub struct ApplyMoveUseCase {
    store: Arc<dyn GameStateStore>,
    config: LobbyConfig,
}

impl ApplyMoveUseCase {
    pub fn new(store: Arc<dyn GameStateStore>, config: LobbyConfig) -> Self {
        Self { store, config }
    }

    /// 着手を実行
    ///
    /// # Arguments
    ///
    /// * `session` - このクライアントのセッション（未参加なら `None`）
    /// * `last_known` - このクライアントが最後に受け取った行
    /// * `pos` - 選んだマス
    pub async fn execute(
        &self,
        session: Option<&PlayerSession>,
        last_known: Option<&GameState>,
        pos: CellPosition,
    ) -> Result<MoveOutcome, LobbyError> {
        let Some(session) = session else {
            return Ok(ignored(MoveRejection::NoSession));
        };
        let Some(row) = last_known else {
            return Ok(ignored(MoveRejection::NoGame));
        };

        let mut patch = match row.move_patch(session.mark, pos) {
            Ok(patch) => patch,
            Err(reason) => return Ok(ignored(reason)),
        };
        patch.expected_version = self.config.write_mode.expected_version(row.version);

        let winner = patch.winner.flatten();
        let is_draw = patch.is_draw.unwrap_or(false);

        self.store.update(&self.config.lobby_id, patch).await?;
        tracing::info!(
            "{} played {} in lobby '{}'",
            session.mark,
            pos,
            self.config.lobby_id
        );

        Ok(MoveOutcome::Applied { winner, is_draw })
    }
}

fn ignored(reason: MoveRejection) -> MoveOutcome {
    tracing::debug!("Move ignored: {}", reason);
    MoveOutcome::Ignored(reason)
}
