//! UseCase: プレイヤー参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGameUseCase::execute() メソッド
//! - マークの重複チェック、セッション ID の発行、状態の遷移
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目は待機中、2 人目で対戦中
//! - 異常系：使用中のマークでの参加、Store の障害
//!
//! ### 既知の競合
//! 読み取りから書き込みまでの間に別のクライアントが同じマークで参加しても、
//! 後勝ちモードでは検出しない（後から書いた側の `players` で上書きされる）。
//! `WriteMode::VersionChecked` ではこの場合 Store が `VersionConflict` を返す。

use std::sync::Arc;

use sanmoku_shared::time::Clock;

use crate::domain::{
    DisplayName, GameStateStore, LobbyConfig, Mark, PlayerSession, SessionIdFactory,
};

use super::{error::JoinError, load_lobby::load_or_create};

/// プレイヤー参加のユースケース
pub struct JoinGameUseCase {
    store: Arc<dyn GameStateStore>,
    config: LobbyConfig,
    clock: Arc<dyn Clock>,
}

impl JoinGameUseCase {
    pub fn new(store: Arc<dyn GameStateStore>, config: LobbyConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// 参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(PlayerSession)` - 参加成功（このクライアントのセッション）
    /// * `Err(JoinError::MarkTaken)` - マークが既に使われている（行は変更しない）
    /// * `Err(JoinError::StoreUnavailable)` - Store の読み書きに失敗
    /// * `Err(JoinError::Rejected)` - Store が書き込みを拒否（版の競合など）
    pub async fn execute(
        &self,
        display_name: DisplayName,
        requested_mark: Mark,
    ) -> Result<PlayerSession, JoinError> {
        // 1. 最新の行を読む
        let row = load_or_create(
            self.store.as_ref(),
            &self.config.lobby_id,
            self.clock.as_ref(),
        )
        .await?;

        // 2. セッションを発行してパッチを作る（マークの重複はここで検出）
        let session = PlayerSession {
            session_id: SessionIdFactory::generate(self.clock.as_ref()),
            display_name,
            mark: requested_mark,
        };
        let mut patch = row
            .join_patch(session.as_player())
            .map_err(JoinError::MarkTaken)?;
        patch.expected_version = self.config.write_mode.expected_version(row.version);

        // 3. 書き込む
        self.store.update(&self.config.lobby_id, patch).await?;

        tracing::info!(
            "'{}' joined lobby '{}' as {} (session {})",
            session.display_name,
            self.config.lobby_id,
            session.mark,
            session.session_id
        );
        Ok(session)
    }
}
