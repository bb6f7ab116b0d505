//! One client's lobby session: turns commands and pushed rows into use-case
//! calls and screen output.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - コマンドごとの UseCase 呼び出しと出力
//! - 書き込み後もキャッシュは push を受け取るまで変わらないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加 → 着手 → push による画面更新
//! - 異常系：使用中のマーク、未参加での退出、Store の障害

use std::sync::Arc;

use sanmoku_server::{
    domain::{DisplayName, GameState, GameStateStore, LobbyConfig, Mark},
    usecase::{
        ApplyMoveUseCase, JoinGameUseCase, LeaveGameUseCase, LoadLobbyUseCase, LobbyError,
        MoveOutcome, RestartGameUseCase,
    },
};
use sanmoku_shared::time::Clock;

use crate::{command::Command, formatter::GameFormatter, view::LobbyView};

/// Result of handling one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep reading input; print the text
    Continue(String),
    /// The user asked to exit
    Quit,
}

/// Lobby session
pub struct LobbySession {
    view: LobbyView,
    load_lobby: LoadLobbyUseCase,
    join_game: JoinGameUseCase,
    leave_game: LeaveGameUseCase,
    apply_move: ApplyMoveUseCase,
    restart_game: RestartGameUseCase,
}

impl LobbySession {
    pub fn new(store: Arc<dyn GameStateStore>, config: LobbyConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            view: LobbyView::new(config.lobby_id.clone()),
            load_lobby: LoadLobbyUseCase::new(store.clone(), config.clone(), clock.clone()),
            join_game: JoinGameUseCase::new(store.clone(), config.clone(), clock),
            leave_game: LeaveGameUseCase::new(store.clone(), config.clone()),
            apply_move: ApplyMoveUseCase::new(store.clone(), config.clone()),
            restart_game: RestartGameUseCase::new(store, config),
        }
    }

    pub fn view(&self) -> &LobbyView {
        &self.view
    }

    /// 行を読み込み（無ければ作成し）、キャッシュに入れる
    pub async fn load(&mut self) -> Result<(), LobbyError> {
        let row = self.load_lobby.execute().await?;
        self.view.replace_row(row);
        Ok(())
    }

    /// push された行を反映し、表示する画面を返す
    pub fn on_row_pushed(&mut self, row: GameState) -> Option<String> {
        let version = row.version;
        if !self.view.replace_row(row) {
            return None;
        }
        tracing::debug!("Lobby view updated to version {}", version);
        Some(GameFormatter::format_lobby(&self.view))
    }

    /// コマンドを実行する。失敗はエラーにせず、表示するメッセージとして返す。
    pub async fn handle(&mut self, command: Command) -> Step {
        let output = match command {
            Command::Join { name, mark } => self.join(name, mark).await,
            Command::Move(pos) => {
                let result = self
                    .apply_move
                    .execute(self.view.session(), self.view.row(), pos)
                    .await;
                match result {
                    Ok(MoveOutcome::Applied { .. }) => format!("Placed at {}", pos),
                    Ok(MoveOutcome::Ignored(reason)) => {
                        GameFormatter::format_move_ignored(pos, &reason.to_string())
                    }
                    Err(e) => e.to_string(),
                }
            }
            Command::Restart => match self.restart_game.execute(self.view.row()).await {
                Ok(true) => "Starting a new game...".to_string(),
                Ok(false) => "The lobby has not loaded yet.".to_string(),
                Err(e) => e.to_string(),
            },
            Command::Board => GameFormatter::format_lobby(&self.view),
            Command::Leave => self.leave().await,
            Command::Help => GameFormatter::format_help(),
            Command::Quit => {
                self.leave_best_effort().await;
                return Step::Quit;
            }
        };
        Step::Continue(output)
    }

    async fn join(&mut self, name: DisplayName, mark: Mark) -> String {
        if let Some(session) = self.view.session() {
            return format!(
                "Already joined as {} ({}). Use 'leave' first.",
                session.display_name, session.mark
            );
        }
        match self.join_game.execute(name, mark).await {
            Ok(session) => {
                let message = format!("Joined! {}", GameFormatter::format_session(&session));
                self.view.set_session(session);
                message
            }
            Err(e) => e.to_string(),
        }
    }

    async fn leave(&mut self) -> String {
        let Some(session) = self.view.session() else {
            return "You have not joined this lobby.".to_string();
        };
        match self.leave_game.execute(&session.session_id).await {
            Ok(_) => {
                self.view.clear_session();
                "You left the lobby.".to_string()
            }
            Err(e) => e.to_string(),
        }
    }

    /// 終了時の退出。失敗してもログに残すだけ。
    pub async fn leave_best_effort(&mut self) {
        let Some(session) = self.view.clear_session() else {
            return;
        };
        if let Err(e) = self.leave_game.execute(&session.session_id).await {
            tracing::warn!("Could not remove '{}' from the lobby: {}", session.display_name, e);
        }
    }
}
