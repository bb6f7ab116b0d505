//! Client-side cache of the lobby row.
//!
//! The cache only changes when the store pushes a row (or when the row is
//! loaded at start-up). Local writes never touch it.

use sanmoku_server::domain::{GameState, LobbyId, PlayerSession};

/// What this client currently knows about its lobby
#[derive(Debug, Clone)]
pub struct LobbyView {
    lobby_id: LobbyId,
    row: Option<GameState>,
    session: Option<PlayerSession>,
}

impl LobbyView {
    pub fn new(lobby_id: LobbyId) -> Self {
        Self {
            lobby_id,
            row: None,
            session: None,
        }
    }

    pub fn lobby_id(&self) -> &LobbyId {
        &self.lobby_id
    }

    /// 最後に受け取った行
    pub fn row(&self) -> Option<&GameState> {
        self.row.as_ref()
    }

    pub fn session(&self) -> Option<&PlayerSession> {
        self.session.as_ref()
    }

    /// 受け取った行でキャッシュを置き換える
    ///
    /// 別のロビーの行は無視して `false` を返す。
    pub fn replace_row(&mut self, row: GameState) -> bool {
        if row.id != self.lobby_id {
            tracing::debug!("Ignoring row for lobby '{}'", row.id);
            return false;
        }
        self.row = Some(row);
        true
    }

    pub fn set_session(&mut self, session: PlayerSession) {
        self.session = Some(session);
    }

    pub fn clear_session(&mut self) -> Option<PlayerSession> {
        self.session.take()
    }

    /// セッションが最新の行の `players` に含まれているか
    ///
    /// 他のクライアントの書き込みで上書きされた場合は `false` になる。
    pub fn is_registered(&self) -> bool {
        match (&self.session, &self.row) {
            (Some(session), Some(row)) => row.players.iter().any(|p| p.id == session.session_id),
            _ => false,
        }
    }

    /// 今マスを選べるか
    pub fn can_play(&self) -> bool {
        match (&self.session, &self.row) {
            (Some(session), Some(row)) => row.can_play(session),
            _ => false,
        }
    }
}
