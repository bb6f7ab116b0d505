//! ドメイン層のエラー型

use thiserror::Error;

use super::value_object::LobbyId;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Lobby ID must not be empty")]
    LobbyIdEmpty,

    #[error("Lobby ID is too long ({0} bytes)")]
    LobbyIdTooLong(usize),

    #[error("Lobby ID '{0}' contains characters other than [A-Za-z0-9_-]")]
    LobbyIdInvalidChars(String),

    #[error("Session ID must not be empty")]
    SessionIdEmpty,

    #[error("Name must not be empty")]
    DisplayNameEmpty,

    #[error("Name is too long ({0} characters, max 22)")]
    DisplayNameTooLong(usize),

    #[error("Cell ({row}, {col}) is outside the 3x3 board")]
    CellOutOfRange { row: usize, col: usize },

    #[error("Cell number {0} is outside 1-9")]
    CellIndexOutOfRange(usize),

    #[error("Unknown mark '{0}', expected X or O")]
    UnknownMark(String),
}

/// Store（ゲーム行の保存先）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 通信失敗・読み取り失敗など
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("lobby '{0}' not found")]
    NotFound(LobbyId),

    #[error("lobby '{0}' already exists")]
    AlreadyExists(LobbyId),

    /// 条件付き書き込みで、書き手が最後に見た版と現在の版が異なる
    #[error("row version conflict (expected {expected}, found {actual})")]
    VersionConflict { expected: u64, actual: u64 },

    /// 行が不変条件を満たさない
    #[error("invalid row: {0}")]
    InvalidRow(String),
}
