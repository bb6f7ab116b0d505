//! UseCase 層のエラー型
//!
//! Store のエラーは 2 つに分ける。
//! - `Unavailable`（通信・読み取りの失敗）は `StoreUnavailable`
//! - それ以外（版の競合、不変条件違反、行が無い・既にある）は `Rejected`。
//!   読んだ行が古かったことを意味する。

use thiserror::Error;

use crate::domain::{Mark, StoreError};

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// 選んだマークが既に使われている
    #[error("Selected mark {0} is already taken by another player!")]
    MarkTaken(Mark),

    #[error("Could not join game. Try again. ({0})")]
    StoreUnavailable(StoreError),

    /// Store が書き込みを受け付けなかった
    #[error("The lobby changed before you joined. Try again. ({0})")]
    Rejected(StoreError),
}

impl From<StoreError> for JoinError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => JoinError::StoreUnavailable(err),
            _ => JoinError::Rejected(err),
        }
    }
}

/// 読み込み・退出・着手・リスタートのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("Could not update game. Try again. ({0})")]
    StoreUnavailable(StoreError),

    /// Store が書き込みを受け付けなかった（古い行からの書き込みなど）
    #[error("The game changed before your update was saved. ({0})")]
    Rejected(StoreError),
}

impl From<StoreError> for LobbyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => LobbyError::StoreUnavailable(err),
            _ => LobbyError::Rejected(err),
        }
    }
}
