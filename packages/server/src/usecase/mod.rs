//! UseCase layer: the reconciliation logic each client runs against a store.
//!
//! Every use case reads the lobby row, computes a patch with the pure transitions
//! in `domain::transition`, and writes it back in one `update`. Clients never apply
//! their own writes locally; they wait for the store to push the new row.

pub mod apply_move;
pub mod error;
pub mod join_game;
pub mod leave_game;
pub mod load_lobby;
pub mod restart_game;

pub use apply_move::{ApplyMoveUseCase, MoveOutcome};
pub use error::{JoinError, LobbyError};
pub use join_game::JoinGameUseCase;
pub use leave_game::LeaveGameUseCase;
pub use load_lobby::LoadLobbyUseCase;
pub use restart_game::RestartGameUseCase;
