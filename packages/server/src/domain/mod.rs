//! Domain layer: game rules, the shared row, and the store interfaces.

pub mod board;
pub mod config;
pub mod entity;
pub mod error;
pub mod evaluator;
pub mod repository;
pub mod transition;
pub mod value_object;

pub use board::{Board, Mark};
pub use config::{LobbyConfig, WriteMode};
pub use entity::{GameState, GameStatePatch, GameStatus, Player, PlayerSession, Scores};
pub use error::{StoreError, ValueObjectError};
pub use evaluator::{evaluate_winner, is_draw, is_full};
pub use repository::{
    ChangeFeed, FeedChannel, GameStateStore, Subscription, SubscriptionId,
};
pub use transition::MoveRejection;
pub use value_object::{
    CellPosition, DEFAULT_LOBBY_ID, DisplayName, LobbyId, SessionId, SessionIdFactory,
};

#[cfg(test)]
pub use repository::MockGameStateStore;
