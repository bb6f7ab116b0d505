//! Row and patch bodies.
//!
//! Column names follow the store's table schema:
//! `{id, board, next_player, winner, is_draw, scores, status, players,
//! current_turn_player_id}` plus the store's `version` and `created_at`.

use serde::{Deserialize, Serialize};

use crate::domain::{Board, GameStatus, Mark, Scores};

/// One entry of the `players` column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub mark: Mark,
    pub name: String,
}

/// A full game row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRowDto {
    pub id: String,
    pub board: Board,
    pub next_player: Mark,
    pub winner: Option<Mark>,
    pub is_draw: bool,
    pub scores: Scores,
    pub status: GameStatus,
    pub players: Vec<PlayerDto>,
    pub current_turn_player_id: Option<String>,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub created_at: i64,
}

/// A partial update. Absent columns are left unchanged.
///
/// `winner` and `current_turn_player_id` distinguish "absent" from an explicit
/// `null`, which clears the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRowPatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_player: Option<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub winner: Option<Option<Mark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_draw: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub current_turn_player_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

/// `Option<Option<T>>` where a present `null` becomes `Some(None)`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
