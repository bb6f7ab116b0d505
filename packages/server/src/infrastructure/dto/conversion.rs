//! Conversion logic between DTOs and domain entities.
//!
//! Incoming DTOs are validated here: value objects are checked and the resulting
//! row must satisfy `GameState::validate`. Failures become `StoreError::InvalidRow`.

use crate::domain::{
    DisplayName, GameState, GameStatePatch, LobbyId, Player, SessionId, StoreError,
    ValueObjectError,
};

use super::row::{GameRowDto, GameRowPatchDto, PlayerDto};

fn invalid(err: ValueObjectError) -> StoreError {
    StoreError::InvalidRow(err.to_string())
}

fn players_from_dto(players: Vec<PlayerDto>) -> Result<Vec<Player>, StoreError> {
    players.into_iter().map(Player::try_from).collect()
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<PlayerDto> for Player {
    type Error = StoreError;

    fn try_from(dto: PlayerDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SessionId::new(dto.id).map_err(invalid)?,
            mark: dto.mark,
            name: DisplayName::new(dto.name).map_err(invalid)?,
        })
    }
}

impl TryFrom<GameRowDto> for GameState {
    type Error = StoreError;

    fn try_from(dto: GameRowDto) -> Result<Self, Self::Error> {
        let row = Self {
            id: LobbyId::new(dto.id).map_err(invalid)?,
            board: dto.board,
            next_player: dto.next_player,
            winner: dto.winner,
            is_draw: dto.is_draw,
            scores: dto.scores,
            status: dto.status,
            players: players_from_dto(dto.players)?,
            current_turn_player_id: dto
                .current_turn_player_id
                .map(SessionId::new)
                .transpose()
                .map_err(invalid)?,
            version: dto.version,
            created_at: dto.created_at,
        };
        row.validate()?;
        Ok(row)
    }
}

impl TryFrom<GameRowPatchDto> for GameStatePatch {
    type Error = StoreError;

    fn try_from(dto: GameRowPatchDto) -> Result<Self, Self::Error> {
        Ok(Self {
            board: dto.board,
            next_player: dto.next_player,
            winner: dto.winner,
            is_draw: dto.is_draw,
            scores: dto.scores,
            status: dto.status,
            players: dto.players.map(players_from_dto).transpose()?,
            current_turn_player_id: dto
                .current_turn_player_id
                .map(|id| id.map(SessionId::new).transpose())
                .transpose()
                .map_err(invalid)?,
            expected_version: dto.expected_version,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Player> for PlayerDto {
    fn from(model: Player) -> Self {
        Self {
            id: model.id.into(),
            mark: model.mark,
            name: model.name.into(),
        }
    }
}

impl From<GameState> for GameRowDto {
    fn from(model: GameState) -> Self {
        Self {
            id: model.id.into_string(),
            board: model.board,
            next_player: model.next_player,
            winner: model.winner,
            is_draw: model.is_draw,
            scores: model.scores,
            status: model.status,
            players: model.players.into_iter().map(PlayerDto::from).collect(),
            current_turn_player_id: model.current_turn_player_id.map(String::from),
            version: model.version,
            created_at: model.created_at,
        }
    }
}

impl From<GameStatePatch> for GameRowPatchDto {
    fn from(model: GameStatePatch) -> Self {
        Self {
            board: model.board,
            next_player: model.next_player,
            winner: model.winner,
            is_draw: model.is_draw,
            scores: model.scores,
            status: model.status,
            players: model
                .players
                .map(|players| players.into_iter().map(PlayerDto::from).collect()),
            current_turn_player_id: model
                .current_turn_player_id
                .map(|id| id.map(String::from)),
            expected_version: model.expected_version,
        }
    }
}
