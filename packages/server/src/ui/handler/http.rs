//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    domain::{GameState, GameStatePatch, LobbyId, StoreError},
    infrastructure::dto::{
        http::{API_KEY_HEADER, HealthDto},
        row::{GameRowDto, GameRowPatchDto},
    },
    ui::state::AppState,
};

use super::error::ApiError;

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if state.is_authorized(presented) {
        Ok(())
    } else {
        Err(ApiError::unauthorized())
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Get a lobby row
pub async fn get_lobby(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(lobby_id): Path<String>,
) -> Result<Json<GameRowDto>, ApiError> {
    authorize(&state, &headers)?;
    let lobby_id = LobbyId::new(lobby_id)?;

    match state.store.get(&lobby_id).await? {
        // Domain Model から DTO への変換
        Some(row) => Ok(Json(GameRowDto::from(row))),
        None => Err(StoreError::NotFound(lobby_id).into()),
    }
}

/// Insert a new lobby row
pub async fn insert_lobby(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GameRowDto>,
) -> Result<(StatusCode, Json<GameRowDto>), ApiError> {
    authorize(&state, &headers)?;

    // DTO から Domain Model への変換（行の検証を含む）
    let row = GameState::try_from(body)?;
    let stored = state.store.insert(row).await?;

    Ok((StatusCode::CREATED, Json(GameRowDto::from(stored))))
}

/// Apply a partial update to a lobby row
pub async fn update_lobby(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(lobby_id): Path<String>,
    Json(body): Json<GameRowPatchDto>,
) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    let lobby_id = LobbyId::new(lobby_id)?;

    let patch = GameStatePatch::try_from(body)?;
    state.store.update(&lobby_id, patch).await?;

    Ok(StatusCode::NO_CONTENT)
}
