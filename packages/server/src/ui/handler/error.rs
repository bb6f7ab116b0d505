//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{StoreError, ValueObjectError},
    infrastructure::dto::http::ErrorDto,
};

/// A non-2xx response with an `{"error": "..."}` body
#[derive(Debug)]
pub struct ApiError {
    pub(super) status: StatusCode,
    message: String,
    current_version: Option<u64>,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "invalid or missing api key".to_string(),
            current_version: None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists(_) | StoreError::VersionConflict { .. } => {
                StatusCode::CONFLICT
            }
            StoreError::InvalidRow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let current_version = match &err {
            StoreError::VersionConflict { actual, .. } => Some(*actual),
            _ => None,
        };
        Self {
            status,
            message: err.to_string(),
            current_version,
        }
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(err: ValueObjectError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
            current_version: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = %self.status, message = %self.message, "request failed");
        let body = ErrorDto {
            error: self.message,
            current_version: self.current_version,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LobbyId;

    #[test]
    fn test_store_errors_map_to_status_codes() {
        // テスト項目: Store のエラーが対応する HTTP ステータスに変換される
        let cases = [
            (StoreError::NotFound(LobbyId::default()), StatusCode::NOT_FOUND),
            (StoreError::AlreadyExists(LobbyId::default()), StatusCode::CONFLICT),
            (
                StoreError::VersionConflict {
                    expected: 1,
                    actual: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                StoreError::InvalidRow("bad".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::Unavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }
}
