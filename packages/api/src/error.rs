use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::responses::ErrorResponse;
use shared::repositories::errors::game_repository_errors::GameRepositoryError;
use shared::services::errors::game_service_errors::GameServiceError;

#[derive(Debug)]
pub enum ApiError {
    GameService(GameServiceError),
    Table(GameRepositoryError),
    MissingUsername,
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

impl From<GameRepositoryError> for ApiError {
    fn from(error: GameRepositoryError) -> Self {
        ApiError::Table(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameService(
                GameServiceError::InvalidOpponent(_) | GameServiceError::ValidationError(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::GameService(GameServiceError::RecordNotFound) => StatusCode::NOT_FOUND,
            ApiError::GameService(GameServiceError::StaleInvite | GameServiceError::IllegalMove) => {
                StatusCode::CONFLICT
            }
            ApiError::GameService(GameServiceError::TableNotFound) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::GameService(GameServiceError::RepositoryError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            ApiError::Table(GameRepositoryError::TableNotFound) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Table(_) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::MissingUsername => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::GameService(e) => e.to_string(),
            ApiError::Table(e) => e.to_string(),
            ApiError::MissingUsername => "Missing X-Username header".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (
                GameServiceError::InvalidOpponent("self".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GameServiceError::ValidationError("empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (GameServiceError::RecordNotFound, StatusCode::NOT_FOUND),
            (GameServiceError::StaleInvite, StatusCode::CONFLICT),
            (GameServiceError::IllegalMove, StatusCode::CONFLICT),
            (GameServiceError::TableNotFound, StatusCode::SERVICE_UNAVAILABLE),
            (
                GameServiceError::RepositoryError(GameRepositoryError::DynamoDb(
                    "throttled".to_string(),
                )),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }

    #[test]
    fn test_table_errors_map_to_status_codes() {
        assert_eq!(
            ApiError::from(GameRepositoryError::TableNotFound).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(GameRepositoryError::DynamoDb("timeout".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = ApiError::from(GameServiceError::IllegalMove).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["error"],
            GameServiceError::IllegalMove.to_string().as_str()
        );
    }

    #[test]
    fn test_missing_username_is_unauthorized() {
        assert_eq!(ApiError::MissingUsername.status(), StatusCode::UNAUTHORIZED);
    }
}
