use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error};

use crate::{error::ApiError, middleware::player::Player, state::AppState};
use shared::models::game::Game;
use shared::models::requests::{CreateGameRequest, ListGamesQuery, MoveRequest};
use shared::models::responses::{CreateGameResponse, GameView};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/invites", get(list_invites))
        .route("/games/{game_id}", get(view_game))
        .route("/games/{game_id}/accept", post(accept_invite))
        .route("/games/{game_id}/reject", post(reject_invite))
        .route("/games/{game_id}/moves", post(apply_move))
}

async fn create_game(
    State(state): State<AppState>,
    player: Player,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<CreateGameResponse>), ApiError> {
    let game_id = state
        .game_service
        .create_game(&player.username, &payload.opponent)
        .await
        .map_err(|e| {
            error!("Failed to create game for {}: {}", player.username, e);
            ApiError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(CreateGameResponse { game_id })))
}

async fn list_invites(
    State(state): State<AppState>,
    player: Player,
) -> Result<Json<Vec<Game>>, ApiError> {
    state
        .lobby_service
        .list_invites(&player.username)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to list invites for {}: {}", player.username, e);
            ApiError::from(e)
        })
}

async fn list_games(
    State(state): State<AppState>,
    player: Player,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<Vec<Game>>, ApiError> {
    state
        .lobby_service
        .list_games_with_status(&player.username, query.status)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                "Failed to list {} games for {}: {}",
                query.status, player.username, e
            );
            ApiError::from(e)
        })
}

async fn view_game(
    State(state): State<AppState>,
    player: Player,
    Path(game_id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    state
        .game_service
        .view_game(&game_id, &player.username)
        .await
        .map(Json)
        .map_err(ApiError::from)
}

async fn accept_invite(
    State(state): State<AppState>,
    player: Player,
    Path(game_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.game_service.accept_invite(&game_id).await?;
    debug!("{} accepted game {}", player.username, game_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn reject_invite(
    State(state): State<AppState>,
    player: Player,
    Path(game_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.game_service.reject_invite(&game_id).await?;
    debug!("{} rejected game {}", player.username, game_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_move(
    State(state): State<AppState>,
    player: Player,
    Path(game_id): Path<String>,
    Json(payload): Json<MoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    state
        .game_service
        .apply_move(&game_id, payload.cell, &player.username)
        .await?;

    // A winning or filling move is finalised on the way out.
    state
        .game_service
        .view_game(&game_id, &player.username)
        .await
        .map(Json)
        .map_err(ApiError::from)
}
