use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::board::Cell;
use crate::models::game::{Game, GameResult, GameStatus, Outcome, StatusDate, NO_TURN, TIE_RESULT};
use crate::models::responses::GameView;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::{AttributeWrite, GameRepository, Precondition};
use crate::services::errors::game_service_errors::GameServiceError;
use crate::services::tictactoe_service::TicTacToeService;

/// Drives a game through `PENDING -> IN_PROGRESS -> FINISHED`.
///
/// Every mutation is a single conditional write; correctness under
/// concurrent requests comes from the store's per-item atomicity, so the
/// service holds no locks and no in-memory game state.
#[derive(Clone)]
pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
}

/// Usernames are trimmed; blank names and the stored sentinels are refused.
fn normalize_username(raw: &str) -> Option<&str> {
    let name = raw.trim();
    if name.is_empty() || name == TIE_RESULT || name == NO_TURN {
        None
    } else {
        Some(name)
    }
}

impl GameService {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        GameService { repository }
    }

    /// Stores a new invite and returns its game id.
    pub async fn create_game(
        &self,
        host_id: &str,
        opponent_id: &str,
    ) -> Result<String, GameServiceError> {
        let host_id = normalize_username(host_id).ok_or_else(|| {
            GameServiceError::ValidationError("Host username cannot be empty".to_string())
        })?;
        let opponent_id = normalize_username(opponent_id).ok_or_else(|| {
            GameServiceError::InvalidOpponent("Use a valid name (not empty)".to_string())
        })?;
        if opponent_id == host_id {
            return Err(GameServiceError::InvalidOpponent(
                "You cannot invite yourself".to_string(),
            ));
        }

        let game = Game::new(host_id, opponent_id);
        self.repository.create_game(&game).await?;

        info!(
            "Game {} created by {} inviting {}",
            game.game_id, host_id, opponent_id
        );
        Ok(game.game_id)
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Game, GameServiceError> {
        self.repository
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::RecordNotFound)
    }

    pub async fn accept_invite(&self, game_id: &str) -> Result<(), GameServiceError> {
        let game = self.get_game(game_id).await?;
        let started = StatusDate::after(GameStatus::InProgress, game.status_at);

        match self
            .repository
            .conditional_update(
                game_id,
                &[AttributeWrite::Status(started)],
                &[Precondition::StatusIs(GameStatus::Pending)],
            )
            .await
        {
            Ok(()) => {
                info!("Game {} accepted by {}", game_id, game.opponent_id);
                Ok(())
            }
            Err(GameRepositoryError::PreconditionFailed) => {
                debug!("Accept of game {} lost to a concurrent change", game_id);
                Err(GameServiceError::StaleInvite)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn reject_invite(&self, game_id: &str) -> Result<(), GameServiceError> {
        self.get_game(game_id).await?;

        match self
            .repository
            .conditional_delete(game_id, &[Precondition::StatusIs(GameStatus::Pending)])
            .await
        {
            Ok(()) => {
                info!("Game {} invite rejected", game_id);
                Ok(())
            }
            Err(GameRepositoryError::PreconditionFailed) => {
                debug!("Reject of game {} lost to a concurrent change", game_id);
                Err(GameServiceError::StaleInvite)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Places the acting user's marker in `cell` and hands the turn over, in
    /// one conditional write guarded by status, turn holder and cell emptiness.
    /// Any failed guard leaves the record untouched and yields `IllegalMove`.
    pub async fn apply_move(
        &self,
        game_id: &str,
        cell: Cell,
        acting_user: &str,
    ) -> Result<(), GameServiceError> {
        let game = self.get_game(game_id).await?;
        if TicTacToeService::detect_result(&game.board, &game.o_user, acting_user).is_some() {
            warn!(
                "Game {}: rejected move {} by {} on a decided board",
                game_id, cell, acting_user
            );
            return Err(GameServiceError::IllegalMove);
        }
        let marker = game.marker_for(acting_user);
        let next_turn = game.opposing_player(acting_user).to_string();

        let writes = [
            AttributeWrite::Cell(cell, marker),
            AttributeWrite::Turn(Some(next_turn.clone())),
        ];
        let preconditions = [
            Precondition::StatusIs(GameStatus::InProgress),
            Precondition::TurnIs(acting_user.to_string()),
            Precondition::CellEmpty(cell),
        ];

        match self
            .repository
            .conditional_update(game_id, &writes, &preconditions)
            .await
        {
            Ok(()) => {
                debug!(
                    "Game {}: {} placed {} on {}, {} to move",
                    game_id, acting_user, marker, cell, next_turn
                );
                Ok(())
            }
            Err(GameRepositoryError::PreconditionFailed) => {
                warn!("Game {}: rejected move {} by {}", game_id, cell, acting_user);
                Err(GameServiceError::IllegalMove)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records the result of a terminal board. A game that already carries
    /// a result is returned unchanged, so racing finalizers commit once.
    pub async fn finalize_game(
        &self,
        game_id: &str,
        outcome: Outcome,
        deciding_user: &str,
    ) -> Result<Game, GameServiceError> {
        let game = self.get_game(game_id).await?;
        if game.result.is_some() {
            debug!("Game {} already finalized", game_id);
            return Ok(game);
        }
        if !game.is_participant(deciding_user) {
            return Err(GameServiceError::ValidationError(format!(
                "{} is not playing game {}",
                deciding_user, game_id
            )));
        }

        let result = match outcome {
            Outcome::Tie => GameResult::Tie,
            Outcome::Win => GameResult::Winner(deciding_user.to_string()),
            Outcome::Lose => GameResult::Winner(game.opposing_player(deciding_user).to_string()),
        };
        let writes = [
            AttributeWrite::Status(StatusDate::after(GameStatus::Finished, game.status_at)),
            AttributeWrite::Turn(None),
            AttributeWrite::Result(result.clone()),
        ];
        let preconditions = [
            Precondition::StatusIs(GameStatus::InProgress),
            Precondition::ResultAbsent,
        ];

        match self
            .repository
            .conditional_update(game_id, &writes, &preconditions)
            .await
        {
            Ok(()) => {
                info!("Game {} finished: {}", game_id, result.as_attribute());
                self.get_game(game_id).await
            }
            Err(GameRepositoryError::PreconditionFailed) => {
                let current = self.get_game(game_id).await?;
                if current.result.is_some() {
                    debug!("Game {} was finalized concurrently", game_id);
                    Ok(current)
                } else {
                    Err(GameServiceError::IllegalMove)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a game for `viewer`, finishing it first when the board is
    /// terminal but no result has been stored yet. Spectators get no outcome;
    /// a spectator's read finalizes from the host's side.
    pub async fn view_game(
        &self,
        game_id: &str,
        viewer: &str,
    ) -> Result<GameView, GameServiceError> {
        let mut game = self.get_game(game_id).await?;
        let deciding_user = if game.is_participant(viewer) {
            viewer.to_string()
        } else {
            game.host_id.clone()
        };
        let deciding_outcome =
            TicTacToeService::detect_result(&game.board, &game.o_user, &deciding_user);

        if let Some(deciding_outcome) = deciding_outcome {
            if game.result.is_none() && game.status == GameStatus::InProgress {
                game = self
                    .finalize_game(game_id, deciding_outcome, &deciding_user)
                    .await?;
            }
        }

        let outcome = if game.is_participant(viewer) {
            deciding_outcome
        } else {
            None
        };
        Ok(GameView::new(game, viewer, outcome))
    }
}
