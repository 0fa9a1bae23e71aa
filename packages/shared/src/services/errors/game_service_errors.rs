use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[derive(Debug)]
pub enum GameServiceError {
    InvalidOpponent(String),
    ValidationError(String),
    /// The invite was already accepted, rejected or removed.
    StaleInvite,
    /// Not the caller's turn, the cell is taken, or the game is not in progress.
    IllegalMove,
    TableNotFound,
    RecordNotFound,
    RepositoryError(GameRepositoryError),
}

impl std::fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameServiceError::InvalidOpponent(msg) => write!(f, "Invalid opponent: {}", msg),
            GameServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            GameServiceError::StaleInvite => {
                write!(f, "The invite is no longer pending")
            }
            GameServiceError::IllegalMove => write!(
                f,
                "Move rejected: not your turn, the square is taken, or the game is not in progress"
            ),
            GameServiceError::TableNotFound => {
                write!(f, "Games table has not been created yet")
            }
            GameServiceError::RecordNotFound => write!(f, "That game does not exist"),
            GameServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for GameServiceError {}

impl From<GameRepositoryError> for GameServiceError {
    fn from(err: GameRepositoryError) -> Self {
        match err {
            GameRepositoryError::TableNotFound => GameServiceError::TableNotFound,
            other => GameServiceError::RepositoryError(other),
        }
    }
}
