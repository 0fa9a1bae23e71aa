use serde::Serialize;

use crate::models::game::{Game, Outcome};

#[derive(Debug, Clone, Serialize)]
pub struct CreateGameResponse {
    pub game_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    pub table_name: String,
    pub status: String,
}

/// A game as shown to one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub game: Game,
    pub board: Vec<&'static str>,
    pub opponent: String,
    /// Board evaluated from the viewer's side; `None` while play continues
    /// and always `None` for spectators.
    pub outcome: Option<Outcome>,
    pub turn_label: Option<String>,
}

impl GameView {
    pub fn new(game: Game, viewer: &str, outcome: Option<Outcome>) -> Self {
        GameView {
            board: game.board.to_strings(),
            opponent: game.opposing_player(viewer).to_string(),
            turn_label: game.turn_label(),
            outcome,
            game,
        }
    }
}
