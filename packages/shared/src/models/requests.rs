use serde::Deserialize;

use crate::models::board::Cell;
use crate::models::game::GameStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGameRequest {
    pub opponent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    pub cell: Cell,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListGamesQuery {
    pub status: GameStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_request_parses_cell_name() {
        let request: MoveRequest = serde_json::from_str(r#"{"cell":"BottomMiddle"}"#).unwrap();
        assert_eq!(request.cell, Cell::BottomMiddle);
    }

    #[test]
    fn test_move_request_rejects_unknown_cell() {
        assert!(serde_json::from_str::<MoveRequest>(r#"{"cell":"Center"}"#).is_err());
    }

    #[test]
    fn test_list_games_query_status_names() {
        let query: ListGamesQuery = serde_json::from_str(r#"{"status":"IN_PROGRESS"}"#).unwrap();
        assert_eq!(query.status, GameStatus::InProgress);
    }
}
