pub mod errors;
pub mod game_service;
pub mod lobby_service;
pub mod tictactoe_service;
