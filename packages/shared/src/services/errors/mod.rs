pub mod game_service_errors;
