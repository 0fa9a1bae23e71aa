pub mod errors;
pub mod expression;
pub mod game_repository;
pub mod table_setup;
