use std::sync::Arc;

use shared::config::GamesConfig;
use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::services::game_service::GameService;
use shared::services::lobby_service::LobbyService;

#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
    pub lobby_service: Arc<LobbyService>,
    pub game_repository: Arc<DynamoDbGameRepository>,
    pub config: Arc<GamesConfig>,
}
