use axum::{routing::get, Router};
use lambda_http::{run, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use shared::config::{build_client, GamesConfig};
use shared::repositories::game_repository::DynamoDbGameRepository;
use shared::services::game_service::GameService;
use shared::services::lobby_service::LobbyService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let config = GamesConfig::from_env()?;
    let client = build_client(&config).await;

    let game_repository = Arc::new(DynamoDbGameRepository::new(
        client,
        config.table_name.clone(),
    ));
    let game_service = Arc::new(GameService::new(game_repository.clone()));
    let lobby_service = Arc::new(LobbyService::new(
        game_repository.clone(),
        config.page_size,
    ));

    let app_state = state::AppState {
        game_service,
        lobby_service,
        game_repository,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::table::routes())
        .merge(routes::games::routes())
        .layer(cors)
        .with_state(app_state);

    run(app).await
}
