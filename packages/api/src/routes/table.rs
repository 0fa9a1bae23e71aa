use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info};

use crate::{error::ApiError, state::AppState};
use shared::models::responses::TableResponse;
use shared::repositories::table_setup::wait_until_active;

pub fn routes() -> Router<AppState> {
    Router::new().route("/table", post(create_table))
}

/// Provisions the games table and waits for it to become active.
async fn create_table(State(state): State<AppState>) -> Result<Json<TableResponse>, ApiError> {
    let repository = state.game_repository.as_ref();

    repository.create_table().await.map_err(|e| {
        error!("Failed to create table {}: {}", repository.table_name, e);
        ApiError::from(e)
    })?;
    wait_until_active(
        repository,
        state.config.table_ready_attempts,
        state.config.table_ready_delay,
    )
    .await?;

    info!("Table {} is ready", repository.table_name);
    Ok(Json(TableResponse {
        table_name: repository.table_name.clone(),
        status: "ACTIVE".to_string(),
    }))
}
