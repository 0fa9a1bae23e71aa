use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType,
    Projection, ProjectionType, ScalarAttributeType,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::{
    map_sdk_error, DynamoDbGameRepository, GameIndex, GameRepository, TableState, GAME_ID,
    HOST_ID, OPPONENT_ID, STATUS_DATE,
};

fn string_attribute(name: &str) -> Result<AttributeDefinition, GameRepositoryError> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| GameRepositoryError::InvalidExpression(e.to_string()))
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement, GameRepositoryError> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| GameRepositoryError::InvalidExpression(e.to_string()))
}

fn participant_index(index: GameIndex) -> Result<GlobalSecondaryIndex, GameRepositoryError> {
    GlobalSecondaryIndex::builder()
        .index_name(index.name())
        .key_schema(key_element(index.partition_attribute(), KeyType::Hash)?)
        .key_schema(key_element(STATUS_DATE, KeyType::Range)?)
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .build()
        .map_err(|e| GameRepositoryError::InvalidExpression(e.to_string()))
}

impl DynamoDbGameRepository {
    /// Creates the games table with both participant indexes. A table that
    /// already exists is left untouched.
    pub async fn create_table(&self) -> Result<(), GameRepositoryError> {
        let result = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .billing_mode(BillingMode::PayPerRequest)
            .attribute_definitions(string_attribute(GAME_ID)?)
            .attribute_definitions(string_attribute(HOST_ID)?)
            .attribute_definitions(string_attribute(OPPONENT_ID)?)
            .attribute_definitions(string_attribute(STATUS_DATE)?)
            .key_schema(key_element(GAME_ID, KeyType::Hash)?)
            .global_secondary_indexes(participant_index(GameIndex::Host)?)
            .global_secondary_indexes(participant_index(GameIndex::Opponent)?)
            .send()
            .await;

        match result {
            Ok(_) => {
                info!("Created table {}", self.table_name);
                Ok(())
            }
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_in_use_exception()) =>
            {
                debug!("Table {} already exists", self.table_name);
                Ok(())
            }
            Err(e) => Err(map_sdk_error(e)),
        }
    }
}

/// Polls the table status until it is active, sleeping `delay` between
/// attempts. Bootstrap only; never called on the request path.
pub async fn wait_until_active(
    repository: &dyn GameRepository,
    attempts: u32,
    delay: Duration,
) -> Result<(), GameRepositoryError> {
    let mut state = TableState::Missing;
    for attempt in 1..=attempts {
        state = repository.describe_table_status().await?;
        if state == TableState::Active {
            info!("Games table active after {} attempt(s)", attempt);
            return Ok(());
        }
        debug!("Games table not ready ({:?}), attempt {}/{}", state, attempt, attempts);
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }

    match state {
        TableState::Missing => Err(GameRepositoryError::TableNotFound),
        other => Err(GameRepositoryError::DynamoDb(format!(
            "table not active after {} attempts: {:?}",
            attempts, other
        ))),
    }
}
