use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, TableStatus};
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};
use std::collections::HashMap;
use tracing::{debug, error, warn};

use crate::models::board::{Cell, Marker};
use crate::models::game::{Game, GameItem, GameResult, GameStatus, StatusDate};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::expression::Expression;

#[cfg(test)]
use mockall::automock;

pub const GAME_ID: &str = "GameId";
pub const HOST_ID: &str = "HostId";
pub const OPPONENT_ID: &str = "OpponentId";
pub const STATUS_DATE: &str = "StatusDate";
pub const TURN: &str = "Turn";
pub const RESULT: &str = "Result";

/// One attribute assignment inside a conditional update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeWrite {
    Status(StatusDate),
    Cell(Cell, Marker),
    /// `None` marks the game as having no next mover.
    Turn(Option<String>),
    Result(GameResult),
}

/// A check the store evaluates atomically with the write it guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    StatusIs(GameStatus),
    TurnIs(String),
    CellEmpty(Cell),
    ResultAbsent,
}

/// Secondary indexes over participant and `StatusDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameIndex {
    Host,
    Opponent,
}

impl GameIndex {
    pub fn name(&self) -> &'static str {
        match self {
            GameIndex::Host => "HostId-StatusDate-index",
            GameIndex::Opponent => "OpponentId-StatusDate-index",
        }
    }

    pub fn partition_attribute(&self) -> &'static str {
        match self {
            GameIndex::Host => HOST_ID,
            GameIndex::Opponent => OPPONENT_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableState {
    Active,
    Creating,
    Missing,
    Other(String),
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError>;

    /// Unconditional put; only used for new invites.
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError>;

    /// Applies every write, or none of them when any precondition fails
    /// (`GameRepositoryError::PreconditionFailed`).
    async fn conditional_update(
        &self,
        game_id: &str,
        writes: &[AttributeWrite],
        preconditions: &[Precondition],
    ) -> Result<(), GameRepositoryError>;

    async fn conditional_delete(
        &self,
        game_id: &str,
        preconditions: &[Precondition],
    ) -> Result<(), GameRepositoryError>;

    /// Games of one participant in one status, most recent first.
    async fn query_games(
        &self,
        index: GameIndex,
        participant: &str,
        status: GameStatus,
        limit: usize,
    ) -> Result<Vec<Game>, GameRepositoryError>;

    async fn describe_table_status(&self) -> Result<TableState, GameRepositoryError>;
}

pub struct DynamoDbGameRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameRepository {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn key(game_id: &str) -> AttributeValue {
        AttributeValue::S(game_id.to_string())
    }
}

/// Folds SDK failures into the repository taxonomy. Conditional-check
/// failures and missing tables keep their own variants.
pub(crate) fn map_sdk_error<E, R>(err: SdkError<E, R>) -> GameRepositoryError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("ConditionalCheckFailedException") => GameRepositoryError::PreconditionFailed,
        Some("ResourceNotFoundException") => GameRepositoryError::TableNotFound,
        _ => GameRepositoryError::DynamoDb(DisplayErrorContext(&err).to_string()),
    }
}

fn decode_game(item: GameItem) -> Result<Game, GameRepositoryError> {
    Game::try_from(item).map_err(|e| GameRepositoryError::Serialization(e.to_string()))
}

/// Decodes a page of query results. Items that do not decode are logged and
/// left out so one bad record cannot hide a participant's other games.
fn decode_items(items: Vec<HashMap<String, AttributeValue>>) -> Vec<Game> {
    items
        .into_iter()
        .filter_map(|item| {
            let game_id = item
                .get(GAME_ID)
                .and_then(|v| v.as_s().ok())
                .cloned()
                .unwrap_or_default();
            let decoded = from_item(item)
                .map_err(|e| GameRepositoryError::Serialization(e.to_string()))
                .and_then(decode_game);
            match decoded {
                Ok(game) => Some(game),
                Err(e) => {
                    warn!("Skipping undecodable game {:?}: {}", game_id, e);
                    None
                }
            }
        })
        .collect()
}

fn table_state(
    described: Result<Option<TableStatus>, GameRepositoryError>,
) -> Result<TableState, GameRepositoryError> {
    match described {
        Ok(Some(TableStatus::Active)) => Ok(TableState::Active),
        Ok(Some(TableStatus::Creating)) => Ok(TableState::Creating),
        Ok(Some(other)) => Ok(TableState::Other(other.as_str().to_string())),
        Ok(None) => Ok(TableState::Other("UNKNOWN".to_string())),
        Err(GameRepositoryError::TableNotFound) => Ok(TableState::Missing),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl GameRepository for DynamoDbGameRepository {
    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(GAME_ID, Self::key(game_id))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_sdk_error)?;

        if let Some(item) = output.item {
            let item: GameItem = from_item(item)
                .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(decode_game(item)?))
        } else {
            Ok(None)
        }
    }

    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let item = to_item(GameItem::from(game))
            .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to put game {}: {}", game.game_id, DisplayErrorContext(&e));
                map_sdk_error(e)
            })?;

        Ok(())
    }

    async fn conditional_update(
        &self,
        game_id: &str,
        writes: &[AttributeWrite],
        preconditions: &[Precondition],
    ) -> Result<(), GameRepositoryError> {
        let expression = Expression::update(writes, preconditions)?;

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(GAME_ID, Self::key(game_id))
            .set_update_expression(expression.update_expression.clone())
            .set_condition_expression(expression.condition_expression.clone())
            .set_expression_attribute_names(expression.attribute_names())
            .set_expression_attribute_values(expression.attribute_values())
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let err = map_sdk_error(e);
                if matches!(err, GameRepositoryError::PreconditionFailed) {
                    debug!("Conditional update rejected for game {}", game_id);
                }
                Err(err)
            }
        }
    }

    async fn conditional_delete(
        &self,
        game_id: &str,
        preconditions: &[Precondition],
    ) -> Result<(), GameRepositoryError> {
        let expression = Expression::condition(preconditions)?;

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(GAME_ID, Self::key(game_id))
            .set_condition_expression(expression.condition_expression.clone())
            .set_expression_attribute_names(expression.attribute_names())
            .set_expression_attribute_values(expression.attribute_values())
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn query_games(
        &self,
        index: GameIndex,
        participant: &str,
        status: GameStatus,
        limit: usize,
    ) -> Result<Vec<Game>, GameRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index.name())
            .key_condition_expression("#pk = :pk AND begins_with(#sk, :prefix)")
            .expression_attribute_names("#pk", index.partition_attribute())
            .expression_attribute_names("#sk", STATUS_DATE)
            .expression_attribute_values(":pk", AttributeValue::S(participant.to_string()))
            .expression_attribute_values(":prefix", AttributeValue::S(status.key_prefix()))
            .scan_index_forward(false)
            .limit(i32::try_from(limit).unwrap_or(i32::MAX))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(decode_items(output.items.unwrap_or_default()))
    }

    async fn describe_table_status(&self) -> Result<TableState, GameRepositoryError> {
        let described = self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map(|output| output.table().and_then(|t| t.table_status()).cloned())
            .map_err(map_sdk_error);

        table_state(described)
    }
}
