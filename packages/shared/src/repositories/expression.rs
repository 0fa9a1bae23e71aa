use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

use crate::models::game::NO_TURN;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::{
    AttributeWrite, Precondition, RESULT, STATUS_DATE, TURN,
};

/// Update/condition expressions with their placeholder maps, ready to hand
/// to an `UpdateItem` or `DeleteItem` request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Expression {
    pub update_expression: Option<String>,
    pub condition_expression: Option<String>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl Expression {
    pub fn update(
        writes: &[AttributeWrite],
        preconditions: &[Precondition],
    ) -> Result<Self, GameRepositoryError> {
        if writes.is_empty() {
            return Err(GameRepositoryError::InvalidExpression(
                "update requires at least one attribute write".to_string(),
            ));
        }

        let mut expression = Expression::default();
        let assignments: Vec<String> = writes
            .iter()
            .map(|write| {
                let (attribute, value) = write_value(write);
                let name = expression.name(attribute);
                let value = expression.value(value);
                format!("{} = {}", name, value)
            })
            .collect();
        expression.update_expression = Some(format!("SET {}", assignments.join(", ")));
        expression.add_conditions(preconditions);

        Ok(expression)
    }

    pub fn condition(preconditions: &[Precondition]) -> Result<Self, GameRepositoryError> {
        if preconditions.is_empty() {
            return Err(GameRepositoryError::InvalidExpression(
                "conditional request requires at least one precondition".to_string(),
            ));
        }

        let mut expression = Expression::default();
        expression.add_conditions(preconditions);
        Ok(expression)
    }

    /// Placeholder names, or `None` when unused; DynamoDB rejects empty maps.
    pub fn attribute_names(&self) -> Option<HashMap<String, String>> {
        (!self.names.is_empty()).then(|| self.names.clone())
    }

    pub fn attribute_values(&self) -> Option<HashMap<String, AttributeValue>> {
        (!self.values.is_empty()).then(|| self.values.clone())
    }

    fn add_conditions(&mut self, preconditions: &[Precondition]) {
        if preconditions.is_empty() {
            return;
        }
        let clauses: Vec<String> = preconditions
            .iter()
            .map(|precondition| self.clause(precondition))
            .collect();
        self.condition_expression = Some(clauses.join(" AND "));
    }

    fn clause(&mut self, precondition: &Precondition) -> String {
        match precondition {
            Precondition::StatusIs(status) => {
                let name = self.name(STATUS_DATE);
                let value = self.value(AttributeValue::S(status.key_prefix()));
                format!("begins_with({}, {})", name, value)
            }
            Precondition::TurnIs(user) => {
                let name = self.name(TURN);
                let value = self.value(AttributeValue::S(user.clone()));
                format!("{} = {}", name, value)
            }
            Precondition::CellEmpty(cell) => {
                format!("attribute_not_exists({})", self.name(cell.attribute_name()))
            }
            Precondition::ResultAbsent => {
                format!("attribute_not_exists({})", self.name(RESULT))
            }
        }
    }

    fn name(&mut self, attribute: &str) -> String {
        let placeholder = format!("#{}", attribute);
        self.names
            .insert(placeholder.clone(), attribute.to_string());
        placeholder
    }

    fn value(&mut self, value: AttributeValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }
}

fn write_value(write: &AttributeWrite) -> (&'static str, AttributeValue) {
    match write {
        AttributeWrite::Status(status_date) => {
            (STATUS_DATE, AttributeValue::S(status_date.to_key()))
        }
        AttributeWrite::Cell(cell, marker) => (
            cell.attribute_name(),
            AttributeValue::S(marker.as_str().to_string()),
        ),
        AttributeWrite::Turn(turn) => (
            TURN,
            AttributeValue::S(turn.clone().unwrap_or_else(|| NO_TURN.to_string())),
        ),
        AttributeWrite::Result(result) => {
            (RESULT, AttributeValue::S(result.as_attribute().to_string()))
        }
    }
}
