#[derive(Debug)]
pub enum GameRepositoryError {
    /// A conditional write or delete was rejected; the item is unchanged.
    PreconditionFailed,
    TableNotFound,
    InvalidExpression(String),
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for GameRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameRepositoryError::PreconditionFailed => write!(f, "Conditional check failed"),
            GameRepositoryError::TableNotFound => write!(f, "Games table does not exist"),
            GameRepositoryError::InvalidExpression(msg) => {
                write!(f, "Invalid expression: {}", msg)
            }
            GameRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for GameRepositoryError {}
