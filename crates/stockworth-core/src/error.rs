use thiserror::Error;

#[derive(Debug, Error)]
pub enum StockworthError {
    #[error("Invalid vest date '{value}': {reason}")]
    DateParse { value: String, reason: String },

    #[error("Empty equity collection: {0}")]
    EmptyCollection(String),

    #[error("Invalid amount: {field} ({reason})")]
    InvalidAmount { field: String, reason: String },

    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for StockworthError {
    fn from(e: serde_json::Error) -> Self {
        StockworthError::SerializationError(e.to_string())
    }
}
