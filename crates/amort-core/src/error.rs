use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortError {
    #[error("Data integrity: {0}")]
    DataIntegrity(String),

    #[error("Installment {sequence_number} not found in ledger")]
    NotFound { sequence_number: u32 },

    #[error("Invalid input: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Arithmetic domain: {context}")]
    ArithmeticDomain { context: String },

    #[error("Date error: {0}")]
    Date(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AmortError {
    fn from(e: serde_json::Error) -> Self {
        AmortError::Serialization(e.to_string())
    }
}

impl From<chrono::ParseError> for AmortError {
    fn from(e: chrono::ParseError) -> Self {
        AmortError::Date(e.to_string())
    }
}
