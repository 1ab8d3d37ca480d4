use thiserror::Error;

#[derive(Debug, Error)]
pub enum SavingsError {
    #[error("Date error: {0}")]
    DateError(String),
}

impl From<chrono::ParseError> for SavingsError {
    fn from(e: chrono::ParseError) -> Self {
        SavingsError::DateError(e.to_string())
    }
}
