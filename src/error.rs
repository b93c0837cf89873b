use thiserror::Error;

/// Errors returned by the flatten stage and its helpers.
///
/// Every variant signals a contract violation by the caller. None of them are retryable
/// without changing the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A tensor has a zero extent, is ragged, or does not match the expected element count.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An operation was called in a state that does not allow it.
    #[error("state error: {0}")]
    State(String),
    /// A serialized tensor failed validation or could not be read/written.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
