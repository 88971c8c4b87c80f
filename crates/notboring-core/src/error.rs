//! Error types for the research engine.

use thiserror::Error;

/// Result type alias for tabular-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for researcher operations.
pub type ResearchResult<T> = Result<T, ResearchError>;

/// Errors from the backing tabular store. Always swallowed at the component
/// boundary: the rolling log reports them to the diagnostic channel, the
/// interest catalog degrades to an empty list.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store transport error: {0}")]
    Transport(String),

    #[error("Store returned malformed data: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Errors from the researcher path. Transport and validation failures are
/// treated identically by callers: logged at level 1, result dropped to `None`.
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("AI backend transport error: {0}")]
    Transport(String),

    #[error("AI reply failed validation: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for ResearchError {
    fn from(err: reqwest::Error) -> Self {
        ResearchError::Transport(err.to_string())
    }
}
