use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Router '{0}' has no unconditional route to fall back on")]
    MissingFallback(String),

    #[error("Duplicate route id: {0}")]
    DuplicateRoute(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
