use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart line not found: {0}")]
    NotFound(String),
    #[error("Invalid cart line: {0}")]
    InvalidItem(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
