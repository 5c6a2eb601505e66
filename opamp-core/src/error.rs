use thiserror::Error;

/// Error kinds surfaced across the core. REST adapters map these onto HTTP
/// status codes; the OpAMP handler logs-and-continues on most of them.
#[derive(Debug, Error)]
pub enum OpampError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("agent is not connected")]
    NotConnected,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type OpampResult<T> = Result<T, OpampError>;
