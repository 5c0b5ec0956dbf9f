use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Host(#[from] ranklens_contracts::HostError),

    #[error("host surface unavailable: {0}")]
    HostUnavailable(String),

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
