use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidRange(String),
    InvalidDirection(String),
    UnknownColumn(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidRange(msg) => write!(f, "invalid range: {msg}"),
            ModelError::InvalidDirection(msg) => {
                write!(f, "invalid direction: {msg}")
            }
            ModelError::UnknownColumn(msg) => {
                write!(f, "unknown column: {msg}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
