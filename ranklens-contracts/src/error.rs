use thiserror::Error;

/// Failures crossing the host boundary.
///
/// None of these are fatal to the overlay; callers degrade to rendering
/// without the affected widget.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("host surface unavailable: {0}")]
    Unavailable(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("data fetch failed: {0}")]
    Fetch(String),

    #[error("subscription failed: {0}")]
    Subscribe(String),
}

pub type Result<T> = std::result::Result<T, HostError>;
