//! Common error types for moodtag

use thiserror::Error;

/// Common result type for moodtag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while bootstrapping a run
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
