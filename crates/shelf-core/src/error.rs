//! Error types for shelf-core

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::HttpError;
use crate::resolution::LookupError;

/// Result type alias for shelf operations
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Main error type for shelf operations
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client setup failed
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Lookup ended without a record
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShelfError {
    /// The lookup failure, if this error is one
    pub fn as_lookup(&self) -> Option<&LookupError> {
        match self {
            ShelfError::Lookup(e) => Some(e),
            _ => None,
        }
    }
}
