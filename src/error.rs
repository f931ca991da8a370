//! Error types
//!
//! Only caller misuse can fail here: bad configuration up front, or a
//! request made in the wrong game phase.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    /// Invalid lane count, dimensions or balance values
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Operation requested in a phase that does not allow it
    #[error("precondition violated: {0}")]
    Precondition(&'static str),
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Configuration(format!("invalid tuning JSON: {e}"))
    }
}
