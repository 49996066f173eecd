// ABOUTME: Error types for the stepdeck application
// ABOUTME: Provides structured error handling for deck loading, watching and the terminal

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON deck: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Markdown deck error: {0}")]
    MarkdownError(String),

    #[error("Deck validation error: {0}")]
    ValidationError(String),

    #[error("Deck contains no slides")]
    EmptyDeck,

    #[error("Duplicate slide id: {0}")]
    DuplicateSlideId(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Terminal error: {0}")]
    TerminalError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),
}

impl From<notify::Error> for DeckError {
    fn from(err: notify::Error) -> Self {
        DeckError::WatchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
