//! Error types for the matchbox crate

use thiserror::Error;

/// Main error type for the matchbox crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid board encoding length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("illegal move: position {position} is already occupied")]
    OccupiedCell { position: usize },

    #[error("no legal moves available")]
    NoLegalMoves,

    #[error("session '{session_id}' not found")]
    SessionNotFound { session_id: String },

    #[error("session '{session_id}' is already finished")]
    SessionFinished { session_id: String },

    #[error("not {side}'s turn in session '{session_id}'")]
    NotYourTurn { session_id: String, side: char },

    #[error("matchbox for state '{state}' has no positive-weight moves")]
    DepletedMatchbox { state: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
