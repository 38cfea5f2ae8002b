use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    #[error("No row matches player '{player}' in season {season}")]
    NotFound { player: String, season: String },

    #[error("{count} rows match player '{player}' in season {season}")]
    AmbiguousMatch {
        player: String,
        season: String,
        count: usize,
    },

    #[error("Invalid neighbor count: k = {k}, table has {rows} rows")]
    InvalidK { k: usize, rows: usize },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unknown position group: {0}")]
    UnknownGroup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Shorthand for a `MalformedInput` error at the given row.
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            row,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
