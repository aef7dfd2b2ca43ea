use thiserror::Error;

/// Errors from reading and writing the history file
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no platform data directory available")]
    NoDataDir,

    #[error("history io failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed history file at {path}")]
    Malformed { path: String },
}
