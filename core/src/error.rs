use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Call '{id}' not found")]
    CallNotFound { id: String },

    #[error("Agent '{name}' not found")]
    AgentNotFound { name: String },

    #[error("Invalid work day {day}: expected 0 (Mon) through 6 (Sun)")]
    InvalidWorkDay { day: u8 },

    #[error("Report is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
