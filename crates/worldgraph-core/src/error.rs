use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WorldGraphError {
    /// True for errors caused by the caller rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WorldGraphError::InvalidInput(_)
                | WorldGraphError::NodeNotFound(_)
                | WorldGraphError::Conflict(_)
        )
    }
}

impl From<::config::ConfigError> for WorldGraphError {
    fn from(err: ::config::ConfigError) -> Self {
        WorldGraphError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WorldGraphError>;
