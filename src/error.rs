//! Error types for the campus concierge.

use thiserror::Error;

/// Main error type for campus concierge operations.
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Dataset loading errors.
///
/// These never abort a load: the store logs them and skips the offending file.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of optional external collaborators (language model, weather).
///
/// Callers recover from every variant by taking the deterministic path.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected response ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Unparsable output: {0}")]
    Unparsable(String),

    #[error("No result: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CollaboratorError::Timeout
        } else if e.is_connect() {
            CollaboratorError::Request(format!("Connection failed: {}", e))
        } else {
            CollaboratorError::Request(e.to_string())
        }
    }
}

/// Result type alias for campus concierge operations.
pub type Result<T> = std::result::Result<T, CampusError>;
