use std::path::PathBuf;
use thiserror::Error;

/// Problems with the environment-sourced or file-sourced configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("Invalid configuration value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejections from the input path gate.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Path is not a file: {0:?}")]
    NotAFile(PathBuf),

    #[error("Unsupported file type '{extension}'. Supported types: {supported}")]
    UnsupportedExtension { extension: String, supported: String },
}

/// Aggregate failure raised once every extraction strategy has been exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("All extraction methods failed for {path:?}: {}", .attempts.join("; "))]
pub struct ExtractionError {
    pub path: PathBuf,
    /// One human-readable line per attempt, in the order they were made.
    pub attempts: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Summarization request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Summarization endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Summarization response contained no content")]
    EmptyResponse,
}

/// Top-level error for a single document run.
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("File error: {0}")]
    Input(#[from] InputError),

    #[error("Text extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("The document appears empty or contains no extractable text: {0:?}")]
    EmptyContent(PathBuf),

    #[error("Summarization error: {0}")]
    Summarization(#[from] SummarizeError),

    #[error("Failed to write summary to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SummarizerError>;
