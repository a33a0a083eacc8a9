//! Unified error types for the dugout core.
//!
//! Core lookups and mutations communicate failure through sentinel returns
//! (`Option`, empty collections, `bool`), never by erroring. The types here
//! cover the ambient surfaces around the core: configuration loading and the
//! row-batch boundary.

use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Row-batch / hydration errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unknown table tag: {0}")]
    UnknownTable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for load operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;
