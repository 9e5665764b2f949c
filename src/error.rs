//! Error types module.
//!
//! This module defines the error types used throughout the dnspick application.
//! It uses `thiserror` for structured error handling and provides
//! a custom `Result` type alias for convenience.

use thiserror::Error;

/// A specialized `Result` type for dnspick operations.
///
/// This type is used throughout the crate to handle errors consistently.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the dnspick application.
///
/// Each variant represents a different category of error that can occur
/// while loading resolver lists or running latency measurements.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations, network sockets, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error (persisted lists, JSON output)
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// DNS resolver error (client construction, query failures)
    #[error("DNS resolver error: {0}")]
    Resolver(#[from] trust_dns_resolver::error::ResolveError),

    /// Network-related error (connection failures, timeouts)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error (invalid config, missing files)
    #[error("Config error: {0}")]
    Config(String),

    /// Parse error (invalid input format, malformed data)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create a new network error with a message.
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new configuration error with a message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new parse error with a message.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
