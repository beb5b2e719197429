//! Core error types for usersignal-core.
//!
//! The router itself is total and never fails; errors exist only at the
//! edges -- native bridge queries, configuration files, serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for usersignal-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Native bridge errors
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Native notification bridge errors.
///
/// Handlers never see these: the bridge adapter collapses any error into a
/// "not ok" report continuation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The query reached the OS but failed
    #[error("Native query failed: {0}")]
    QueryFailed(String),

    /// The native notification subsystem is not available on this platform
    #[error("Native notification subsystem unavailable")]
    Unavailable,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
