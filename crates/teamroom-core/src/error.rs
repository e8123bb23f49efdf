//! Core error types for teamroom-core.
//!
//! This module defines the error hierarchy using thiserror. Domain logic
//! degrades to empty state wherever it can, so these mostly surface from
//! storage, configuration and input validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for teamroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be prepared
    #[error("Data directory {path} is unavailable: {message}")]
    DataDirUnavailable { path: PathBuf, message: String },
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Room id does not satisfy the identifier rules
    #[error("Invalid room id '{room}': {reason}")]
    InvalidRoomId { room: String, reason: String },

    /// User name is blank or too long
    #[error("Invalid user name: {0}")]
    InvalidUserName(String),

    /// An action needs a user name and none is set
    #[error("Enter a user name before voting")]
    MissingUserName,

    /// Card is not part of the deck
    #[error("Card '{card}' is not in the deck ({deck})")]
    CardNotInDeck { card: String, deck: String },

    /// Room change refused
    #[error("Cannot create a new room while joined through an invite link")]
    InvitedRoom,

    /// Unknown retrospective method key
    #[error("Unknown retrospective method: {0}")]
    UnknownMethod(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
