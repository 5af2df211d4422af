//! Core error types for vocabvocab-core.
//!
//! This module defines the error hierarchy using thiserror. Only vocabulary
//! loading and explicit configuration/validation calls surface errors to the
//! caller; storage faults during normal scheduling are logged and recovered.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for vocabvocab-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vocabulary source errors
    #[error("Vocabulary error: {0}")]
    Vocab(#[from] VocabError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Key/value storage errors.
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

    /// Backend could not read the key
    #[error("Read failed for key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Backend refused the write (quota, read-only medium, ...)
    #[error("Write rejected for key '{key}': {message}")]
    WriteRejected { key: String, message: String },

    /// Value could not be encoded for storage
    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Vocabulary source errors. All of them are fatal for a session.
#[derive(Error, Debug)]
pub enum VocabError {
    /// Vocabulary file does not exist or cannot be read
    #[error("Failed to read vocabulary from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed before a response arrived
    #[error("Failed to fetch vocabulary from {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Failed to load vocabulary: {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Payload is not a JSON array of vocabulary items
    #[error("Malformed vocabulary data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Async runtime for the HTTP fetch could not be started
    #[error("Failed to start runtime for vocabulary fetch: {0}")]
    Runtime(#[source] std::io::Error),

    /// Source string is neither a readable path nor a valid URL
    #[error("Invalid vocabulary source '{0}'")]
    InvalidSource(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Daily target must be a positive integer
    #[error("Invalid daily target '{value}': {message}")]
    InvalidDailyTarget { value: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    || err.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::InvalidDailyTarget {
            value: "0".into(),
            message: "must be positive".into(),
        }
        .into();
        assert!(err.to_string().contains("Invalid daily target '0'"));
    }

    #[test]
    fn no_rows_maps_to_query_failed() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }
}
