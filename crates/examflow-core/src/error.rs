//! Core error types for examflow-core.
//!
//! This module defines a comprehensive error hierarchy using thiserror
//! for better error handling and reporting across the library.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for examflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Exam schedule errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Asset cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
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

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

/// Exam schedule persistence errors.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Failed to read a schedule file
    #[error("Failed to read schedule from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schedule file is not valid JSON
    #[error("Failed to parse schedule from {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write a schedule file
    #[error("Failed to write schedule to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Asset cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No origin configured to fetch assets from
    #[error("No cache origin configured; set cache.origin first")]
    OriginMissing,

    /// Asset URL could not be built from the origin
    #[error("Invalid asset path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// Network fetch failed
    #[error("Failed to fetch '{path}': {message}")]
    FetchFailed { path: String, message: String },

    /// Origin answered with a non-success status
    #[error("Fetch of '{path}' returned status {status}")]
    BadStatus { path: String, status: u16 },

    /// Underlying storage failed
    #[error("Cache storage error: {0}")]
    Store(#[from] StoreError),
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Webhook URL missing or malformed
    #[error("Invalid webhook URL: {0}")]
    InvalidWebhook(String),

    /// Delivery to the notification channel failed
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
