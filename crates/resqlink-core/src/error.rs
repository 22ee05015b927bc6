//! Core error types for resqlink-core.
//!
//! The hierarchy mirrors the failure classes of an alert cycle: arming
//! preconditions, persistence, configuration, contact validation and
//! per-recipient transport failures. Location failures never leave the
//! location module and dispatch cannot fail at all.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for resqlink-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Arming was refused
    #[error("Arming error: {0}")]
    Arm(#[from] ArmError),

    /// Contact or history persistence failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Reasons `ArmingController::arm` can refuse to start a countdown.
#[derive(Error, Debug)]
pub enum ArmError {
    /// The contact list is empty; the user has to add contacts first.
    #[error("No emergency contacts. Please add emergency contacts before sending an alert.")]
    NoContacts,

    /// A countdown or dispatch is already in progress.
    #[error("An alert countdown is already in progress")]
    AlreadyActive,

    /// The contact list could not be read.
    #[error("Failed to load emergency contacts: {0}")]
    Storage(#[from] StorageError),
}

/// Persistence failures for the contact list and the alert history.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The underlying SQLite store failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored blob could not be encoded or decoded
    #[error("Malformed stored data: {0}")]
    Json(#[from] serde_json::Error),

    /// Data written by a newer version of the application
    #[error("Stored '{key}' uses schema version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },

    /// The data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
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
}

/// Validation errors for contact drafts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Name or phone missing after trimming
    #[error("Please fill in name and phone number")]
    MissingField,

    /// Phone contains characters other than digits, spaces and `-+()`
    #[error("Please enter a valid phone number: '{0}'")]
    InvalidPhone(String),

    /// No contact with the given id
    #[error("No emergency contact with id '{0}'")]
    UnknownContact(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
