//! Error types for Country Registry
//!
//! This module defines the error taxonomy for every component of the application.
//! Engine-level errors are plain values: validation, store and query failures are
//! recoverable at the record or request level and never abort a whole session.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a raw record is rejected by the validator
///
/// Rules are checked in declaration order and the first failure wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name or continent is empty after trimming
    #[error("name and continent must not be empty")]
    EmptyRequiredField,

    /// Population or area is not a well-formed integer
    #[error("population and area must be whole numbers")]
    NotNumeric,

    /// Population is negative
    #[error("population must be zero or greater")]
    PopulationOutOfRange,

    /// Area is zero or negative
    #[error("area must be greater than zero")]
    AreaOutOfRange,
}

/// Record store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same normalized name already exists
    #[error("A country named '{name}' already exists")]
    DuplicateName { name: String },

    /// The candidate record failed validation
    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    /// Index does not address a record in the store
    #[error("Record index {index} out of bounds (store holds {len} records)")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Query and usage errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Range expression could not be parsed
    #[error("Invalid range expression: '{input}'. Use A-B, >=N, <=N or N")]
    InvalidRangeExpression { input: String },

    /// Unknown sort field
    #[error("Invalid sort field: '{field}'. Use one of: name, population, area")]
    InvalidSortField { field: String },

    /// Unknown numeric field for range filtering
    #[error("Invalid numeric field: '{field}'. Use one of: population, area")]
    InvalidNumericField { field: String },
}

/// Backing file errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Data file not found
    #[error("Data file not found: {path}")]
    NotFound { path: PathBuf },

    /// Required header columns are missing
    #[error("Missing header columns: {missing:?}. Expected: name, population, area, continent")]
    MissingHeaders { missing: Vec<String> },

    /// Destination directory does not exist
    #[error("Destination directory does not exist: {path}")]
    DirectoryMissing { path: PathBuf },

    /// Refusing to write an empty dataset
    #[error("No records to save")]
    NothingToSave,

    /// A record failed re-validation before writing
    #[error("Record {index} is invalid ({reason}); save cancelled")]
    InvalidRecord {
        index: usize,
        reason: ValidationError,
    },

    /// CSV encoding or decoding error
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// I/O error while reading or writing
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Atomic replace of the destination failed
    #[error("Atomic file operation failed: could not replace {path}")]
    AtomicWriteFailed { path: PathBuf },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// User configuration directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// I/O error reading or writing the config file
    #[error("Configuration file I/O error")]
    Io(#[from] std::io::Error),
}

/// Session-level errors raised by the interactive and one-shot front ends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No backing file has been loaded
    #[error("No data file loaded. Load a CSV file first")]
    NoDataLoaded,

    /// Query matched nothing
    #[error("No country matches '{query}'")]
    NoMatch { query: String },

    /// Query matched several records
    #[error("'{query}' matches several countries: {}", candidates.join(", "))]
    AmbiguousMatch {
        query: String,
        candidates: Vec<String>,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Query error
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error only aborts the current operation
    ///
    /// Recoverable errors leave the session usable: the user can correct the
    /// input and try again.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Validation(_)
            | AppError::Store(_)
            | AppError::Query(_)
            | AppError::Session(_)
            | AppError::Persistence(PersistenceError::NotFound { .. })
            | AppError::Persistence(PersistenceError::MissingHeaders { .. })
            | AppError::Persistence(PersistenceError::DirectoryMissing { .. })
            | AppError::Persistence(PersistenceError::NothingToSave) => true,

            AppError::Config(_) | AppError::Json(_) | AppError::Generic { .. } => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Store(_) => "store",
            AppError::Query(_) => "query",
            AppError::Persistence(_) => "persistence",
            AppError::Config(_) => "config",
            AppError::Session(_) => "session",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Store result type alias
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence result type alias
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Session result type alias
pub type SessionResult<T> = std::result::Result<T, SessionError>;
