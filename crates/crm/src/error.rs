//! Error types for crm.
//!
//! This module defines all error types used throughout the crm crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for crm operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// Failed to read or parse the customer data file.
    #[error("failed to read customer data from {path}: {source}")]
    StoreRead {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// The data file's header row lacks one or more required columns.
    #[error("customer data in {path} is missing column(s): {columns}")]
    MissingColumns {
        /// Path to the data file.
        path: PathBuf,
        /// Comma-separated names of the missing columns.
        columns: String,
    },

    /// Failed to write the customer data file.
    #[error("failed to write customer data to {path}: {source}")]
    StoreWrite {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Console or file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for crm operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a store read error for the given data file.
    #[must_use]
    pub fn store_read(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::StoreRead {
            path: path.into(),
            source,
        }
    }

    /// Create a store write error for the given data file.
    #[must_use]
    pub fn store_write(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::StoreWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from reading or writing the data file.
    #[must_use]
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::StoreRead { .. }
                | Self::MissingColumns { .. }
                | Self::StoreWrite { .. }
                | Self::DirectoryCreate { .. }
        )
    }
}
