//! Error types for stockbar-ingest
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for stockbar-ingest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Envelope Errors
    // ============================================================================
    #[error("Error parsing queue record: {message}")]
    EnvelopeParse { message: String },

    #[error("Invalid object key format: {key}")]
    KeyFormat { key: String },

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Error reading CSV s3://{bucket}/{key}: {message}")]
    Fetch {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("CSV parsing error: {message}")]
    CsvParse { message: String },

    // ============================================================================
    // Row Errors
    // ============================================================================
    #[error("Row {row}: missing required column '{column}'")]
    MissingColumn { column: String, row: usize },

    #[error("Row {row}: invalid {field} value '{value}'")]
    RowCoercion {
        field: String,
        value: String,
        row: usize,
    },

    // ============================================================================
    // Table Errors
    // ============================================================================
    #[error("Write to table '{table}' failed: {message}")]
    Write { table: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Fieldless classification of an [`Error`], for matching on failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    EnvelopeParse,
    KeyFormat,
    Fetch,
    MissingColumn,
    RowCoercion,
    Write,
    Io,
    Other,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an envelope parse error
    pub fn envelope(message: impl Into<String>) -> Self {
        Self::EnvelopeParse {
            message: message.into(),
        }
    }

    /// Create a key format error
    pub fn key_format(key: impl Into<String>) -> Self {
        Self::KeyFormat { key: key.into() }
    }

    /// Create a fetch error for an object
    pub fn fetch(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parse error
    pub fn csv(message: impl Into<String>) -> Self {
        Self::CsvParse {
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>, row: usize) -> Self {
        Self::MissingColumn {
            column: column.into(),
            row,
        }
    }

    /// Create a row coercion error
    pub fn coercion(field: impl Into<String>, value: impl Into<String>, row: usize) -> Self {
        Self::RowCoercion {
            field: field.into(),
            value: value.into(),
            row,
        }
    }

    /// Create a table write error
    pub fn write(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } | Error::YamlParse(_) => ErrorKind::Config,
            Error::EnvelopeParse { .. } | Error::JsonParse(_) => ErrorKind::EnvelopeParse,
            Error::KeyFormat { .. } => ErrorKind::KeyFormat,
            Error::Fetch { .. } | Error::CsvParse { .. } => ErrorKind::Fetch,
            Error::MissingColumn { .. } => ErrorKind::MissingColumn,
            Error::RowCoercion { .. } => ErrorKind::RowCoercion,
            Error::Write { .. } => ErrorKind::Write,
            Error::Io(_) => ErrorKind::Io,
            Error::Other(_) => ErrorKind::Other,
        }
    }
}

/// Result type alias for stockbar-ingest
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
