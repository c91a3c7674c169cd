//! Error handling for AURIC processing operations.
//!
//! Provides error types with context for file reading and writing,
//! configuration validation, batch sequencing and data export failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuricError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("SZA is {value}. AURIC needs 0<SZA<90 or 110<SZA<180.")]
    InvalidZenithAngle { value: f64 },

    #[error("Invalid switch value '{value}': expected one of ON, on, OFF, off, true, false, 1, 0")]
    InvalidSwitch { value: String },

    #[error("Don't know how to write '{file}' as {requested}")]
    UnsupportedWrite { file: String, requested: String },

    #[error("Invalid parameter line {line_number} in {path}: {reason}")]
    InvalidParamLine {
        path: PathBuf,
        line_number: usize,
        reason: String,
    },

    #[error("Parameter file must have exactly {expected} lines, found {found}")]
    ParamLayout { expected: usize, found: usize },

    #[error("Invalid record format in file: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Invalid Fortran edit descriptor '{descriptor}': {reason}")]
    InvalidDescriptor { descriptor: String, reason: String },

    #[error("Profile '{name}' not found in {path}")]
    FeatureNotFound { name: String, path: PathBuf },

    #[error("Invalid AURIC path: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Unknown synthetic spectrum band: {name}")]
    UnknownBand { name: String },

    #[error("Unknown pipeline stage: {name}")]
    UnknownStage { name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl AuricError {
    /// Attach a path to an I/O failure
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuricError>;
