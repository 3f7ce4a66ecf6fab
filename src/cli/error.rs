//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::GmlSchemaError;

/// Errors reported by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input could not be read
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    /// Output could not be written
    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    /// Schema inference failed
    #[error(transparent)]
    Schema(#[from] GmlSchemaError),

    /// Output serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}
