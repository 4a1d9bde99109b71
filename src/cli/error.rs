//! CLI-specific error types

use crate::convert::ConversionError;
use crate::source::SourceError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Conversion error: {0}")]
    ConversionError(#[from] ConversionError),

    #[error("Source error: {0}")]
    SourceError(#[from] SourceError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(String),
}
