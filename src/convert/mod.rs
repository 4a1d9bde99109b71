//! Conversion functionality
//!
//! Converts SOFA convention tables from the upstream CSV format into the JSON
//! documents consumed by downstream SOFA tooling:
//! - Literal substitutions (Matlab/Octave idioms to JSON-native values)
//! - Batch conversion with per-file error isolation
//! - Optional sync against the upstream SOFAtoolbox repository

pub mod converter;
pub mod substitutions;

pub use converter::{
    BatchReport, ConventionConverter, ConverterConfig, FileOutcome, SyncStatus,
};

use crate::export::ExportError;
use crate::import::ImportError;
use crate::source::SourceError;

/// Error during conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Import error: {0}")]
    ImportError(#[from] ImportError),
    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),
    #[error("Source error: {0}")]
    SourceError(#[from] SourceError),
    #[error("IO error: {0}")]
    IoError(String),
}
