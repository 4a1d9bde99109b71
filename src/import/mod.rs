//! Import functionality
//!
//! Parses SOFA convention definitions from the tab-separated CSV format
//! published by SOFAtoolbox, the official Matlab/Octave API for SOFA.

pub mod csv;

pub use csv::CsvConventionImporter;

/// Error during import
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ImportError {
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(String),
}
