//! Export functionality
//!
//! Serializes convention tables to the JSON documents read by downstream
//! SOFA tooling.

pub mod json;

pub use json::JsonConventionExporter;

/// Error during export
#[derive(Debug, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}
