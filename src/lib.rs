//! SOFA Conventions - convention definitions for AES69 SOFA files
//!
//! Provides unified interfaces for:
//! - Parsing SOFA convention tables published as CSV by SOFAtoolbox
//! - Normalizing Matlab/Octave value literals to JSON-native values
//! - Compiling one JSON convention document per source table
//! - Syncing the local CSV set with the upstream SOFAtoolbox repository
//!
//! SOFA conventions define what data a SOFA file of a given kind stores and
//! how it is stored. Downstream SOFA tooling works only on the compiled JSON
//! documents produced here.

#[cfg(feature = "cli")]
pub mod cli;
pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod source;

// Re-export commonly used types
pub use convert::{
    BatchReport, ConversionError, ConventionConverter, ConverterConfig, FileOutcome, SyncStatus,
};
pub use export::{ExportError, JsonConventionExporter};
pub use import::{CsvConventionImporter, ImportError};
pub use models::{ConventionRow, ConventionTable};
#[cfg(feature = "remote")]
pub use source::remote::RemoteSource;
pub use source::SourceError;
