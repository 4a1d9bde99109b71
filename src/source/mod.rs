//! Convention sources
//!
//! The converter reads CSV convention files from a local directory; with the
//! `remote` feature that directory can be kept in sync with the upstream
//! SOFAtoolbox repository.

#[cfg(feature = "remote")]
pub mod remote;

#[cfg(feature = "remote")]
pub use remote::RemoteSource;

/// Conventions excluded from sync. These are internal templates of the
/// Matlab/Octave toolbox, not SOFA conventions of their own.
pub const EXCLUDED_PREFIXES: [&str; 2] = ["General_", "GeneralString_"];

/// Whether a convention file name is excluded from sync.
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Error reading from a convention source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("Unexpected status {status} fetching {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("Invalid convention index: {0}")]
    InvalidIndex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_prefixes() {
        assert!(is_excluded("General_.csv"));
        assert!(is_excluded("GeneralString_.csv"));
        // GeneralFIR is a real convention, not a template
        assert!(!is_excluded("GeneralFIR.csv"));
        assert!(!is_excluded("SimpleFreeFieldHRIR.csv"));
    }
}
