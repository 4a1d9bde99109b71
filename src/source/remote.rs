//! Remote convention source backed by the SOFAtoolbox GitHub repository.

use crate::source::{SourceError, is_excluded};
use serde_json::Value;
use tracing::debug;

/// GitHub contents API listing of the upstream conventions directory.
pub const SOFATOOLBOX_INDEX_URL: &str =
    "https://api.github.com/repos/sofacoustics/SOFAtoolbox/contents/SOFAtoolbox/conventions";

/// Raw file base URL for downloading individual convention files.
pub const SOFATOOLBOX_RAW_URL: &str =
    "https://raw.githubusercontent.com/sofacoustics/SOFAtoolbox/master/SOFAtoolbox/conventions";

const USER_AGENT: &str = concat!("sofa-conventions/", env!("CARGO_PKG_VERSION"));

/// Remote source listing and downloading upstream convention CSV files.
#[derive(Debug)]
pub struct RemoteSource {
    client: reqwest::blocking::Client,
    index_url: String,
    raw_url: String,
}

impl RemoteSource {
    /// Source pointing at the official SOFAtoolbox repository.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_urls(SOFATOOLBOX_INDEX_URL, SOFATOOLBOX_RAW_URL)
    }

    /// Source with custom listing and raw-file URLs (testing and mirrors).
    pub fn with_urls(index_url: &str, raw_url: &str) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self {
            client,
            index_url: index_url.to_string(),
            raw_url: raw_url.trim_end_matches('/').to_string(),
        })
    }

    /// List the convention CSV file names published upstream, sorted, with
    /// excluded template conventions filtered out.
    pub fn list_conventions(&self) -> Result<Vec<String>, SourceError> {
        let response = self
            .client
            .get(&self.index_url)
            .send()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: self.index_url.clone(),
            });
        }

        let entries: Vec<Value> = response
            .json()
            .map_err(|e| SourceError::InvalidIndex(e.to_string()))?;

        let mut names: Vec<String> = entries
            .iter()
            .filter_map(|entry| entry.get("name").and_then(Value::as_str))
            .filter(|name| name.ends_with(".csv"))
            .filter(|name| !is_excluded(name))
            .map(String::from)
            .collect();
        names.sort();
        debug!("Listed {} upstream conventions", names.len());
        Ok(names)
    }

    /// Download one convention file and normalize its line endings.
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError> {
        let url = format!("{}/{}", self.raw_url, name);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        let bytes = response
            .bytes()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(normalize_line_endings(&bytes))
    }
}

/// Normalize upstream file content: CRLF to LF, trailing tabs stripped.
/// Upstream files mix line endings and pad some rows with trailing tabs;
/// normalizing here keeps the local copies byte-comparable across syncs.
pub fn normalize_line_endings(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for line in bytes.split(|&byte| byte == b'\n') {
        let mut line = line;
        while let [rest @ .., b'\r' | b'\t'] = line {
            line = rest;
        }
        out.extend_from_slice(line);
        out.push(b'\n');
    }
    // split() yields a trailing empty chunk when input ends with a newline
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(
            normalize_line_endings(b"a\tb\t\r\nc\td\t\t\n"),
            b"a\tb\nc\td\n"
        );
        assert_eq!(normalize_line_endings(b"no trailing newline"), b"no trailing newline");
    }
}
