//! CSV importer for SOFA convention tables.
//!
//! The upstream format is tab-separated with one header line. The first
//! column holds the attribute name; the remaining columns are the attribute
//! fields (default, flags, dimensions, type, comment). Cells carry
//! Matlab/Octave value literals: numbers, `[...]` arrays (nested arrays
//! separated by `;`), or free text.

use crate::import::ImportError;
use crate::models::{ConventionRow, ConventionTable};
use serde_json::Value;
use tracing::debug;

/// Importer for SOFAtoolbox convention CSV files.
#[derive(Debug, Default)]
pub struct CsvConventionImporter;

impl CsvConventionImporter {
    pub fn new() -> Self {
        Self
    }

    /// Import a convention table from raw file bytes.
    ///
    /// Upstream files are windows-1252 encoded; content that is valid UTF-8
    /// passes through unchanged.
    ///
    /// # Arguments
    ///
    /// * `name` - Convention name (source file stem)
    /// * `bytes` - Raw file content
    pub fn import_bytes(&self, name: &str, bytes: &[u8]) -> Result<ConventionTable, ImportError> {
        let content = decode_windows_1252(bytes);
        self.import(name, &content)
    }

    /// Import a convention table from decoded CSV content.
    ///
    /// The first line is the header; every following non-empty line is one
    /// attribute row. A row missing only the trailing comment column gets an
    /// empty comment; any other column-count deviation is a
    /// [`ImportError::SchemaMismatch`].
    ///
    /// # Arguments
    ///
    /// * `name` - Convention name (source file stem)
    /// * `content` - Tab-separated convention definition
    pub fn import(&self, name: &str, content: &str) -> Result<ConventionTable, ImportError> {
        let mut lines = content.lines().enumerate();

        let (_, header) = lines.next().ok_or_else(|| {
            ImportError::SchemaMismatch(format!("{name}: file is empty, no header line"))
        })?;
        let fields: Vec<String> = header
            .trim()
            .split('\t')
            .skip(1)
            .map(|field| field.trim().to_lowercase())
            .collect();
        if fields.is_empty() {
            return Err(ImportError::SchemaMismatch(format!(
                "{name}: header line has no field columns"
            )));
        }
        let default_index = fields.iter().position(|field| field == "default");

        let mut rows = Vec::new();
        for (index, line) in lines {
            let line = line.trim();
            if line.is_empty() {
                debug!("{}: skipping blank line {}", name, index + 1);
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();
            // name column + fields; only the trailing comment may be missing
            if parts.len() < fields.len() || parts.len() > fields.len() + 1 {
                return Err(ImportError::SchemaMismatch(format!(
                    "{name}: line {} has {} columns, expected {}",
                    index + 1,
                    parts.len(),
                    fields.len() + 1
                )));
            }

            let attribute = parts[0].trim();
            if attribute.is_empty() {
                return Err(ImportError::SchemaMismatch(format!(
                    "{name}: line {} has an empty attribute name",
                    index + 1
                )));
            }

            let mut cells = Vec::with_capacity(fields.len());
            for (column, raw) in parts[1..].iter().enumerate() {
                let cell = parse_cell(raw).map_err(|reason| {
                    ImportError::ParseError(format!(
                        "{name}: line {}, column {}: {reason}",
                        index + 1,
                        column + 2
                    ))
                })?;
                cells.push(cell);
            }
            if cells.len() == fields.len() - 1 {
                cells.push(Value::String(String::new()));
            }

            // empty defaults read back as "" rather than null
            if let Some(idx) = default_index {
                if cells[idx].is_null() {
                    cells[idx] = Value::String(String::new());
                }
            }

            rows.push(ConventionRow {
                name: attribute.to_string(),
                cells,
            });
        }

        Ok(ConventionTable {
            name: name.to_string(),
            fields,
            rows,
        })
    }
}

/// Parse a single cell into a typed value.
///
/// Empty cells become null. `[...]` literals become (possibly nested) numeric
/// arrays, numeric tokens become numbers, everything else stays a trimmed
/// string.
fn parse_cell(raw: &str) -> Result<Value, String> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Ok(Value::Null);
    }

    if let Some(inner) = cell.strip_prefix('[') {
        let inner = inner.strip_suffix(']').unwrap_or(inner);
        return parse_array(inner);
    }

    Ok(parse_scalar(cell))
}

/// Numbers follow the Matlab source convention: a token containing `.` is a
/// float, otherwise an integer. Non-numeric tokens stay strings.
fn parse_scalar(cell: &str) -> Value {
    if cell.contains('.') {
        if let Ok(float) = cell.parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(float) {
                return Value::Number(number);
            }
        }
    } else if let Ok(int) = cell.parse::<i64>() {
        return Value::Number(int.into());
    }
    Value::String(cell.to_string())
}

/// Parse the interior of a `[...]` literal. Rows are separated by `;`,
/// elements by spaces or commas. `[]` is an empty array.
fn parse_array(inner: &str) -> Result<Value, String> {
    if inner.trim().is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    if !inner.contains(';') {
        return Ok(Value::Array(parse_number_list(inner)?));
    }

    let rows = inner
        .split(';')
        .map(|row| parse_number_list(row).map(Value::Array))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(rows))
}

fn parse_number_list(list: &str) -> Result<Vec<Value>, String> {
    list.split([' ', ','])
        .filter(|token| !token.is_empty())
        .map(|token| match parse_scalar(token) {
            Value::Number(number) => Ok(Value::Number(number)),
            _ => Err(format!("invalid numeric array element '{token}'")),
        })
        .collect()
}

/// Decode upstream file content. Valid UTF-8 is taken as-is; anything else is
/// treated as windows-1252, the encoding the SOFAtoolbox repository uses.
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => bytes.iter().map(|&byte| cp1252_char(byte)).collect(),
    }
}

// windows-1252 differs from Latin-1 only in the 0x80..=0x9F range
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => CP1252_C1[(byte - 0x80) as usize],
        _ => byte as char,
    }
}
