//! Convention table model
//!
//! A convention table is the parsed form of one upstream CSV file. It is
//! read-only input to the converter: the importer owns it transiently during
//! a single conversion pass and nothing persists it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One attribute or variable of a SOFA convention.
///
/// `cells` is aligned with the owning table's `fields`: `cells[i]` is the
/// value of `fields[i]` for this attribute. Cells are already typed
/// (string, number, array, or null for an empty cell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConventionRow {
    /// Attribute name, e.g. `GLOBAL:Conventions` or `Data.IR`
    pub name: String,
    /// Typed cell values, one per table field
    pub cells: Vec<Value>,
}

/// A single SOFA convention parsed from its CSV definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConventionTable {
    /// Convention name, derived from the source file stem
    /// (e.g. `SimpleFreeFieldHRIR`)
    pub name: String,
    /// Lowercased header columns after the leading name column, in header
    /// order: typically `default`, `flags`, `dimensions`, `type`, `comment`
    pub fields: Vec<String>,
    /// Attribute rows in source order
    pub rows: Vec<ConventionRow>,
}

impl ConventionTable {
    /// Look up a row by attribute name.
    pub fn row(&self, name: &str) -> Option<&ConventionRow> {
        self.rows.iter().find(|row| row.name == name)
    }
}
