//! Literal-substitution table for Matlab/Octave value idioms.
//!
//! The upstream convention files carry a handful of Matlab/Octave literals
//! that have no direct JSON form. The mapping is a finite, explicitly
//! enumerated table so it stays auditable and exhaustively testable; it
//! tracks the upstream SOFAtoolbox files and is the only place to touch when
//! upstream adds a new idiom. Literals not covered by the table pass through
//! unchanged.

use crate::models::ConventionTable;
use once_cell::sync::Lazy;
use serde_json::{Value, json};

/// Source literal to JSON value, matched against the full trimmed cell text.
pub static SUBSTITUTIONS: Lazy<Vec<(&'static str, Value)>> = Lazy::new(|| {
    vec![
        // Matlab empty matrix
        ("[]", json!([])),
        // Matlab cell array holding one empty string
        ("{''}", json!([""])),
        // Data.SOS in SimpleFreeFieldHRSOS and SimpleFreeFieldSOS
        (
            "permute([0 0 0 1 0 0; 0 0 0 1 0 0], [3 1 2]);",
            json!([[[0, 0, 0, 1, 0, 0], [0, 0, 0, 1, 0, 0]]]),
        ),
        // Data.SOS in GeneralSOS
        (
            "permute([0 0 0 1 0 0], [3 1 2]);",
            json!([[[0, 0, 0, 1, 0, 0]]]),
        ),
        ("true", json!(true)),
        ("false", json!(false)),
    ]
});

/// Look up a raw literal in the substitution table.
pub fn lookup(literal: &str) -> Option<Value> {
    SUBSTITUTIONS
        .iter()
        .find(|(source, _)| *source == literal)
        .map(|(_, target)| target.clone())
}

/// Version attributes must stay strings even when the CSV cell parses as a
/// number: `1` becomes `"1.0"`, `2.1` stays `"2.1"`.
pub fn coerce_version(attribute: &str, value: &Value) -> Option<Value> {
    if !attribute.contains("Version") {
        return None;
    }
    let number = value.as_f64()?;
    let text = if number.fract() == 0.0 {
        format!("{number:.1}")
    } else {
        format!("{number}")
    };
    Some(Value::String(text))
}

/// Apply the substitution table to every cell of a table, plus version
/// coercion on the `default` field.
pub fn normalize_table(mut table: ConventionTable) -> ConventionTable {
    let default_index = table.fields.iter().position(|field| field == "default");

    for row in &mut table.rows {
        for cell in &mut row.cells {
            if let Value::String(literal) = cell {
                if let Some(mapped) = lookup(literal) {
                    *cell = mapped;
                }
            }
        }
        if let Some(cell) = default_index.and_then(|index| row.cells.get_mut(index)) {
            if let Some(coerced) = coerce_version(&row.name, cell) {
                *cell = coerced;
            }
        }
    }

    table
}
