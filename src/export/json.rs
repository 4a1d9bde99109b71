//! JSON exporter for convention documents.

use crate::export::ExportError;
use crate::models::ConventionTable;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

/// Exporter producing one JSON document per convention table.
///
/// The document maps each attribute name to an object holding the table's
/// fields, in source row order.
pub struct JsonConventionExporter;

impl JsonConventionExporter {
    /// Serialize a convention table to a pretty-printed JSON string.
    ///
    /// Key order follows the source CSV: attributes in row order, fields in
    /// header order. Output uses 4-space indentation, matching the documents
    /// downstream SOFA tooling ships with.
    ///
    /// # Arguments
    ///
    /// * `table` - Normalized convention table
    pub fn export(&self, table: &ConventionTable) -> Result<String, ExportError> {
        let document = Self::document(table);

        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        document
            .serialize(&mut serializer)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| ExportError::SerializationError(e.to_string()))
    }

    /// Assemble the JSON document for a convention table.
    pub fn document(table: &ConventionTable) -> Value {
        let mut document = serde_json::Map::new();
        for row in &table.rows {
            let mut entry = serde_json::Map::new();
            for (field, cell) in table.fields.iter().zip(&row.cells) {
                entry.insert(field.clone(), cell.clone());
            }
            // duplicate attribute names: last row wins, original position kept
            document.insert(row.name.clone(), Value::Object(entry));
        }
        Value::Object(document)
    }
}
