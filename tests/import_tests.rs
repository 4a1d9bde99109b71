//! Import module tests

use serde_json::{Value, json};
use sofa_conventions::import::{CsvConventionImporter, ImportError};

const HEADER: &str = "Name\tDefault\tFlags\tDimensions\tType\tComment";

mod csv_import_tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let importer = CsvConventionImporter::new();
        let content = format!(
            "{HEADER}\n\
             GLOBAL:Conventions\tSOFA\trm\t\tattribute\tSOFA convention name\n\
             ListenerPosition\t[0 0 0]\tm\tIC, MC\tdouble\tPosition of the listener\n\
             Data.SamplingRate\t48000\tm\tI\tdouble\tSampling rate\n"
        );
        let table = importer.import("SimpleFreeFieldHRIR", &content).unwrap();

        assert_eq!(table.name, "SimpleFreeFieldHRIR");
        assert_eq!(
            table.fields,
            vec!["default", "flags", "dimensions", "type", "comment"]
        );
        assert_eq!(table.rows.len(), 3);

        let global = &table.rows[0];
        assert_eq!(global.name, "GLOBAL:Conventions");
        assert_eq!(global.cells[0], json!("SOFA"));
        assert_eq!(global.cells[1], json!("rm"));
        // empty dimensions cell stays null
        assert_eq!(global.cells[2], Value::Null);

        let position = table.row("ListenerPosition").unwrap();
        assert_eq!(position.cells[0], json!([0, 0, 0]));
        assert_eq!(position.cells[2], json!("IC, MC"));

        let rate = table.row("Data.SamplingRate").unwrap();
        assert_eq!(rate.cells[0], json!(48000));
    }

    #[test]
    fn test_missing_comment_column_is_filled() {
        let importer = CsvConventionImporter::new();
        let content = format!("{HEADER}\nGLOBAL:Title\t\trm\t\tattribute");
        let table = importer.import("test", &content).unwrap();

        assert_eq!(table.rows[0].cells.len(), 5);
        assert_eq!(table.rows[0].cells[4], json!(""));
    }

    #[test]
    fn test_empty_default_becomes_empty_string() {
        let importer = CsvConventionImporter::new();
        let content = format!("{HEADER}\nGLOBAL:History\t\tm\t\tattribute\t\n");
        let table = importer.import("test", &content).unwrap();

        assert_eq!(table.rows[0].cells[0], json!(""));
        // an empty cell that is present but not the default stays null
        assert_eq!(table.rows[0].cells[4], Value::Null);
    }

    #[test]
    fn test_nested_array_default() {
        let importer = CsvConventionImporter::new();
        let content = format!("{HEADER}\nData.SOS\t[0 0 0; 0 0 1]\tm\tmRn\tdouble\tSOS\n");
        let table = importer.import("test", &content).unwrap();

        assert_eq!(table.rows[0].cells[0], json!([[0, 0, 0], [0, 0, 1]]));
    }

    #[test]
    fn test_row_with_missing_column_is_schema_mismatch() {
        let importer = CsvConventionImporter::new();
        let content = format!("{HEADER}\nGLOBAL:Title\tvalue\trm\n");
        let err = importer.import("test", &content).unwrap_err();

        assert!(matches!(err, ImportError::SchemaMismatch(_)));
        let message = err.to_string();
        assert!(message.contains("line 2"), "unexpected message: {message}");
    }

    #[test]
    fn test_row_with_extra_columns_is_schema_mismatch() {
        let importer = CsvConventionImporter::new();
        let content = format!("{HEADER}\nGLOBAL:Title\ta\tb\tc\td\te\tf\n");
        let err = importer.import("test", &content).unwrap_err();

        assert!(matches!(err, ImportError::SchemaMismatch(_)));
    }

    #[test]
    fn test_empty_file_is_schema_mismatch() {
        let importer = CsvConventionImporter::new();
        assert!(matches!(
            importer.import("test", ""),
            Err(ImportError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let importer = CsvConventionImporter::new();
        let content = format!("{HEADER}\n\nGLOBAL:Title\tt\trm\t\tattribute\tTitle\n\n");
        let table = importer.import("test", &content).unwrap();

        assert_eq!(table.rows.len(), 1);
    }
}

mod encoding_tests {
    use super::*;

    #[test]
    fn test_import_bytes_decodes_windows_1252() {
        let importer = CsvConventionImporter::new();
        // 0x96 is an en dash in windows-1252 and invalid UTF-8
        let mut bytes = format!("{HEADER}\nGLOBAL:Title\tt\trm\t\tattribute\ta ").into_bytes();
        bytes.push(0x96);
        bytes.extend_from_slice(b" b\n");
        let table = importer.import_bytes("test", &bytes).unwrap();

        assert_eq!(table.rows[0].cells[4], json!("a \u{2013} b"));
    }

    #[test]
    fn test_import_bytes_accepts_utf8() {
        let importer = CsvConventionImporter::new();
        let content = format!("{HEADER}\nGLOBAL:Title\tt\trm\t\tattribute\tcaf\u{00E9}\n");
        let table = importer.import_bytes("test", content.as_bytes()).unwrap();

        assert_eq!(table.rows[0].cells[4], json!("caf\u{00E9}"));
    }
}
