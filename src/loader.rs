//! Reading schema text and record batches from files and strings.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::types::{json_type_name, InputRecord};

fn read_file(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Load raw schema text from a file.
///
/// The text is not parsed here: a malformed schema is a configuration error
/// reported by the compiler.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` or `LoadError::ReadError`.
pub fn load_schema_text(path: &Path) -> Result<String, LoadError> {
    read_file(path)
}

/// Load a batch of records from a JSON file.
///
/// # Errors
///
/// Returns an IO error if the file can't be read, or a parse error as
/// described for [`parse_items`].
pub fn load_items(path: &Path) -> Result<Vec<InputRecord>, LoadError> {
    parse_items(&read_file(path)?)
}

/// Parse a batch of records from JSON text.
///
/// An array of objects becomes a batch in array order; a single object is a
/// batch of one. Each record is paired to its position.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the text isn't JSON,
/// `LoadError::InvalidItem` if an array element isn't an object, or
/// `LoadError::InvalidBatch` for any other top-level value.
pub fn parse_items(content: &str) -> Result<Vec<InputRecord>, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;

    match value {
        Value::Array(elements) => elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| match element {
                Value::Object(map) => Ok(InputRecord::new(map).paired(index)),
                other => Err(LoadError::InvalidItem {
                    index,
                    actual: json_type_name(&other).to_string(),
                }),
            })
            .collect(),
        Value::Object(map) => Ok(vec![InputRecord::new(map).paired(0)]),
        other => Err(LoadError::InvalidBatch {
            actual: json_type_name(&other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_schema_text_keeps_raw_text() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let text = load_schema_text(file.path()).unwrap();
        assert_eq!(text, "{not json");
    }

    #[test]
    fn load_schema_text_file_not_found() {
        let result = load_schema_text(Path::new("/nonexistent/schema.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_items_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"[{{"foo": 1}}, {{"foo": 2}}]"#).unwrap();

        let items = load_items(file.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].json["foo"], json!(2));
        assert_eq!(items[1].paired_item.map(|p| p.item), Some(1));
    }

    #[test]
    fn load_items_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_items(file.path());
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn parse_single_object_is_batch_of_one() {
        let items = parse_items(r#"{"foo": 1}"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].paired_item.map(|p| p.item), Some(0));
    }

    #[test]
    fn parse_empty_array() {
        assert!(parse_items("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_object_element() {
        let result = parse_items(r#"[{"foo": 1}, "bar"]"#);
        match result {
            Err(LoadError::InvalidItem { index, actual }) => {
                assert_eq!(index, 1);
                assert_eq!(actual, "string");
            }
            other => panic!("expected InvalidItem, got {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_scalar_batch() {
        let result = parse_items("42");
        assert!(matches!(result, Err(LoadError::InvalidBatch { .. })));
    }

    #[test]
    fn parse_preserves_field_order() {
        let items = parse_items(r#"[{"z": 1, "a": 2, "m": 3}]"#).unwrap();
        let keys: Vec<&str> = items[0].json.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
