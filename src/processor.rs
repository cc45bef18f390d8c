//! Per-item validation over a batch of records.

use serde_json::{json, Map, Value};

use crate::compiler::{CompiledValidator, ValidationOutcome};
use crate::error::{ItemError, ValidationIssue};
use crate::types::{FailurePolicy, InputRecord, OutputRecord};

/// Separator between issues in a formatted message.
pub const ISSUE_SEPARATOR: &str = ", ";

/// Pick the value to validate from a record.
///
/// With a data path, only that top-level field is selected. A missing field
/// selects `null`; it is still handed to the validator.
pub fn select_datum(record: &Map<String, Value>, data_path: Option<&str>) -> Value {
    match data_path {
        Some(path) => record.get(path).cloned().unwrap_or(Value::Null),
        None => Value::Object(record.clone()),
    }
}

/// Join issues into one human-readable message.
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(ISSUE_SEPARATOR)
}

/// Validate every item in order.
///
/// Valid items are forwarded; with a data path they are reshaped to
/// `{ <path>: <value> }`. Invalid items either become error records
/// (`FailurePolicy::ContinueOnFail`) or abort the batch.
///
/// # Errors
///
/// Returns `ItemError` for the first invalid item when failures are not
/// tolerated. No records are returned in that case.
pub fn process_items<V: CompiledValidator + ?Sized>(
    validator: &V,
    items: &[InputRecord],
    data_path: Option<&str>,
    policy: FailurePolicy,
) -> Result<Vec<OutputRecord>, ItemError> {
    let mut output = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let datum = select_datum(&item.json, data_path);

        match validator.validate(&datum) {
            ValidationOutcome::Valid => {
                let data = match data_path {
                    Some(path) => {
                        let mut reshaped = Map::new();
                        reshaped.insert(path.to_string(), datum);
                        Value::Object(reshaped)
                    }
                    None => datum,
                };
                output.push(OutputRecord::new(data, i));
            }
            ValidationOutcome::Invalid(issues) => {
                let err = ItemError {
                    index: i,
                    message: format_issues(&issues),
                    issues,
                };

                if !policy.tolerates_failures() {
                    tracing::debug!(item = i, "aborting batch on invalid item");
                    return Err(err);
                }

                tracing::warn!(item = i, errors = err.issues.len(), "item failed validation");
                output.push(OutputRecord::failure(error_record(&err), i));
            }
        }
    }

    Ok(output)
}

/// The data of an output record standing in for a tolerated failure.
fn error_record(err: &ItemError) -> Value {
    json!({
        "error": err.issues,
        "message": err.to_string(),
    })
}
