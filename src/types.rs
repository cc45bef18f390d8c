//! Core types for per-item record validation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Display name a node gets when none is configured.
pub const DEFAULT_NODE_NAME: &str = "Json Validator";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The schema a freshly created node starts with, pretty-printed.
pub fn default_schema_text() -> String {
    let schema = json!({
        "type": "object",
        "properties": {
            "foo": { "type": "integer" },
            "bar": { "type": "string" }
        },
        "required": ["foo"],
        "additionalProperties": false
    });
    // A `Value` built from literals always serializes.
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Back-reference from an output record to the input it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    /// 0-based position of the originating input record.
    pub item: usize,
}

/// One record of an input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub json: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<PairedItem>,
}

impl InputRecord {
    pub fn new(json: Map<String, Value>) -> Self {
        Self {
            json,
            paired_item: None,
        }
    }

    /// Attach the batch position this record was read from.
    pub fn paired(mut self, item: usize) -> Self {
        self.paired_item = Some(PairedItem { item });
        self
    }
}

/// One record of an output batch: forwarded data or a tolerated error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub json: Value,
    pub paired_item: PairedItem,
    /// Set for records synthesized from a tolerated failure. Not serialized.
    #[serde(skip)]
    error: bool,
}

impl OutputRecord {
    /// A forwarded record.
    pub fn new(json: Value, item: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item },
            error: false,
        }
    }

    /// A record standing in for an item that failed validation.
    pub fn failure(json: Value, item: usize) -> Self {
        Self {
            error: true,
            ..Self::new(json, item)
        }
    }

    /// True when this record was synthesized from a tolerated failure.
    pub fn is_error(&self) -> bool {
        self.error
    }
}

/// What to do when an item fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FailurePolicy {
    /// Abort the whole batch on the first invalid item.
    #[default]
    Abort,
    /// Emit an error record for the item and keep going.
    ContinueOnFail,
}

impl FailurePolicy {
    /// Create a policy from a continue-on-fail flag.
    pub fn from_continue_flag(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            FailurePolicy::ContinueOnFail
        } else {
            FailurePolicy::Abort
        }
    }

    pub fn tolerates_failures(&self) -> bool {
        matches!(self, FailurePolicy::ContinueOnFail)
    }
}

/// JSON Schema draft to pin the engine to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaDraft {
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

impl SchemaDraft {
    /// Parse a draft name such as `7`, `draft7` or `2020-12`.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let s = s.strip_prefix("draft").unwrap_or(&s).trim_start_matches('-');
        match s {
            "4" | "04" => Some(SchemaDraft::Draft4),
            "6" | "06" => Some(SchemaDraft::Draft6),
            "7" | "07" => Some(SchemaDraft::Draft7),
            "2019-09" | "201909" => Some(SchemaDraft::Draft201909),
            "2020-12" | "202012" => Some(SchemaDraft::Draft202012),
            _ => None,
        }
    }

    pub(crate) fn to_engine(self) -> jsonschema::Draft {
        match self {
            SchemaDraft::Draft4 => jsonschema::Draft::Draft4,
            SchemaDraft::Draft6 => jsonschema::Draft::Draft6,
            SchemaDraft::Draft7 => jsonschema::Draft::Draft7,
            SchemaDraft::Draft201909 => jsonschema::Draft::Draft201909,
            SchemaDraft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

/// Configuration read once per batch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeParameters {
    /// Raw JSON Schema text.
    pub json_schema: String,
    /// Top-level field to validate instead of the whole record.
    /// Empty means the whole record.
    pub data_path_to_validate: String,
}

impl Default for NodeParameters {
    fn default() -> Self {
        Self {
            json_schema: default_schema_text(),
            data_path_to_validate: String::new(),
        }
    }
}

impl NodeParameters {
    pub fn new(json_schema: impl Into<String>) -> Self {
        Self {
            json_schema: json_schema.into(),
            data_path_to_validate: String::new(),
        }
    }

    /// Validate the named top-level field instead of the whole record.
    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path_to_validate = path.into();
        self
    }

    /// The configured data path, or `None` when the whole record is validated.
    pub fn data_path_to_validate(&self) -> Option<&str> {
        if self.data_path_to_validate.is_empty() {
            None
        } else {
            Some(&self.data_path_to_validate)
        }
    }
}
