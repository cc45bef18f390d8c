//! JSON Validator Node
//!
//! Per-item JSON Schema validation for batches of workflow records.
//!
//! A schema is compiled once per batch, then every record (or one top-level
//! field of it) is checked in order. Valid records are forwarded; invalid ones
//! either abort the batch or, with continue-on-fail, become error records.
//!
//! # Example
//!
//! ```
//! use json_validator_node::{parse_items, FailurePolicy, JsonValidatorNode, NodeParameters};
//! use serde_json::json;
//!
//! let schema = r#"{
//!     "type": "object",
//!     "properties": { "foo": { "type": "integer" } },
//!     "required": ["foo"],
//!     "additionalProperties": false
//! }"#;
//!
//! let node = JsonValidatorNode::new(NodeParameters::new(schema));
//! let items = parse_items(r#"[{"foo": 1}, {"bar": "x"}]"#).unwrap();
//!
//! let output = node.execute(&items, FailurePolicy::ContinueOnFail).unwrap();
//! assert_eq!(output[0].json, json!({ "foo": 1 }));
//! assert!(output[1].json["message"]
//!     .as_str()
//!     .unwrap()
//!     .starts_with("Validation failed for item 2:"));
//! ```
//!
//! # Outcomes
//!
//! | Item | Abort | ContinueOnFail |
//! |------|-------|----------------|
//! | valid | forwarded | forwarded |
//! | invalid | batch fails, nothing emitted | `{ error, message }` record |
//!
//! With a data path set, a valid item is forwarded as `{ <path>: <value> }`
//! and its other fields are dropped.

mod compiler;
mod error;
mod loader;
mod node;
mod processor;
mod types;

pub use compiler::{
    compile_schema_text, CompiledValidator, JsonSchemaCompiler, JsonSchemaValidator,
    SchemaCompiler, ValidationOutcome,
};
pub use error::{
    ItemError, LoadError, NodeError, NodeErrorKind, SchemaError, ValidationIssue,
    INVALID_SCHEMA_MESSAGE,
};
pub use loader::{load_items, load_schema_text, parse_items};
pub use node::JsonValidatorNode;
pub use processor::{format_issues, process_items, select_datum, ISSUE_SEPARATOR};
pub use types::{
    default_schema_text, json_type_name, FailurePolicy, InputRecord, NodeParameters,
    OutputRecord, PairedItem, SchemaDraft, DEFAULT_NODE_NAME,
};
