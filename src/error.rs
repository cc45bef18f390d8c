//! Error types for schema compilation, item validation and batch loading.

use std::path::PathBuf;
use thiserror::Error;

/// Message shared by every schema configuration failure.
pub const INVALID_SCHEMA_MESSAGE: &str = "Invalid JSON Schema";

/// Errors while turning schema text into a validator.
///
/// Every variant renders as the same message; the detail is kept for logs.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid JSON Schema")]
    Missing,

    #[error("Invalid JSON Schema")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON Schema")]
    Compile { message: String },
}

impl SchemaError {
    /// Underlying cause, for diagnostics only.
    pub fn detail(&self) -> String {
        match self {
            SchemaError::Missing => "schema text is empty".to_string(),
            SchemaError::InvalidJson { source } => format!("invalid JSON: {}", source),
            SchemaError::Compile { message } => message.clone(),
        }
    }
}

/// Single structured validation error reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// JSON Pointer (RFC 6901) to the invalid value; empty for the root.
    pub instance_path: String,
    /// JSON Pointer to the failing keyword inside the schema.
    pub schema_path: String,
    /// Keyword that was violated.
    pub keyword: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data{} {}", self.instance_path, self.message)
    }
}

/// An item that failed validation while failures were not tolerated.
#[derive(Debug, Clone, Error)]
#[error("Validation failed for item {}: {message}", index + 1)]
pub struct ItemError {
    /// 0-based position of the item in the batch.
    pub index: usize,
    /// Joined validation messages.
    pub message: String,
    pub issues: Vec<ValidationIssue>,
}

/// What went wrong while executing a node over a batch.
#[derive(Debug, Error)]
pub enum NodeErrorKind {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Item(#[from] ItemError),
}

/// A batch failure attributed to the node that raised it.
///
/// Displays as the bare inner message; the node name is diagnostics-only.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct NodeError {
    /// Name of the node the error belongs to.
    pub node: String,
    #[source]
    pub kind: NodeErrorKind,
}

impl NodeError {
    pub fn new(node: impl Into<String>, kind: impl Into<NodeErrorKind>) -> Self {
        Self {
            node: node.into(),
            kind: kind.into(),
        }
    }

    /// 0-based index of the failing item, if the failure was item-level.
    pub fn item_index(&self) -> Option<usize> {
        match &self.kind {
            NodeErrorKind::Item(e) => Some(e.index),
            NodeErrorKind::Schema(_) => None,
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            NodeErrorKind::Item(_) => 1,
            NodeErrorKind::Schema(_) => 2,
        }
    }
}

/// Errors while reading schema text or input batches.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("item {index} must be an object, got {actual}")]
    InvalidItem { index: usize, actual: String },

    #[error("input must be an object or an array of objects, got {actual}")]
    InvalidBatch { actual: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}
