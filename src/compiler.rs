//! Schema compilation.
//!
//! The validation engine sits behind two operations: [`SchemaCompiler::compile`]
//! turns a parsed schema into a [`CompiledValidator`], and
//! [`CompiledValidator::validate`] checks one value against it. The default
//! engine is the `jsonschema` crate via [`JsonSchemaCompiler`].

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

use crate::error::{SchemaError, ValidationIssue};
use crate::types::SchemaDraft;

/// Result of checking one value against a compiled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// Never empty.
    Invalid(Vec<ValidationIssue>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// A reusable, read-only checker produced from one schema.
pub trait CompiledValidator {
    fn validate(&self, data: &Value) -> ValidationOutcome;
}

/// Turns a parsed schema document into a [`CompiledValidator`].
pub trait SchemaCompiler {
    type Validator: CompiledValidator;

    /// # Errors
    ///
    /// Returns `SchemaError::Compile` if the engine rejects the schema.
    fn compile(&self, schema: &Value) -> Result<Self::Validator, SchemaError>;
}

/// Compiler backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaCompiler {
    draft: Option<SchemaDraft>,
}

impl JsonSchemaCompiler {
    /// Detect the draft from `$schema`, falling back to the engine default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin every compiled schema to one draft.
    pub fn with_draft(mut self, draft: SchemaDraft) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn draft(&self) -> Option<SchemaDraft> {
        self.draft
    }
}

impl SchemaCompiler for JsonSchemaCompiler {
    type Validator = JsonSchemaValidator;

    fn compile(&self, schema: &Value) -> Result<JsonSchemaValidator, SchemaError> {
        let mut options = jsonschema::options();
        if let Some(draft) = self.draft {
            options.with_draft(draft.to_engine());
        }

        let inner = options.build(schema).map_err(|e| SchemaError::Compile {
            message: e.to_string(),
        })?;

        Ok(JsonSchemaValidator { inner })
    }
}

/// A schema compiled by [`JsonSchemaCompiler`].
pub struct JsonSchemaValidator {
    inner: jsonschema::Validator,
}

impl std::fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchemaValidator").finish_non_exhaustive()
    }
}

impl CompiledValidator for JsonSchemaValidator {
    fn validate(&self, data: &Value) -> ValidationOutcome {
        let issues: Vec<ValidationIssue> = self
            .inner
            .iter_errors(data)
            .map(|e| {
                let schema_path = e.schema_path.to_string();
                let keyword = match e.kind {
                    ValidationErrorKind::FalseSchema => "false".to_string(),
                    _ => keyword_from_schema_path(&schema_path),
                };
                ValidationIssue {
                    instance_path: e.instance_path.to_string(),
                    keyword,
                    schema_path,
                    message: e.to_string(),
                }
            })
            .collect();

        if issues.is_empty() {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid(issues)
        }
    }
}

/// The keyword a schema path ends in.
///
/// Boolean `false` subschemas are reported by error kind, not by path; their
/// path ends in a property name or is empty at the root.
fn keyword_from_schema_path(schema_path: &str) -> String {
    match schema_path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.replace("~1", "/").replace("~0", "~"),
        _ => "false".to_string(),
    }
}

/// Parse raw schema text and compile it.
///
/// # Errors
///
/// Returns `SchemaError::Missing` for empty text, `SchemaError::InvalidJson`
/// for malformed JSON, or whatever the compiler reports. All of them display
/// as "Invalid JSON Schema".
pub fn compile_schema_text<C: SchemaCompiler>(
    compiler: &C,
    text: &str,
) -> Result<C::Validator, SchemaError> {
    if text.is_empty() {
        return Err(SchemaError::Missing);
    }

    let schema: Value =
        serde_json::from_str(text).map_err(|source| SchemaError::InvalidJson { source })?;

    let validator = compiler.compile(&schema)?;
    tracing::debug!(declared = ?schema.get("$schema"), "compiled JSON schema");
    Ok(validator)
}
