//! The validator node: configuration plus one batch execution.

use crate::compiler::{compile_schema_text, JsonSchemaCompiler, SchemaCompiler};
use crate::error::NodeError;
use crate::processor::process_items;
use crate::types::{FailurePolicy, InputRecord, NodeParameters, OutputRecord, DEFAULT_NODE_NAME};

/// A configured JSON Schema validation node.
#[derive(Debug, Clone)]
pub struct JsonValidatorNode<C = JsonSchemaCompiler> {
    name: String,
    parameters: NodeParameters,
    compiler: C,
}

impl Default for JsonValidatorNode {
    fn default() -> Self {
        Self::new(NodeParameters::default())
    }
}

impl JsonValidatorNode {
    pub fn new(parameters: NodeParameters) -> Self {
        Self::with_compiler(parameters, JsonSchemaCompiler::new())
    }
}

impl<C: SchemaCompiler> JsonValidatorNode<C> {
    /// Use a different validation engine.
    pub fn with_compiler(parameters: NodeParameters, compiler: C) -> Self {
        Self {
            name: DEFAULT_NODE_NAME.to_string(),
            parameters,
            compiler,
        }
    }

    /// Set the name errors are attributed to.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &NodeParameters {
        &self.parameters
    }

    /// Validate one batch.
    ///
    /// An empty batch returns immediately without looking at the schema.
    /// Otherwise the schema is compiled once and every item is checked
    /// against it in order.
    ///
    /// # Errors
    ///
    /// Returns `NodeError` carrying `SchemaError` if the schema is missing or
    /// does not compile, or `ItemError` for the first invalid item when
    /// `policy` does not tolerate failures.
    pub fn execute(
        &self,
        items: &[InputRecord],
        policy: FailurePolicy,
    ) -> Result<Vec<OutputRecord>, NodeError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let validator = compile_schema_text(&self.compiler, &self.parameters.json_schema)
            .map_err(|e| {
                tracing::debug!(node = %self.name, detail = %e.detail(), "schema rejected");
                NodeError::new(&self.name, e)
            })?;

        tracing::debug!(node = %self.name, items = items.len(), "validating batch");

        process_items(
            &validator,
            items,
            self.parameters.data_path_to_validate(),
            policy,
        )
        .map_err(|e| NodeError::new(&self.name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompiledValidator, ValidationOutcome};
    use crate::error::{NodeErrorKind, SchemaError};
    use serde_json::{json, Value};
    use std::cell::Cell;

    /// Counts compilations and accepts everything.
    #[derive(Default)]
    struct CountingCompiler {
        calls: Cell<usize>,
    }

    struct AcceptAll;

    impl CompiledValidator for AcceptAll {
        fn validate(&self, _data: &Value) -> ValidationOutcome {
            ValidationOutcome::Valid
        }
    }

    impl SchemaCompiler for CountingCompiler {
        type Validator = AcceptAll;

        fn compile(&self, _schema: &Value) -> Result<AcceptAll, SchemaError> {
            self.calls.set(self.calls.get() + 1);
            Ok(AcceptAll)
        }
    }

    fn items(n: usize) -> Vec<InputRecord> {
        (0..n)
            .map(|i| {
                let mut map = serde_json::Map::new();
                map.insert("foo".into(), json!(i));
                InputRecord::new(map).paired(i)
            })
            .collect()
    }

    #[test]
    fn default_node_uses_default_schema() {
        let node: JsonValidatorNode = JsonValidatorNode::default();
        assert_eq!(node.name(), "Json Validator");
        assert!(node.parameters().json_schema.contains("\"foo\""));

        let output = node.execute(&items(2), FailurePolicy::Abort).unwrap();
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn compiles_once_per_batch() {
        let node =
            JsonValidatorNode::with_compiler(NodeParameters::new("{}"), CountingCompiler::default());
        let output = node.execute(&items(5), FailurePolicy::Abort).unwrap();

        assert_eq!(output.len(), 5);
        assert_eq!(node.compiler.calls.get(), 1);
    }

    #[test]
    fn empty_batch_skips_compilation() {
        let node =
            JsonValidatorNode::with_compiler(NodeParameters::new(""), CountingCompiler::default());
        let output = node.execute(&[], FailurePolicy::Abort).unwrap();

        assert!(output.is_empty());
        assert_eq!(node.compiler.calls.get(), 0);
    }

    #[test]
    fn missing_schema_never_reaches_compiler() {
        let node =
            JsonValidatorNode::with_compiler(NodeParameters::new(""), CountingCompiler::default());
        let err = node.execute(&items(1), FailurePolicy::Abort).unwrap_err();

        assert_eq!(err.to_string(), "Invalid JSON Schema");
        assert!(matches!(err.kind, NodeErrorKind::Schema(SchemaError::Missing)));
        assert_eq!(node.compiler.calls.get(), 0);
    }

    #[test]
    fn errors_are_attributed_to_node() {
        let node = JsonValidatorNode::new(NodeParameters::new(r#"{"required":["bar"]}"#))
            .named("Check orders");
        let err = node.execute(&items(3), FailurePolicy::Abort).unwrap_err();

        assert_eq!(err.node, "Check orders");
        assert_eq!(err.item_index(), Some(0));
        assert!(err.to_string().starts_with("Validation failed for item 1: "));
    }
}
