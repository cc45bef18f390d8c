//! JSON Validator CLI
//!
//! Command-line host for validating record batches against a JSON Schema.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use json_validator_node::{
    compile_schema_text, default_schema_text, load_items, load_schema_text, FailurePolicy,
    JsonSchemaCompiler, JsonValidatorNode, NodeErrorKind, NodeParameters, SchemaDraft,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "json-validator")]
#[command(about = "Validate JSON records against a JSON Schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every record of a batch and print the output batch
    Validate {
        /// Items file: a JSON array of objects, or a single object
        items: PathBuf,

        #[command(flatten)]
        schema: SchemaArgs,

        /// Validate this top-level field instead of the whole record
        #[arg(long, default_value = "")]
        data_path: String,

        /// Emit error records for invalid items instead of failing
        #[arg(long)]
        continue_on_fail: bool,

        /// Node name used when reporting errors
        #[arg(long, default_value = json_validator_node::DEFAULT_NODE_NAME)]
        name: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Report errors as JSON on stdout (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Check that a schema parses and compiles
    CheckSchema {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Report the result as JSON on stdout (for automation)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SchemaArgs {
    /// Schema file
    #[arg(long, conflicts_with_all = ["schema_text", "default_schema"])]
    schema: Option<PathBuf>,

    /// Schema given inline as JSON text
    #[arg(long, conflicts_with = "default_schema")]
    schema_text: Option<String>,

    /// Use the built-in example schema
    #[arg(long)]
    default_schema: bool,

    /// Pin the JSON Schema draft (4, 6, 7, 2019-09, 2020-12); detected from $schema otherwise
    #[arg(long, value_parser = parse_draft)]
    draft: Option<SchemaDraft>,
}

impl SchemaArgs {
    /// Raw schema text; empty when no source was given.
    fn text(&self) -> Result<String, json_validator_node::LoadError> {
        if let Some(path) = &self.schema {
            load_schema_text(path)
        } else if let Some(text) = &self.schema_text {
            Ok(text.clone())
        } else if self.default_schema {
            Ok(default_schema_text())
        } else {
            Ok(String::new())
        }
    }

    fn compiler(&self) -> JsonSchemaCompiler {
        match self.draft {
            Some(draft) => JsonSchemaCompiler::new().with_draft(draft),
            None => JsonSchemaCompiler::new(),
        }
    }
}

fn parse_draft(s: &str) -> Result<SchemaDraft, String> {
    SchemaDraft::parse(s).ok_or_else(|| {
        format!(
            "unknown draft \"{}\": expected 4, 6, 7, 2019-09 or 2020-12",
            s
        )
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            items,
            schema,
            data_path,
            continue_on_fail,
            name,
            output,
            pretty,
            json,
        } => run_validate(ValidateArgs {
            items,
            schema,
            data_path,
            policy: FailurePolicy::from_continue_flag(continue_on_fail),
            name,
            output,
            pretty,
            json_output: json,
        }),

        Commands::CheckSchema { schema, json } => run_check_schema(&schema, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct ValidateArgs {
    items: PathBuf,
    schema: SchemaArgs,
    data_path: String,
    policy: FailurePolicy,
    name: String,
    output: Option<PathBuf>,
    pretty: bool,
    json_output: bool,
}

fn run_validate(args: ValidateArgs) -> Result<(), u8> {
    let ValidateArgs {
        items: items_path,
        schema,
        data_path,
        policy,
        name,
        output,
        pretty,
        json_output,
    } = args;

    let items = load_items(&items_path).map_err(|e| {
        report_error(json_output, &format!("loading items: {}", e), None);
        e.exit_code() as u8
    })?;

    // An empty batch never looks at the schema, so don't require one.
    let schema_text = if items.is_empty() {
        String::new()
    } else {
        schema.text().map_err(|e| {
            report_error(json_output, &format!("loading schema: {}", e), None);
            e.exit_code() as u8
        })?
    };

    let parameters = NodeParameters::new(schema_text).data_path(data_path);
    let node = JsonValidatorNode::with_compiler(parameters, schema.compiler()).named(name);

    let records = node.execute(&items, policy).map_err(|e| {
        let details = match &e.kind {
            NodeErrorKind::Item(item) => Some(serde_json::json!({
                "item": item.index,
                "errors": item.issues,
            })),
            NodeErrorKind::Schema(_) => None,
        };
        report_error(json_output, &e.to_string(), details);
        e.exit_code() as u8
    })?;

    let rendered = if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    write_output(output.as_deref(), &rendered)
}

fn run_check_schema(schema: &SchemaArgs, json_output: bool) -> Result<(), u8> {
    let text = schema.text().map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e), None);
        e.exit_code() as u8
    })?;

    match compile_schema_text(&schema.compiler(), &text) {
        Ok(_) => {
            if json_output {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("Valid schema");
            }
            Ok(())
        }
        Err(e) => {
            let details = serde_json::json!({ "detail": e.detail() });
            report_error(json_output, &e.to_string(), Some(details));
            Err(2)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), u8> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|e| {
            eprintln!("Error writing to {}: {}", path.display(), e);
            3u8
        }),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str, details: Option<serde_json::Value>) {
    if json_output {
        let mut report = serde_json::json!({ "ok": false, "error": msg });
        if let (Some(serde_json::Value::Object(extra)), Some(obj)) =
            (details, report.as_object_mut())
        {
            obj.extend(extra);
        }
        println!("{}", report);
    } else {
        eprintln!("Error: {}", msg);
        if let Some(detail) = details.as_ref().and_then(|d| d.get("detail")) {
            eprintln!("  {}", detail.as_str().unwrap_or_default());
        }
    }
}
