// cardcheck/xtask/src/main.rs

use anyhow::{Context, Result};
use cardcheck::{document::ROOT_KEY, Field, Validator};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::{collections::BTreeSet, fs, path::PathBuf, process::ExitCode};

const CARDS_SCHEMA: &str = include_str!("../../schemas/cards.schema.json");

#[derive(Parser)]
#[command(name = "xtask", about = "cardcheck workspace tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Check a cards file against schemas/cards.schema.json, then run the cardcheck rules on it
    ValidateSchema {
        file: PathBuf,
        /// Stop after the schema pass
        #[arg(long)]
        shape_only: bool,
    },
    /// Fail when the schema's card properties and cardcheck's field set disagree
    SchemaSync,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let schema = cards_schema()?;
    let problems = match cli.cmd {
        Cmd::ValidateSchema { file, shape_only } => {
            let text = fs::read_to_string(&file).with_context(|| format!("read {}", file.display()))?;
            let data: Value = serde_json::from_str(&text).with_context(|| format!("parse {}", file.display()))?;
            let mut problems = shape_errors(&schema, &data)?;
            if problems.is_empty() && !shape_only {
                problems = Validator::default().validate_value(data).messages();
            }
            problems
        }
        Cmd::SchemaSync => schema_drift(&schema),
    };
    if problems.is_empty() {
        println!("OK");
        return Ok(ExitCode::SUCCESS);
    }
    for p in problems { eprintln!("- {p}"); }
    Ok(ExitCode::from(1))
}

fn cards_schema() -> Result<Value> {
    serde_json::from_str(CARDS_SCHEMA).context("parse cards schema")
}

fn shape_errors(schema: &Value, data: &Value) -> Result<Vec<String>> {
    let compiled = jsonschema::validator_for(schema)?;
    Ok(compiled.iter_errors(data).map(|e| e.to_string()).collect())
}

/// Differences between the schema and the fields `Card` reads.
fn schema_drift(schema: &Value) -> Vec<String> {
    let mut out = Vec::new();
    let required_root = schema["required"].as_array().is_some_and(|r| r.iter().any(|k| k.as_str() == Some(ROOT_KEY)));
    if !required_root { out.push(format!("schema does not require `{ROOT_KEY}`")); }

    let in_schema: BTreeSet<&str> = schema["$defs"]["card"]["properties"]
        .as_object()
        .map(|props| props.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let known: BTreeSet<&str> = Field::ALL.iter().map(|f| f.key()).collect();
    for k in known.difference(&in_schema) { out.push(format!("field `{k}` missing from schema")); }
    for k in in_schema.difference(&known) { out.push(format!("schema property `{k}` is not a card field")); }
    out
}
