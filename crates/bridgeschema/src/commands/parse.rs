//! Parse command - print the schema and diagnostics for a single spec file.

use super::report_fault;
use anyhow::Context;
use bridgeschema_modules::{FileError, module_name_from_path, parse_module_source};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

/// Parse command arguments
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Spec file to parse
    pub file: PathBuf,

    /// Module name (default: derived from the file name)
    #[arg(long)]
    pub module_name: Option<String>,

    /// Print the JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Parse one spec file into `{ moduleName, schema, diagnostics }`.
///
/// `schema` is null when the file declares no module. A fatal fault is
/// returned as an error.
pub fn parse(args: &ParseArgs) -> Result<serde_json::Value, FileError> {
    let module_name = args
        .module_name
        .clone()
        .unwrap_or_else(|| module_name_from_path(&args.file));
    let source = std::fs::read_to_string(&args.file)?;

    let value = match parse_module_source(&module_name, &source)? {
        Some(parse) => {
            let diagnostics: Vec<_> = parse.errors.iter().map(|e| e.diagnostic()).collect();
            json!({
                "moduleName": module_name,
                "schema": parse.schema,
                "diagnostics": diagnostics,
            })
        }
        None => json!({
            "moduleName": module_name,
            "schema": null,
            "diagnostics": [],
        }),
    };
    Ok(value)
}

fn render(value: &serde_json::Value, compact: bool) -> anyhow::Result<String> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    text.context("failed to serialize schema")
}

/// Run the parse command
pub fn run(args: ParseArgs) -> i32 {
    let value = match parse(&args) {
        Ok(value) => value,
        Err(FileError::Parser(error)) => {
            report_fault(&args.file, &error, "error");
            return 1;
        }
        Err(e) => {
            eprintln!("{}: error: {}", args.file.display(), e);
            return 1;
        }
    };
    match render(&value, args.compact) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    }
}
