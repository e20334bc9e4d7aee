use std::path::Path;
use std::process;

use manifest_core::DiagnosticSeverity;

use crate::commands::{read_source, render};
use crate::OutputFormat;

pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    let source = read_source(file);
    let result = manifest_core::parse(&source);

    let document = serde_json::json!({
        "program": result.program,
        "errors": result.errors,
    });
    let pretty = serde_json::to_string_pretty(&document)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);

    let has_errors = result
        .errors
        .iter()
        .any(|d| d.severity == DiagnosticSeverity::Error);
    if has_errors {
        if output == OutputFormat::Text && !quiet {
            for diagnostic in &result.errors {
                eprintln!("{}", render(diagnostic));
            }
        }
        process::exit(1);
    }
}
