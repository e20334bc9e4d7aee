use std::path::Path;
use std::process;

use manifest_core::DiagnosticSeverity;

use crate::commands::{read_source, render};
use crate::OutputFormat;

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let source = read_source(file);
    let result = manifest_core::parse(&source);

    match output {
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&result.errors)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            if result.errors.is_empty() {
                if !quiet {
                    println!("{}: no issues found", file.display());
                }
            } else {
                for diagnostic in &result.errors {
                    println!("{}", render(diagnostic));
                }
            }
        }
    }

    let has_errors = result
        .errors
        .iter()
        .any(|d| d.severity == DiagnosticSeverity::Error);
    if has_errors {
        process::exit(1);
    }
}
