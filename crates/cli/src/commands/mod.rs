pub(crate) mod check;
pub(crate) mod parse;

use std::path::Path;
use std::process;

use manifest_core::Diagnostic;

/// Read a source file, or exit 2 — an unreadable input is an environment
/// problem, distinct from exit 1 for source-level diagnostics.
pub(crate) fn read_source(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", file.display(), e);
            process::exit(2);
        }
    }
}

/// One diagnostic as a `line:col: severity: message` line.
pub(crate) fn render(diagnostic: &Diagnostic) -> String {
    let severity = match diagnostic.severity {
        manifest_core::DiagnosticSeverity::Error => "error",
        manifest_core::DiagnosticSeverity::Warning => "warning",
    };
    match diagnostic.location {
        Some(location) => format!(
            "{}:{}: {}: {}",
            location.line, location.column, severity, diagnostic.message
        ),
        None => format!("{}: {}", severity, diagnostic.message),
    }
}
