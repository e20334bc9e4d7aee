use serde::{Deserialize, Serialize};

/// How severe a diagnostic is. The frontend only ever emits these two
/// levels; the parse always produces a program, so there is no fatal tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// A single parse diagnostic. Diagnostics are batched: every layer of the
/// frontend appends to one collection, and the caller receives the whole
/// batch alongside the best-effort AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: DiagnosticSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: u32, column: u32) -> Self {
        Diagnostic {
            message: message.into(),
            severity: DiagnosticSeverity::Error,
            location: Some(Location { line, column }),
        }
    }

    pub fn warning(message: impl Into<String>, line: u32, column: u32) -> Self {
        Diagnostic {
            message: message.into(),
            severity: DiagnosticSeverity::Warning,
            location: Some(Location { line, column }),
        }
    }
}
