use std::fmt;

use serde::Serialize;

use crate::model::Mode;
use crate::sidecar::SidecarError;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Marker key absent from its mode's namespace; rendered as plain text
    UnresolvedMarker { mode: Mode, key: String },
    /// Sidecar exists but is unusable; the document was left untouched
    SidecarMalformed,
}

/// A problem found while transforming one document
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    pub document: String,
    pub message: String,
}

impl Diagnostic {
    pub fn unresolved_marker(document: &str, mode: Mode, key: &str) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!("unresolved annotation {}:{}", mode, key),
            kind: DiagnosticKind::UnresolvedMarker {
                mode,
                key: key.to_string(),
            },
            document: document.to_string(),
        }
    }

    pub fn sidecar_malformed(document: &str, err: &SidecarError) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::SidecarMalformed,
            document: document.to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.severity.as_str(),
            self.document,
            self.message
        )
    }
}
