//! Diagnostics for static errors found while lowering.
//!
//! Static checking never fails fast: each offending relation aborts its own
//! construction and deposits a [`Diagnostic`] in the sink, so one
//! compilation run surfaces as many errors as possible.

use serde::{Deserialize, Serialize};
use treelogic_ir::SourceSpan;

/// Diagnostic level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub help: Option<String>,
    pub related: Vec<(String, Option<SourceSpan>)>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Error,
            message: message.into(),
            span: None,
            help: None,
            related: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Warning,
            message: message.into(),
            span: None,
            help: None,
            related: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_related(mut self, msg: impl Into<String>, span: Option<SourceSpan>) -> Self {
        self.related.push((msg.into(), span));
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut output = String::new();

        let level_str = match self.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
        };

        if let Some(ref span) = self.span {
            output.push_str(&format!("{}: {}: {}\n", level_str, span, self.message));
        } else {
            output.push_str(&format!("{}: {}\n", level_str, self.message));
        }

        if let Some(ref help) = self.help {
            output.push_str(&format!("  help: {}\n", help));
        }

        for (msg, span_opt) in &self.related {
            if let Some(span) = span_opt {
                output.push_str(&format!("  note: {}: {}\n", span, msg));
            } else {
                output.push_str(&format!("  note: {}\n", msg));
            }
        }

        output
    }
}

/// Collecting reporter for one compilation run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
            .count()
    }

    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.format())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
