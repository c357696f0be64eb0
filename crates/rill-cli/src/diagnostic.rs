// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic rendering using miette.
//!
//! Converts rill-core diagnostics into miette reports with source context
//! and a labeled span. Line and column numbers are not stored in spans;
//! miette derives them from the source text handed over here.
//!
//! Stream and exit discipline: notes go to standard output, warnings and
//! errors to standard error, and a fatal diagnostic terminates the process
//! with exit code 1 after rendering.

use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use rill_core::source_analysis::{Diagnostic, Severity};

/// A compilation diagnostic with source context for rendering.
#[derive(Debug, MietteDiagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(rill::compile))]
pub struct RenderDiagnostic {
    /// Error, warning, or note.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Source code for context.
    #[source_code]
    pub src: miette::NamedSource<String>,
    /// Location of the problem.
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label shown at the span.
    pub label: String,
}

impl RenderDiagnostic {
    /// Builds a renderable diagnostic from a core diagnostic and the file's
    /// source text.
    #[must_use]
    pub fn from_core(diagnostic: &Diagnostic, source_path: &str, source: &str) -> Self {
        let label = match diagnostic.severity {
            Severity::Note => "note here",
            Severity::Warning => "warning here",
            Severity::Error | Severity::Fatal => "error here",
        };

        Self {
            severity: diagnostic.severity,
            message: diagnostic.message.to_string(),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: (&diagnostic.span).into(),
            label: label.to_string(),
        }
    }
}

/// Renders one diagnostic to the stream its severity calls for.
///
/// Exits the process with code 1 after rendering a fatal diagnostic.
pub fn render(diagnostic: &Diagnostic, source_path: &str, source: &str) {
    let rendered = RenderDiagnostic::from_core(diagnostic, source_path, source);
    let severity = rendered.severity;
    let report = miette::Report::new(rendered);

    if severity == Severity::Note {
        println!("{report:?}");
    } else {
        eprintln!("{report:?}");
    }

    if severity == Severity::Fatal {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_core::source_analysis::SourceSpan as CoreSpan;

    #[test]
    fn from_core_carries_span_and_message() {
        let core = Diagnostic::error("expected expression", CoreSpan::new("t.rl", 10, 5));
        let rendered = RenderDiagnostic::from_core(&core, "t.rl", "var x = broken here");

        assert_eq!(rendered.severity, Severity::Error);
        assert_eq!(rendered.message, "expected expression");
        assert_eq!(rendered.span.offset(), 10);
        assert_eq!(rendered.span.len(), 5);
        assert_eq!(rendered.label, "error here");
    }

    #[test]
    fn note_label_differs() {
        let core = Diagnostic::note("consider removing 'extern'", CoreSpan::new("t.rl", 0, 6));
        let rendered = RenderDiagnostic::from_core(&core, "t.rl", "extern x");
        assert_eq!(rendered.label, "note here");
    }
}
