//! The diagnostic type carried in the parse output.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::Span,
};

/// A warning about skipped input, with source location.
///
/// ```text
/// warning[W102]: unsupported arrow `-.-`
///   --> input.puml:7:1
///    |
///  7 | A -.- B
///    | ^^^^^^^ relationship dropped
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("warning")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::warning("unbalanced `}`")
            .with_code(ErrorCode::W103)
            .with_label(Span::new(40..41), "nothing to close")
            .with_secondary_label(Span::new(0..12), "last block closed here")
            .with_help("remove the extra `}`");

        assert_eq!(diag.code(), Some(ErrorCode::W103));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(40..41)));
        assert_eq!(diag.help(), Some("remove the extra `}`"));
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("unrecognized line");
        assert_eq!(diag.to_string(), "warning: unrecognized line");
    }
}
