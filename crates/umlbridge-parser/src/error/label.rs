//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the source text.
///
/// Primary labels mark the line that was skipped; secondary labels point at
/// related context such as the block a stray `}` was expected to close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}
