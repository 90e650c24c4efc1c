//! Adapters for rendering umlbridge errors and parse warnings with miette.
//!
//! Imports never fail because of a bad line; the parser reports each skipped
//! line as a warning [`Diagnostic`], rendered through [`WarningAdapter`]
//! against the imported text. A [`BridgeError`] that stops a command is
//! rendered through [`ErrorAdapter`], which has no source to point into.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity, SourceSpan};

use umlbridge::BridgeError;
use umlbridge_parser::error::Diagnostic;

/// A parse warning together with the text it was reported for.
pub struct WarningAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> WarningAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }

    /// One adapter per diagnostic, in report order.
    pub fn all(diagnostics: &'a [Diagnostic], src: &'a str) -> impl Iterator<Item = Self> + 'a {
        diagnostics.iter().map(move |diag| Self::new(diag, src))
    }
}

impl fmt::Debug for WarningAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarningAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for WarningAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for WarningAdapter<'_> {}

impl MietteDiagnostic for WarningAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = self.diag.code()?;
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Warning)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = self.diag.help()?;
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = SourceSpan::new(label.span().start().into(), label.span().len());
            let text = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(text, span)
            } else {
                LabeledSpan::new_with_span(text, span)
            }
        })))
    }
}

/// A [`BridgeError`] that stopped a command.
pub struct ErrorAdapter<'a>(pub &'a BridgeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            BridgeError::Io(_) => "umlbridge::io",
            BridgeError::Clipboard(_) => "umlbridge::clipboard",
            BridgeError::Export(_) => "umlbridge::export",
            BridgeError::Config(_) => "umlbridge::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            BridgeError::Config(_) => Some(Box::new(
                "check the file given with --config, or remove it to use the defaults",
            )),
            BridgeError::Clipboard(_) => Some(Box::new("use `-` to read from standard input")),
            _ => None,
        }
    }
}
