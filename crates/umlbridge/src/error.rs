//! Error types for umlbridge operations.
//!
//! Parsing and layout never fail as a whole: skipped lines are reported as
//! diagnostics and store failures for single elements are logged. The
//! [`BridgeError`] type only covers the outer surfaces.

use std::io;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// The main error type for umlbridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for BridgeError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
