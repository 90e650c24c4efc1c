//! Clipboard access for the export and import commands.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard is not available: {0}")]
    Unavailable(String),

    #[error("clipboard I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A text clipboard provided by the host.
pub trait Clipboard {
    /// Returns the clipboard text, or `None` when it holds no text.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError`] if the clipboard cannot be read.
    fn read(&mut self) -> Result<Option<String>, ClipboardError>;

    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError`] if the clipboard cannot be written.
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// A clipboard held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Result<Option<String>, ClipboardError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.read().unwrap(), None);

        clipboard.write("@startuml").unwrap();
        assert_eq!(clipboard.read().unwrap().as_deref(), Some("@startuml"));
        assert_eq!(clipboard.contents(), Some("@startuml"));
    }
}
