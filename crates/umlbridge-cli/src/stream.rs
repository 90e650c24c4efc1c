//! A [`Clipboard`] backed by files and the standard streams.
//!
//! The CLI has no system clipboard; it reads the text to import from a file
//! (or stdin for `-`) and writes exported text to a file or stdout.

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use umlbridge::clipboard::{Clipboard, ClipboardError};

#[derive(Debug)]
enum Source {
    Stdin,
    File(PathBuf),
}

#[derive(Debug)]
pub struct StreamClipboard {
    source: Source,
    target: Option<PathBuf>,
    /// Last text read, kept for rendering warnings against it.
    text: String,
}

impl StreamClipboard {
    /// `input` is a path, or `-` for stdin. Writes go to `output`, or stdout.
    pub fn new(input: &str, output: Option<&str>) -> Self {
        let source = if input == "-" {
            Source::Stdin
        } else {
            Source::File(PathBuf::from(input))
        };
        Self {
            source,
            target: output.map(PathBuf::from),
            text: String::new(),
        }
    }

    /// The text returned by the last [`Clipboard::read`].
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Clipboard for StreamClipboard {
    fn read(&mut self) -> Result<Option<String>, ClipboardError> {
        self.text = match &self.source {
            Source::Stdin => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                text
            }
            Source::File(path) => fs::read_to_string(path)?,
        };
        Ok(Some(self.text.clone()).filter(|text| !text.is_empty()))
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        match &self.target {
            Some(path) => fs::write(path, text)?,
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{text}")?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
