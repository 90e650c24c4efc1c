//! umlbridge - converts between PlantUML-like text and UML models.
//!
//! Export walks the selected model elements and writes diagram text.
//! Import parses diagram text into model elements, creates a diagram of the
//! detected type if needed and lays the new elements out on it.
//!
//! The model and the diagrams stay with the host, reached through the
//! [`ModelStore`] and [`ViewStore`] traits from `umlbridge-core`.

pub mod clipboard;
pub mod config;
pub mod export;
pub mod import;
pub mod layout;
pub mod serialize;

mod error;

pub use umlbridge_core::{color, geometry, identifier, model, store, view};
pub use umlbridge_parser::{Diagnostic, ParseOutput, classifier, detect_diagram_kind};

pub use error::BridgeError;
pub use import::ImportOutcome;

use log::{info, warn};

use umlbridge_core::{
    model::ElementId,
    store::{ModelStore, ViewStore},
};

use clipboard::Clipboard;
use config::AppConfig;
use export::{Exporter, svg::SvgBuilder};
use layout::LayoutReport;

/// Entry point for the export and import commands.
///
/// # Examples
///
/// ```
/// use umlbridge::{Bridge, clipboard::MemoryClipboard, store::MemoryWorkspace};
///
/// let bridge = Bridge::default();
/// let mut workspace = MemoryWorkspace::new("Zoo");
/// let mut clipboard = MemoryClipboard::with_text(
///     "@startuml\nclass Animal\nclass Dog\nAnimal <|-- Dog\n@enduml",
/// );
///
/// let outcome = bridge
///     .import_clipboard(&mut workspace, &mut clipboard)
///     .expect("import succeeds")
///     .expect("clipboard holds text");
/// assert_eq!(outcome.layout.entries.len(), 2);
/// assert_eq!(outcome.layout.relationships.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Bridge {
    config: AppConfig,
}

impl Bridge {
    /// Create a new bridge with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serializes `elements` to diagram text.
    pub fn export_to_text<S>(&self, store: &S, elements: &[ElementId]) -> String
    where
        S: ModelStore + ?Sized,
    {
        serialize::to_text(store, elements)
    }

    /// Serializes the current selection and puts the text on the clipboard.
    ///
    /// Returns the written text.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Clipboard`] if the clipboard cannot be written.
    pub fn export_selection<S, C>(&self, store: &S, clipboard: &mut C) -> Result<String, BridgeError>
    where
        S: ModelStore + ?Sized,
        C: Clipboard + ?Sized,
    {
        let selection = store.current_selection();
        info!(selected = selection.len(); "Exporting selection");

        let text = self.export_to_text(store, &selection);
        clipboard.write(&text)?;
        Ok(text)
    }

    /// Imports `text` into the store and lays it out on a diagram.
    ///
    /// New top-level elements go under the first selected element, or the
    /// project root. The current diagram is reused when it has the detected
    /// type; otherwise a new one is created and opened. If the store refuses
    /// a new diagram, the elements land on whatever diagram is current, or
    /// stay unplaced when there is none.
    ///
    /// Problems with single lines, elements or relationships never abort
    /// the import; see [`ImportOutcome::diagnostics`] and the
    /// [`LayoutReport`].
    pub fn import_text<S>(&self, store: &mut S, text: &str) -> ImportOutcome
    where
        S: ModelStore + ViewStore + ?Sized,
    {
        import::import_text(store, text, self.config.layout())
    }

    /// Imports the clipboard text. Returns `Ok(None)` when the clipboard is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Clipboard`] if the clipboard cannot be read.
    pub fn import_clipboard<S, C>(
        &self,
        store: &mut S,
        clipboard: &mut C,
    ) -> Result<Option<ImportOutcome>, BridgeError>
    where
        S: ModelStore + ViewStore + ?Sized,
        C: Clipboard + ?Sized,
    {
        match clipboard.read()? {
            Some(text) if !text.trim().is_empty() => Ok(Some(self.import_text(store, &text))),
            _ => {
                warn!("Clipboard is empty, nothing to import");
                Ok(None)
            }
        }
    }

    /// Renders the result of a layout as an SVG preview.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Export`] if the style configuration is
    /// invalid.
    pub fn render_svg<S>(&self, store: &S, layout: &LayoutReport) -> Result<String, BridgeError>
    where
        S: ModelStore + ?Sized,
    {
        let svg = SvgBuilder::new().with_style(self.config.style()).build()?;
        Ok(svg.render(store, layout).to_string())
    }

    /// Writes an SVG preview of `layout` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Export`] if the style configuration is
    /// invalid or the file cannot be written.
    pub fn write_svg<S>(
        &self,
        store: &S,
        layout: &LayoutReport,
        path: impl Into<std::path::PathBuf>,
    ) -> Result<(), BridgeError>
    where
        S: ModelStore + ?Sized,
    {
        let mut svg = SvgBuilder::new()
            .with_output(path)
            .with_style(self.config.style())
            .build()?;
        svg.export_layout(store, layout)?;
        Ok(())
    }
}
