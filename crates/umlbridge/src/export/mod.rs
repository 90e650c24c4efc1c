//! Export of laid-out diagrams for preview.
//!
//! The host normally draws the views itself. When there is no host (the
//! CLI, tests) an [`Exporter`] turns a [`LayoutReport`] into a file so the
//! computed layout can be inspected.
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]

pub mod svg;

use std::fmt;

use umlbridge_core::store::ModelStore;

use crate::layout::LayoutReport;

/// Abstraction for preview backends.
pub trait Exporter {
    /// Exports the placed elements and relationships of `layout`. Names and
    /// relationship decorations are read from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted, or
    /// [`Error::Io`] if writing the output fails.
    fn export_layout<S>(&mut self, store: &S, layout: &LayoutReport) -> Result<(), Error>
    where
        S: ModelStore + ?Sized;
}

/// Errors that can occur during export.
///
/// Converted into [`BridgeError::Export`](crate::BridgeError::Export) at the
/// crate boundary.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
