//! # umlbridge Parser
//!
//! Reads PlantUML-like diagram text and creates the declared elements in a
//! [`ModelStore`]. Relationships are not created here: they are returned as
//! [`RelationshipBlueprint`]s so the layout engine can create each one
//! together with its view once both endpoints are placed.
//!
//! ## Usage
//!
//! ```
//! use umlbridge_core::{
//!     model::RelationshipKind,
//!     store::{MemoryWorkspace, ModelStore},
//!     view::DiagramKind,
//! };
//!
//! let mut workspace = MemoryWorkspace::new("Zoo");
//! let root = workspace.project_root();
//!
//! let output = umlbridge_parser::parse(
//!     "class Animal {\n  + name: string\n}\nclass Dog\nAnimal <|-- Dog\n",
//!     &mut workspace,
//!     root,
//! );
//!
//! assert_eq!(output.diagram_kind, DiagramKind::Class);
//! assert_eq!(output.blueprints[0].kind, RelationshipKind::Generalization);
//! assert_eq!(output.blueprints[0].source, output.element("Dog").unwrap());
//! assert!(output.diagnostics.is_empty());
//! ```
//!
//! ## Accepted lines
//!
//! - `package <name> [as <alias>] {` ... `}`
//! - `class|abstract class|abstract|interface|enum|actor|usecase <name> [as <alias>] [{]`
//! - members inside `{ }`: `[vis] name(params)[: ret]`, `[vis] name[: type][= default]`,
//!   or a bare literal inside an `enum`
//! - relationships: `left ["m1"] ARROW ["m2"] right [: label]`
//!
//! Comments (`'`), `@startuml`/`@enduml` and rendering directives are
//! ignored. Anything else is skipped with a [`Diagnostic`].

pub mod classifier;
pub mod error;

mod blueprint;
mod grammar;
mod parser;
#[cfg(test)]
mod parser_tests;
mod span;

pub use blueprint::{EndSpec, RelationshipBlueprint};
pub use error::Diagnostic;
pub use span::Span;

use indexmap::{IndexMap, IndexSet};
use log::info;

use umlbridge_core::{
    identifier::Id,
    model::ElementId,
    store::ModelStore,
    view::DiagramKind,
};

use parser::{LineParser, ParsedModel};

/// Everything one parse produced.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The diagram type the text asks for.
    pub diagram_kind: DiagramKind,
    /// Alias and display name of every created element, in declaration
    /// order. An element declared with an alias appears under both keys.
    pub aliases: IndexMap<Id, ElementId>,
    /// Relationships in the order they were written.
    pub blueprints: Vec<RelationshipBlueprint>,
    /// Warnings for every skipped line.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// Returns the created elements once each, in declaration order.
    pub fn unique_elements(&self) -> Vec<ElementId> {
        self.aliases
            .values()
            .copied()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Looks up an element by alias or display name.
    pub fn element(&self, alias: &str) -> Option<ElementId> {
        self.aliases.get(&Id::lookup(alias)?).copied()
    }
}

/// Detects the diagram type from the text.
///
/// Text mentioning `usecase` or `actor` as a word followed by whitespace or
/// the end of the text is a use case diagram; everything else is a class
/// diagram. Case is ignored.
///
/// ```
/// use umlbridge_core::view::DiagramKind;
/// use umlbridge_parser::detect_diagram_kind;
///
/// assert_eq!(detect_diagram_kind("actor Customer"), DiagramKind::UseCase);
/// assert_eq!(detect_diagram_kind("class Reactor"), DiagramKind::Class);
/// ```
pub fn detect_diagram_kind(source: &str) -> DiagramKind {
    if grammar::mentions_use_case_keyword(source) {
        DiagramKind::UseCase
    } else {
        DiagramKind::Class
    }
}

/// Parses `source`, creating every declared element under `root` (or under
/// the enclosing package).
///
/// Parsing never fails: unusable lines are skipped and reported in
/// [`ParseOutput::diagnostics`].
pub fn parse<S>(source: &str, store: &mut S, root: ElementId) -> ParseOutput
where
    S: ModelStore + ?Sized,
{
    let diagram_kind = detect_diagram_kind(source);
    info!(diagram_kind:%, root:%; "Parsing diagram text");

    let ParsedModel {
        aliases,
        blueprints,
        diagnostics,
    } = LineParser::new(store, root).run(source);

    ParseOutput {
        diagram_kind,
        aliases,
        blueprints,
        diagnostics,
    }
}
