//! Importing diagram text into a model and a diagram.

use log::{debug, info, warn};

use umlbridge_core::{
    model::ElementId,
    store::{ModelStore, StoreError, ViewStore},
    view::{DiagramId, DiagramKind},
};
use umlbridge_parser::{Diagnostic, ParseOutput};

use crate::{
    config::LayoutConfig,
    layout::{self, LayoutReport},
};

/// Everything one import produced.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The diagram the elements were placed on, `None` when the store had
    /// no diagram to offer.
    pub diagram: Option<DiagramId>,
    /// The element new top-level elements were created under.
    pub root_parent: ElementId,
    pub parse: ParseOutput,
    pub layout: LayoutReport,
}

impl ImportOutcome {
    pub fn diagram_kind(&self) -> DiagramKind {
        self.parse.diagram_kind
    }

    /// Warnings for the lines that were skipped.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.parse.diagnostics
    }
}

/// The first selected element, or the project root when nothing is
/// selected.
pub fn root_parent<S>(store: &S) -> ElementId
where
    S: ModelStore + ?Sized,
{
    store
        .current_selection()
        .first()
        .copied()
        .unwrap_or_else(|| store.project_root())
}

/// Returns the current diagram if it has the wanted kind, otherwise creates
/// one under `owner` and makes it current.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot create or open the diagram.
pub fn ensure_diagram<S>(
    store: &mut S,
    kind: DiagramKind,
    owner: ElementId,
) -> Result<DiagramId, StoreError>
where
    S: ViewStore + ?Sized,
{
    if let Some(current) = store.current_diagram().filter(|diagram| diagram.kind == kind) {
        debug!(kind:%; "Reusing current diagram");
        return Ok(current.id);
    }

    let diagram = store.create_diagram(kind, owner)?;
    store.set_current_diagram(diagram)?;
    info!(kind:%, owner:%; "Created diagram for import");
    Ok(diagram)
}

/// Parses `text`, lays out the created elements and repaints.
///
/// A diagram the store refuses falls back to the current diagram. Without
/// one the model is still imported and the layout report is empty.
pub(crate) fn import_text<S>(store: &mut S, text: &str, config: &LayoutConfig) -> ImportOutcome
where
    S: ModelStore + ViewStore + ?Sized,
{
    let kind = umlbridge_parser::detect_diagram_kind(text);
    let root_parent = root_parent(store);
    let diagram = match ensure_diagram(store, kind, root_parent) {
        Ok(diagram) => Some(diagram),
        Err(err) => {
            let fallback = store.current_diagram().map(|diagram| diagram.id);
            warn!(kind:%, fallback:?, err:err; "Could not open a diagram for import");
            fallback
        }
    };

    let parse = umlbridge_parser::parse(text, store, root_parent);
    let layout = match diagram {
        Some(diagram) => layout::layout(store, diagram, &parse, config),
        None => LayoutReport::unplaced(&parse),
    };
    store.repaint();

    info!(
        elements = layout.entries.len(),
        relationships = layout.relationships.len(),
        warnings = parse.diagnostics.len();
        "Imported diagram text"
    );
    ImportOutcome {
        diagram,
        root_parent,
        parse,
        layout,
    }
}

#[cfg(test)]
mod tests {
    use umlbridge_core::{
        model::ElementKind,
        store::{MemoryWorkspace, NewElement},
    };

    use super::*;

    #[test]
    fn test_root_parent_prefers_selection() {
        let mut workspace = MemoryWorkspace::new("Test");
        let root = workspace.project_root();
        assert_eq!(root_parent(&workspace), root);

        let package = workspace
            .create_element(NewElement::new(ElementKind::Package, root, "domain"))
            .unwrap();
        workspace.select([package]);
        assert_eq!(root_parent(&workspace), package);
    }

    #[test]
    fn test_ensure_diagram_reuses_matching_kind() {
        let mut workspace = MemoryWorkspace::new("Test");
        let root = workspace.project_root();

        let class_diagram = ensure_diagram(&mut workspace, DiagramKind::Class, root).unwrap();
        assert_eq!(
            ensure_diagram(&mut workspace, DiagramKind::Class, root).unwrap(),
            class_diagram
        );

        let use_case = ensure_diagram(&mut workspace, DiagramKind::UseCase, root).unwrap();
        assert_ne!(use_case, class_diagram);
        assert_eq!(workspace.current_diagram().unwrap().id, use_case);
        assert_eq!(workspace.diagrams().len(), 2);
    }

    #[test]
    fn test_import_places_elements_under_selection() {
        let mut workspace = MemoryWorkspace::new("Test");
        let root = workspace.project_root();
        let package = workspace
            .create_element(NewElement::new(ElementKind::Package, root, "domain"))
            .unwrap();
        workspace.select([package]);

        let outcome =
            import_text(&mut workspace, "class Order\n", &LayoutConfig::default());

        let order = outcome.parse.element("Order").unwrap();
        assert_eq!(workspace.element(order).unwrap().parent(), Some(package));
        assert_eq!(workspace.diagrams()[0].owner, package);
        assert_eq!(workspace.repaint_count(), 1);
        assert_eq!(outcome.diagram_kind(), DiagramKind::Class);
    }
}
