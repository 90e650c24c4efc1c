//! Automatic placement of imported elements.
//!
//! The layout engine turns a [`ParseOutput`] into views on a diagram:
//!
//! 1. package views are created first, so every element declared inside a
//!    package can be created inside the package's view
//! 2. a [`Strategy`] places all other elements
//! 3. package views are fitted around their children, deepest first
//! 4. relationships whose endpoints both got a view are realized
//!
//! A store failure for one element or relationship is logged and skipped;
//! the rest of the diagram is still laid out.

mod grid;
mod packages;
mod realize;
mod use_case;

pub use use_case::{UseCaseBuckets, bucket_use_cases, order_actors};

use std::fmt;

use indexmap::IndexMap;
use log::{debug, info, warn};

use umlbridge_core::{
    geometry::{Bounds, Point, Size},
    model::{ElementId, ElementKind},
    store::{ModelStore, ViewStore},
    view::{DiagramId, DiagramKind, RelationshipView, ViewId},
};
use umlbridge_parser::ParseOutput;

use crate::config::LayoutConfig;

/// How the non-package elements of a diagram are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Fixed-size grid cells in declaration order.
    Grid,
    /// Actors on the left with their use cases to the right.
    UseCase,
}

impl Strategy {
    /// The strategy used for diagrams of `kind`.
    pub fn for_diagram(kind: DiagramKind) -> Self {
        match kind {
            DiagramKind::Class => Self::Grid,
            DiagramKind::UseCase => Self::UseCase,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid"),
            Self::UseCase => f.write_str("use case"),
        }
    }
}

/// Final geometry of one placed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub element: ElementId,
    pub view: ViewId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// The package view this element was placed in.
    pub container: Option<ViewId>,
}

impl LayoutEntry {
    pub fn bounds(&self) -> Bounds {
        Point::new(self.x, self.y).to_bounds(Size::new(self.width, self.height))
    }
}

/// What one layout run placed, and what it had to skip.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    /// `None` when there was no diagram to place anything on.
    pub diagram: Option<DiagramId>,
    pub strategy: Strategy,
    /// Placed elements, packages first.
    pub entries: Vec<LayoutEntry>,
    pub relationships: Vec<RelationshipView>,
    /// Elements the store refused a view for.
    pub skipped_elements: Vec<ElementId>,
    /// Blueprints without a view for both endpoints, or refused by the store.
    pub skipped_relationships: usize,
}

impl LayoutReport {
    /// A report for an import that had no diagram: every element and
    /// relationship counts as skipped.
    pub fn unplaced(parsed: &ParseOutput) -> Self {
        Self {
            diagram: None,
            strategy: Strategy::for_diagram(parsed.diagram_kind),
            entries: Vec::new(),
            relationships: Vec::new(),
            skipped_elements: parsed.unique_elements(),
            skipped_relationships: parsed.blueprints.len(),
        }
    }

    /// Looks up the entry of `element`.
    pub fn entry(&self, element: ElementId) -> Option<&LayoutEntry> {
        self.entries.iter().find(|entry| entry.element == element)
    }
}

/// Lays out everything `parsed` created on `diagram`.
pub fn layout<S>(
    store: &mut S,
    diagram: DiagramId,
    parsed: &ParseOutput,
    config: &LayoutConfig,
) -> LayoutReport
where
    S: ModelStore + ViewStore + ?Sized,
{
    let strategy = Strategy::for_diagram(parsed.diagram_kind);
    let roots = parsed.unique_elements();
    info!(strategy:%, elements = roots.len(), relationships = parsed.blueprints.len(); "Laying out diagram");

    let mut placer = Placer::new(store, diagram);

    let package_ids = packages::open(&mut placer, &roots);
    let origin = match strategy {
        Strategy::Grid => {
            grid::arrange(&mut placer, &roots, config.grid(), config.packages());
            Point::new(config.grid().origin_x, config.grid().origin_y)
        }
        Strategy::UseCase => {
            use_case::arrange(&mut placer, &roots, &parsed.blueprints, config.use_case());
            Point::new(config.use_case().origin_x, config.use_case().origin_y)
        }
    };
    packages::fit(&mut placer, &package_ids, origin, config.packages());

    let (relationships, skipped_relationships) = realize::realize(&mut placer, &parsed.blueprints);

    let report = placer.into_report(strategy, relationships, skipped_relationships);
    debug!(
        placed = report.entries.len(),
        skipped_elements = report.skipped_elements.len(),
        relationships = report.relationships.len(),
        skipped_relationships = report.skipped_relationships;
        "Layout finished"
    );
    report
}

/// Creates views on one diagram and remembers which element got which view.
pub(crate) struct Placer<'s, S: ?Sized> {
    store: &'s mut S,
    diagram: DiagramId,
    views: IndexMap<ElementId, ViewId>,
    skipped: Vec<ElementId>,
}

impl<'s, S> Placer<'s, S>
where
    S: ModelStore + ViewStore + ?Sized,
{
    fn new(store: &'s mut S, diagram: DiagramId) -> Self {
        Self {
            store,
            diagram,
            views: IndexMap::new(),
            skipped: Vec::new(),
        }
    }

    fn kind_of(&self, element: ElementId) -> Option<ElementKind> {
        self.store.element(element)?.kind()
    }

    fn name_of(&self, element: ElementId) -> String {
        self.store
            .element(element)
            .map(|element| element.name.clone())
            .unwrap_or_default()
    }

    fn view_of(&self, element: ElementId) -> Option<ViewId> {
        self.views.get(&element).copied()
    }

    fn bounds_of(&self, view: ViewId) -> Option<Bounds> {
        self.store.view(view).map(|view| view.bounds())
    }

    /// The view of the package that directly owns `element`, if any.
    fn container_for(&self, element: ElementId) -> Option<ViewId> {
        let parent = self.store.element(element)?.parent()?;
        if !self.store.element(parent)?.is_kind(ElementKind::Package) {
            return None;
        }
        self.view_of(parent)
    }

    /// Views placed directly inside `container`.
    fn children_of(&self, container: ViewId) -> Vec<ViewId> {
        self.views
            .values()
            .copied()
            .filter(|&view| {
                self.store
                    .view(view)
                    .is_some_and(|view| view.container == Some(container))
            })
            .collect()
    }

    /// Creates the view of `element` at `position`. Returns `None` and
    /// records the element as skipped when the store refuses.
    fn place(&mut self, element: ElementId, position: Point, width: Option<i32>) -> Option<ViewId> {
        let container = self.container_for(element);
        match self
            .store
            .create_view(element, self.diagram, position, container)
        {
            Ok(id) => {
                if let Some(view) = self.store.view_mut(id) {
                    view.show_namespace = false;
                    if let Some(width) = width {
                        view.width = width;
                    }
                }
                self.views.insert(element, id);
                Some(id)
            }
            Err(err) => {
                warn!(element:%, name = self.name_of(element).as_str(), err:err; "Could not place element");
                self.skipped.push(element);
                None
            }
        }
    }

    /// Moves `view` and everything inside it by `(dx, dy)`.
    fn translate(&mut self, view: ViewId, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let mut pending = vec![view];
        while let Some(current) = pending.pop() {
            if let Some(view) = self.store.view_mut(current) {
                view.x += dx;
                view.y += dy;
            }
            pending.extend(self.children_of(current));
        }
    }

    fn into_report(
        self,
        strategy: Strategy,
        relationships: Vec<RelationshipView>,
        skipped_relationships: usize,
    ) -> LayoutReport {
        let entries = self
            .views
            .iter()
            .filter_map(|(&element, &id)| {
                let view = self.store.view(id)?;
                Some(LayoutEntry {
                    element,
                    view: id,
                    x: view.x,
                    y: view.y,
                    width: view.width,
                    height: view.height,
                    container: view.container,
                })
            })
            .collect();

        LayoutReport {
            diagram: Some(self.diagram),
            strategy,
            entries,
            relationships,
            skipped_elements: self.skipped,
            skipped_relationships,
        }
    }
}

#[cfg(test)]
mod tests {
    use umlbridge_core::store::MemoryWorkspace;

    use super::*;

    fn run(source: &str) -> (MemoryWorkspace, ParseOutput, LayoutReport) {
        let mut workspace = MemoryWorkspace::new("Test");
        let root = workspace.project_root();
        let parsed = umlbridge_parser::parse(source, &mut workspace, root);
        let diagram = workspace
            .create_diagram(parsed.diagram_kind, root)
            .unwrap();
        let report = layout(&mut workspace, diagram, &parsed, &LayoutConfig::default());
        (workspace, parsed, report)
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(Strategy::for_diagram(DiagramKind::Class), Strategy::Grid);
        assert_eq!(Strategy::for_diagram(DiagramKind::UseCase), Strategy::UseCase);
    }

    #[test]
    fn test_grid_positions_and_widths() {
        let source = (0..8)
            .map(|index| format!("class C{index}"))
            .chain(["class AVeryLongClassNameIndeed".to_string()])
            .collect::<Vec<_>>()
            .join("\n");
        let (_, parsed, report) = run(&source);

        let position = |name: &str| {
            let entry = report.entry(parsed.element(name).unwrap()).unwrap();
            (entry.x, entry.y, entry.width)
        };
        assert_eq!(position("C0"), (100, 100, 100));
        assert_eq!(position("C5"), (4100, 100, 100));
        assert_eq!(position("C6"), (100, 500, 100));
        assert_eq!(position("AVeryLongClassNameIndeed"), (1700, 500, 240));
    }

    #[test]
    fn test_views_hide_namespace() {
        let (workspace, _, report) = run("package shop {\nclass Order\n}\n");

        assert_eq!(report.entries.len(), 2);
        for entry in &report.entries {
            assert!(!workspace.view(entry.view).unwrap().show_namespace);
        }
    }

    #[test]
    fn test_use_case_layout_places_blocks_next_to_actors() {
        let source = "\
actor Customer
actor Clerk
usecase Browse
usecase Pay
usecase Refund
usecase Checkout
Customer --> Browse
Customer --> Pay
Customer --> Refund
Clerk --> Checkout
Customer --> Checkout
";
        let (_, parsed, report) = run(source);
        let entry = |name: &str| report.entry(parsed.element(name).unwrap()).unwrap().clone();

        assert_eq!((entry("Customer").x, entry("Customer").y), (100, 100));
        assert_eq!((entry("Browse").x, entry("Browse").y), (450, 100));
        assert_eq!((entry("Pay").x, entry("Pay").y), (650, 100));
        assert_eq!((entry("Refund").x, entry("Refund").y), (450, 250));
        // Two rows of use cases push the next actor down by 300.
        assert_eq!((entry("Clerk").x, entry("Clerk").y), (100, 400));

        // Shared between Customer (center 140) and Clerk (center 440).
        let checkout = entry("Checkout");
        assert_eq!(checkout.y, 290);
        assert!(checkout.x >= 800);
        assert!(checkout.x >= entry("Pay").bounds().max_x() + 50);
        assert_eq!(entry("Pay").width, 120);
    }
}
