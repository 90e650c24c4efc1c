//! In-memory model and view store.

use std::collections::BTreeMap;

use log::{debug, trace};

use super::{ModelStore, NewElement, NewRelationship, StoreError, ViewStore};
use crate::{
    geometry::Point,
    model::{ElementBody, ElementId, ElementKind, ModelElement, Relationship},
    view::{Diagram, DiagramId, DiagramKind, RelationshipView, View, ViewId},
};

const CLASSIFIER_WIDTH: i32 = 100;
const CLASSIFIER_HEADER_HEIGHT: i32 = 45;
const MEMBER_LINE_HEIGHT: i32 = 15;
const PACKAGE_SIZE: (i32, i32) = (200, 150);
const ACTOR_SIZE: (i32, i32) = (40, 80);
const USE_CASE_SIZE: (i32, i32) = (120, 60);

/// A self-contained model repository and diagram store.
///
/// Elements, diagrams and views live in arenas indexed by their ids, so ids
/// stay valid for the lifetime of the workspace.
///
/// # Examples
///
/// ```
/// use umlbridge_core::{
///     model::ElementKind,
///     store::{MemoryWorkspace, ModelStore, NewElement},
/// };
///
/// let mut workspace = MemoryWorkspace::new("Shop");
/// let root = workspace.project_root();
/// let order = workspace
///     .create_element(NewElement::new(ElementKind::Class, root, "Order"))
///     .unwrap();
///
/// assert_eq!(workspace.element(order).unwrap().parent(), Some(root));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryWorkspace {
    elements: Vec<ModelElement>,
    diagrams: Vec<Diagram>,
    views: BTreeMap<ViewId, View>,
    relationship_views: Vec<RelationshipView>,
    next_view: usize,
    current_diagram: Option<DiagramId>,
    selection: Vec<ElementId>,
    repaints: usize,
}

impl MemoryWorkspace {
    /// Creates a workspace holding only a project root named `project_name`.
    pub fn new(project_name: &str) -> Self {
        let root = ModelElement::new(ElementId::new(0), project_name, ElementBody::Project);
        Self {
            elements: vec![root],
            diagrams: Vec::new(),
            views: BTreeMap::new(),
            relationship_views: Vec::new(),
            next_view: 0,
            current_diagram: None,
            selection: Vec::new(),
            repaints: 0,
        }
    }

    /// Replaces the current selection.
    pub fn select(&mut self, elements: impl IntoIterator<Item = ElementId>) {
        self.selection = elements.into_iter().collect();
    }

    /// Iterates over every element, project root first.
    pub fn elements(&self) -> impl Iterator<Item = &ModelElement> {
        self.elements.iter()
    }

    /// Returns the first element with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&ModelElement> {
        self.elements.iter().find(|element| element.name == name)
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    /// Iterates over the element views placed on `diagram`.
    pub fn views_in(&self, diagram: DiagramId) -> impl Iterator<Item = &View> {
        self.views.values().filter(move |view| view.diagram == diagram)
    }

    /// Iterates over the relationship views drawn on `diagram`.
    pub fn relationship_views_in(
        &self,
        diagram: DiagramId,
    ) -> impl Iterator<Item = &RelationshipView> {
        self.relationship_views
            .iter()
            .filter(move |view| view.diagram == diagram)
    }

    /// Returns the first view of `model` on `diagram`.
    pub fn view_of(&self, model: ElementId, diagram: DiagramId) -> Option<&View> {
        self.views_in(diagram).find(|view| view.model == model)
    }

    /// Number of times [`ViewStore::repaint`] was requested.
    pub fn repaint_count(&self) -> usize {
        self.repaints
    }

    fn default_view_size(element: &ModelElement) -> (i32, i32) {
        match element.kind() {
            Some(ElementKind::Package) => PACKAGE_SIZE,
            Some(ElementKind::Actor) => ACTOR_SIZE,
            Some(ElementKind::UseCase) => USE_CASE_SIZE,
            Some(ElementKind::Class | ElementKind::Interface | ElementKind::Enumeration) => {
                let members = i32::try_from(element.member_count()).unwrap_or(i32::MAX / 2);
                (
                    CLASSIFIER_WIDTH,
                    CLASSIFIER_HEADER_HEIGHT.saturating_add(members.saturating_mul(MEMBER_LINE_HEIGHT)),
                )
            }
            None => (CLASSIFIER_WIDTH, CLASSIFIER_HEADER_HEIGHT),
        }
    }

    fn push_element(&mut self, parent: ElementId, name: &str, body: ElementBody) -> ElementId {
        let id = ElementId::new(self.elements.len());
        let mut element = ModelElement::new(id, name, body);
        element.set_parent(parent);
        self.elements.push(element);
        self.elements[parent.index()].push_owned(id);
        id
    }

    fn allocate_view_id(&mut self) -> ViewId {
        let id = ViewId::new(self.next_view);
        self.next_view += 1;
        id
    }

    fn check_diagram(&self, diagram: DiagramId) -> Result<(), StoreError> {
        if diagram.index() < self.diagrams.len() {
            Ok(())
        } else {
            Err(StoreError::UnknownDiagram(diagram))
        }
    }
}

impl Default for MemoryWorkspace {
    fn default() -> Self {
        Self::new("Model")
    }
}

impl ModelStore for MemoryWorkspace {
    fn project_root(&self) -> ElementId {
        ElementId::new(0)
    }

    fn current_selection(&self) -> Vec<ElementId> {
        self.selection.clone()
    }

    fn element(&self, id: ElementId) -> Option<&ModelElement> {
        self.elements.get(id.index())
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut ModelElement> {
        self.elements.get_mut(id.index())
    }

    fn create_element(&mut self, request: NewElement) -> Result<ElementId, StoreError> {
        let parent = self
            .element(request.parent)
            .ok_or(StoreError::UnknownElement(request.parent))?;
        if parent.relationship().is_some() {
            return Err(StoreError::InvalidOwner {
                owner: request.parent,
                what: "model elements",
            });
        }

        let mut body = ElementBody::empty(request.kind);
        if let ElementBody::Class(classifier) = &mut body {
            classifier.is_abstract = request.is_abstract;
        }

        let id = self.push_element(request.parent, &request.name, body);
        trace!(id:%, kind:% = request.kind, name = request.name.as_str(); "Created element");
        Ok(id)
    }
}

impl ViewStore for MemoryWorkspace {
    fn current_diagram(&self) -> Option<&Diagram> {
        self.current_diagram
            .and_then(|diagram| self.diagrams.get(diagram.index()))
    }

    fn create_diagram(
        &mut self,
        kind: DiagramKind,
        owner: ElementId,
    ) -> Result<DiagramId, StoreError> {
        if self.element(owner).is_none() {
            return Err(StoreError::UnknownElement(owner));
        }

        let id = DiagramId::new(self.diagrams.len());
        self.diagrams.push(Diagram { id, kind, owner });
        // Hosts open a freshly created diagram.
        self.current_diagram = Some(id);
        debug!(kind:%, owner:%; "Created diagram");
        Ok(id)
    }

    fn set_current_diagram(&mut self, diagram: DiagramId) -> Result<(), StoreError> {
        self.check_diagram(diagram)?;
        self.current_diagram = Some(diagram);
        Ok(())
    }

    fn create_view(
        &mut self,
        model: ElementId,
        diagram: DiagramId,
        position: Point,
        container: Option<ViewId>,
    ) -> Result<ViewId, StoreError> {
        self.check_diagram(diagram)?;
        let element = self.element(model).ok_or(StoreError::UnknownElement(model))?;
        if element.kind().is_none() {
            return Err(StoreError::Rejected(format!(
                "element {model} has no node view"
            )));
        }
        if let Some(container) = container {
            match self.views.get(&container) {
                Some(view) if view.diagram == diagram => {}
                _ => return Err(StoreError::UnknownView(container)),
            }
        }

        let (width, height) = Self::default_view_size(element);
        let id = self.allocate_view_id();
        let view = View {
            id,
            diagram,
            model,
            x: position.x(),
            y: position.y(),
            width,
            height,
            show_namespace: true,
            container,
        };
        self.views.insert(id, view);
        Ok(id)
    }

    fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    fn create_relationship_view(
        &mut self,
        request: NewRelationship,
    ) -> Result<RelationshipView, StoreError> {
        self.check_diagram(request.diagram)?;
        for endpoint in [request.source, request.target] {
            if self.element(endpoint).and_then(ModelElement::kind).is_none() {
                return Err(StoreError::UnknownElement(endpoint));
            }
        }
        for (view, model) in [
            (request.source_view, request.source),
            (request.target_view, request.target),
        ] {
            match self.view(view) {
                Some(existing) if existing.model == model => {}
                _ => return Err(StoreError::UnknownView(view)),
            }
        }

        let relationship = Relationship::new(request.kind, request.source, request.target);
        let model = self.push_element(request.source, "", ElementBody::Relationship(relationship));

        let id = self.allocate_view_id();
        let view = RelationshipView {
            id,
            diagram: request.diagram,
            model,
            tail: request.source_view,
            head: request.target_view,
        };
        self.relationship_views.push(view.clone());
        trace!(kind:% = request.kind, model:%; "Created relationship view");
        Ok(view)
    }

    fn repaint(&mut self) {
        self.repaints += 1;
    }
}
