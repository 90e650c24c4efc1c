//! Collaborator interfaces for the host model and diagram stores.
//!
//! The importer and exporter never own model data. They talk to the host
//! through two traits:
//!
//! - [`ModelStore`] - creates and looks up model elements
//! - [`ViewStore`] - creates diagrams and places views on them
//!
//! A host usually implements both on the same type. [`MemoryWorkspace`] is
//! the reference in-memory implementation used by the CLI and the tests.

mod memory;

pub use memory::MemoryWorkspace;

use thiserror::Error;

use crate::{
    geometry::Point,
    model::{
        Attribute, ElementBody, ElementId, ElementKind, EnumerationLiteral, ModelElement,
        Operation, RelationshipKind,
    },
    view::{Diagram, DiagramId, DiagramKind, RelationshipView, View, ViewId},
};

/// Errors reported by a store when it refuses an operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown model element {0}")]
    UnknownElement(ElementId),

    #[error("unknown view {0}")]
    UnknownView(ViewId),

    #[error("unknown diagram #{}", .0.index())]
    UnknownDiagram(DiagramId),

    #[error("element {owner} cannot own {what}")]
    InvalidOwner { owner: ElementId, what: &'static str },

    #[error("store rejected the operation: {0}")]
    Rejected(String),
}

/// Request to create a model element under `parent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewElement {
    pub kind: ElementKind,
    pub parent: ElementId,
    pub name: String,
    pub is_abstract: bool,
}

impl NewElement {
    pub fn new(kind: ElementKind, parent: ElementId, name: impl Into<String>) -> Self {
        Self {
            kind,
            parent,
            name: name.into(),
            is_abstract: false,
        }
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }
}

/// Request to create a relationship element together with its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRelationship {
    pub kind: RelationshipKind,
    pub diagram: DiagramId,
    pub source: ElementId,
    pub target: ElementId,
    pub source_view: ViewId,
    pub target_view: ViewId,
}

/// Access to the host's model repository.
pub trait ModelStore {
    /// The project element that owns everything else.
    fn project_root(&self) -> ElementId;

    /// Elements currently selected by the user, in selection order.
    fn current_selection(&self) -> Vec<ElementId>;

    fn element(&self, id: ElementId) -> Option<&ModelElement>;

    fn element_mut(&mut self, id: ElementId) -> Option<&mut ModelElement>;

    /// Creates an element and appends it to the parent's owned elements.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the parent does not exist or the store
    /// refuses the element.
    fn create_element(&mut self, request: NewElement) -> Result<ElementId, StoreError>;

    /// Appends an attribute to a class or interface.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if `owner` is unknown or has no attributes.
    fn add_attribute(&mut self, owner: ElementId, attribute: Attribute) -> Result<(), StoreError> {
        self.element_mut(owner)
            .ok_or(StoreError::UnknownElement(owner))?
            .classifier_mut()
            .ok_or(StoreError::InvalidOwner {
                owner,
                what: "attributes",
            })?
            .attributes
            .push(attribute);
        Ok(())
    }

    /// Appends an operation, parameters included, to a class or interface.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if `owner` is unknown or has no operations.
    fn add_operation(&mut self, owner: ElementId, operation: Operation) -> Result<(), StoreError> {
        self.element_mut(owner)
            .ok_or(StoreError::UnknownElement(owner))?
            .classifier_mut()
            .ok_or(StoreError::InvalidOwner {
                owner,
                what: "operations",
            })?
            .operations
            .push(operation);
        Ok(())
    }

    /// Appends a literal to an enumeration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if `owner` is unknown or not an enumeration.
    fn add_literal(
        &mut self,
        owner: ElementId,
        literal: EnumerationLiteral,
    ) -> Result<(), StoreError> {
        match &mut self
            .element_mut(owner)
            .ok_or(StoreError::UnknownElement(owner))?
            .body
        {
            ElementBody::Enumeration(literals) => {
                literals.push(literal);
                Ok(())
            }
            _ => Err(StoreError::InvalidOwner {
                owner,
                what: "enumeration literals",
            }),
        }
    }
}

/// Access to the host's diagrams and views.
pub trait ViewStore {
    fn current_diagram(&self) -> Option<&Diagram>;

    /// Creates a diagram owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the owner is unknown or cannot own diagrams.
    fn create_diagram(&mut self, kind: DiagramKind, owner: ElementId)
    -> Result<DiagramId, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::UnknownDiagram`] for an unknown diagram.
    fn set_current_diagram(&mut self, diagram: DiagramId) -> Result<(), StoreError>;

    /// Places a view of `model` at `position`, optionally inside a container
    /// view. The store chooses the initial size.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the model, diagram or container is unknown,
    /// or the store cannot show this model on the diagram.
    fn create_view(
        &mut self,
        model: ElementId,
        diagram: DiagramId,
        position: Point,
        container: Option<ViewId>,
    ) -> Result<ViewId, StoreError>;

    fn view(&self, id: ViewId) -> Option<&View>;

    fn view_mut(&mut self, id: ViewId) -> Option<&mut View>;

    /// Creates a relationship model element and the view connecting its
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an endpoint or view is unknown or the store
    /// does not support the relationship kind between these endpoints.
    fn create_relationship_view(
        &mut self,
        request: NewRelationship,
    ) -> Result<RelationshipView, StoreError>;

    /// Asks the host to redraw the current diagram.
    fn repaint(&mut self);
}
