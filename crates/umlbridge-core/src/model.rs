//! UML model elements.
//!
//! A model is a tree of [`ModelElement`]s rooted at a project element. Each
//! element carries the fields common to every UML element (name,
//! documentation, tags, owner) plus an [`ElementBody`] with the kind-specific
//! data. Class-like bodies own their members by value; relationships
//! reference their endpoints by [`ElementId`].

use std::fmt;

/// Opaque handle to an element held by a [`ModelStore`](crate::store::ModelStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Creates an id from a store-assigned index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the store-assigned index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The element kinds that can be created from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Package,
    Class,
    Interface,
    Enumeration,
    Actor,
    UseCase,
}

impl ElementKind {
    /// Returns `true` for the two kinds that appear on use case diagrams as
    /// participants (actors and use cases).
    pub fn is_use_case_participant(self) -> bool {
        matches!(self, Self::Actor | Self::UseCase)
    }

    /// Returns `true` for kinds that own attributes and operations.
    pub fn has_features(self) -> bool {
        matches!(self, Self::Class | Self::Interface)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Package => "package",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enumeration => "enum",
            Self::Actor => "actor",
            Self::UseCase => "usecase",
        };
        f.write_str(name)
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
    Package,
}

impl Visibility {
    /// Maps a textual visibility marker to a [`Visibility`].
    ///
    /// Accepts both the symbol form (`+ - # ~`) and the keyword form.
    ///
    /// # Examples
    ///
    /// ```
    /// use umlbridge_core::model::Visibility;
    ///
    /// assert_eq!(Visibility::from_marker("#"), Some(Visibility::Protected));
    /// assert_eq!(Visibility::from_marker("package"), Some(Visibility::Package));
    /// assert_eq!(Visibility::from_marker("*"), None);
    /// ```
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "+" | "public" => Some(Self::Public),
            "-" | "private" => Some(Self::Private),
            "#" | "protected" => Some(Self::Protected),
            "~" | "package" => Some(Self::Package),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{name, value}` tag attached to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub type_name: Option<String>,
    pub visibility: Visibility,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParameterDirection {
    #[default]
    In,
    /// The parameter stands for the operation's return type.
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub direction: ParameterDirection,
}

impl Parameter {
    /// Creates an ordinary `in` parameter.
    pub fn input(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_name,
            direction: ParameterDirection::In,
        }
    }

    /// Creates the unnamed parameter that carries a return type.
    pub fn returning(type_name: impl Into<String>) -> Self {
        Self {
            name: None,
            type_name: Some(type_name.into()),
            direction: ParameterDirection::Return,
        }
    }

    pub fn is_return(&self) -> bool {
        self.direction == ParameterDirection::Return
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<Parameter>,
}

impl Operation {
    /// Iterates over the parameters that are not the return parameter.
    pub fn inputs(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|param| !param.is_return())
    }

    /// Returns the declared return type, if any.
    pub fn return_type(&self) -> Option<&str> {
        self.parameters
            .iter()
            .find(|param| param.is_return())
            .and_then(|param| param.type_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationLiteral {
    pub name: String,
}

/// Attributes and operations of a class or interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifier {
    pub is_abstract: bool,
    pub attributes: Vec<Attribute>,
    pub operations: Vec<Operation>,
}

/// Relationship kinds understood by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    Generalization,
    InterfaceRealization,
    Association,
    Dependency,
    Include,
    Extend,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generalization => "generalization",
            Self::InterfaceRealization => "interface realization",
            Self::Association => "association",
            Self::Dependency => "dependency",
            Self::Include => "include",
            Self::Extend => "extend",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Aggregation {
    #[default]
    None,
    Shared,
    Composite,
}

/// One end of a realized relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEnd {
    /// The element at this end.
    pub reference: ElementId,
    pub aggregation: Aggregation,
    pub navigable: bool,
    pub multiplicity: Option<String>,
}

impl RelationshipEnd {
    pub fn new(reference: ElementId) -> Self {
        Self {
            reference,
            aggregation: Aggregation::None,
            navigable: false,
            multiplicity: None,
        }
    }
}

/// A realized relationship. `end1` is the source, `end2` the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub end1: RelationshipEnd,
    pub end2: RelationshipEnd,
}

impl Relationship {
    pub fn new(kind: RelationshipKind, source: ElementId, target: ElementId) -> Self {
        Self {
            kind,
            end1: RelationshipEnd::new(source),
            end2: RelationshipEnd::new(target),
        }
    }

    pub fn source(&self) -> ElementId {
        self.end1.reference
    }

    pub fn target(&self) -> ElementId {
        self.end2.reference
    }
}

/// Kind-specific element data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementBody {
    /// The root of a model tree.
    Project,
    Package,
    Class(Classifier),
    Interface(Classifier),
    Enumeration(Vec<EnumerationLiteral>),
    Actor,
    UseCase,
    Relationship(Relationship),
}

impl ElementBody {
    /// Creates an empty body for a text-creatable kind.
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Package => Self::Package,
            ElementKind::Class => Self::Class(Classifier::default()),
            ElementKind::Interface => Self::Interface(Classifier::default()),
            ElementKind::Enumeration => Self::Enumeration(Vec::new()),
            ElementKind::Actor => Self::Actor,
            ElementKind::UseCase => Self::UseCase,
        }
    }
}

/// An element stored in a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelElement {
    id: ElementId,
    pub name: String,
    pub documentation: Option<String>,
    pub tags: Vec<Tag>,
    parent: Option<ElementId>,
    owned_elements: Vec<ElementId>,
    pub body: ElementBody,
}

impl ModelElement {
    /// Creates a detached element; stores attach it through
    /// [`ModelElement::set_parent`] and [`ModelElement::push_owned`].
    pub fn new(id: ElementId, name: impl Into<String>, body: ElementBody) -> Self {
        Self {
            id,
            name: name.into(),
            documentation: None,
            tags: Vec::new(),
            parent: None,
            owned_elements: Vec::new(),
            body,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The owning element, `None` only for a project root.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: ElementId) {
        self.parent = Some(parent);
    }

    pub fn owned_elements(&self) -> &[ElementId] {
        &self.owned_elements
    }

    pub fn push_owned(&mut self, child: ElementId) {
        self.owned_elements.push(child);
    }

    /// Returns the text-creatable kind, or `None` for projects and
    /// relationships.
    pub fn kind(&self) -> Option<ElementKind> {
        match &self.body {
            ElementBody::Package => Some(ElementKind::Package),
            ElementBody::Class(_) => Some(ElementKind::Class),
            ElementBody::Interface(_) => Some(ElementKind::Interface),
            ElementBody::Enumeration(_) => Some(ElementKind::Enumeration),
            ElementBody::Actor => Some(ElementKind::Actor),
            ElementBody::UseCase => Some(ElementKind::UseCase),
            ElementBody::Project | ElementBody::Relationship(_) => None,
        }
    }

    pub fn is_kind(&self, kind: ElementKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Returns the attributes and operations of a class or interface.
    pub fn classifier(&self) -> Option<&Classifier> {
        match &self.body {
            ElementBody::Class(classifier) | ElementBody::Interface(classifier) => {
                Some(classifier)
            }
            _ => None,
        }
    }

    pub fn classifier_mut(&mut self) -> Option<&mut Classifier> {
        match &mut self.body {
            ElementBody::Class(classifier) | ElementBody::Interface(classifier) => {
                Some(classifier)
            }
            _ => None,
        }
    }

    pub fn literals(&self) -> Option<&[EnumerationLiteral]> {
        match &self.body {
            ElementBody::Enumeration(literals) => Some(literals),
            _ => None,
        }
    }

    pub fn relationship(&self) -> Option<&Relationship> {
        match &self.body {
            ElementBody::Relationship(relationship) => Some(relationship),
            _ => None,
        }
    }

    pub fn relationship_mut(&mut self) -> Option<&mut Relationship> {
        match &mut self.body {
            ElementBody::Relationship(relationship) => Some(relationship),
            _ => None,
        }
    }

    /// Returns the value of the first tag named `name`.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }

    /// Number of attributes, operations and literals owned by this element.
    pub fn member_count(&self) -> usize {
        match &self.body {
            ElementBody::Class(classifier) | ElementBody::Interface(classifier) => {
                classifier.attributes.len() + classifier.operations.len()
            }
            ElementBody::Enumeration(literals) => literals.len(),
            _ => 0,
        }
    }
}
