//! Relationships recorded during parsing and realized later by the layout.

use umlbridge_core::model::{Aggregation, ElementId, RelationshipKind};

/// Decoration of one relationship end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndSpec {
    pub aggregation: Aggregation,
    pub navigable: bool,
    pub multiplicity: Option<String>,
}

impl EndSpec {
    pub fn aggregated(aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            ..Self::default()
        }
    }

    pub fn navigable() -> Self {
        Self {
            navigable: true,
            ..Self::default()
        }
    }
}

/// A relationship between two parsed elements, not yet backed by a model
/// element or a view.
///
/// `source` and `target` are in semantic order: the child of a
/// generalization is the source, the depended-upon element of a dependency
/// is the target. `end1` always describes `source` and `end2` `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipBlueprint {
    pub kind: RelationshipKind,
    pub source: ElementId,
    pub target: ElementId,
    pub label: Option<String>,
    pub end1: EndSpec,
    pub end2: EndSpec,
}

impl RelationshipBlueprint {
    /// Returns `true` if the blueprint connects `a` and `b` in either
    /// direction.
    pub fn connects(&self, a: ElementId, b: ElementId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
