//! Diagrams and the views placed on them.
//!
//! A [`View`] is the visual representation of one model element on one
//! diagram. Views may sit inside a container view (a package box).
//! Relationships are drawn as [`RelationshipView`]s connecting two views.

use std::fmt;

use crate::{
    geometry::{Bounds, Point, Size},
    model::ElementId,
};

/// The diagram types the importer can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    #[default]
    Class,
    UseCase,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class diagram"),
            Self::UseCase => f.write_str("use case diagram"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagramId(usize);

impl DiagramId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(usize);

impl ViewId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// A diagram owned by a model element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub id: DiagramId,
    pub kind: DiagramKind,
    /// The element that owns the diagram.
    pub owner: ElementId,
}

/// The placed representation of a model element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub id: ViewId,
    pub diagram: DiagramId,
    pub model: ElementId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub show_namespace: bool,
    pub container: Option<ViewId>,
}

impl View {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Bounds {
        self.position().to_bounds(self.size())
    }

    /// Moves and resizes the view to cover `bounds`.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.x = bounds.min_x();
        self.y = bounds.min_y();
        self.width = bounds.width();
        self.height = bounds.height();
    }
}

/// A drawn relationship. The relationship model element is created together
/// with the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipView {
    pub id: ViewId,
    pub diagram: DiagramId,
    pub model: ElementId,
    pub tail: ViewId,
    pub head: ViewId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_set_bounds() {
        let mut view = View {
            id: ViewId::new(0),
            diagram: DiagramId::new(0),
            model: ElementId::new(1),
            x: 100,
            y: 100,
            width: 100,
            height: 60,
            show_namespace: true,
            container: None,
        };

        view.set_bounds(Point::new(40, 50).to_bounds(Size::new(300, 200)));

        assert_eq!(view.position(), Point::new(40, 50));
        assert_eq!(view.size(), Size::new(300, 200));
    }
}
