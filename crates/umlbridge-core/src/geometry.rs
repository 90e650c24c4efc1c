//! Integer geometry for diagram placement.
//!
//! Host diagram editors position views on an integer pixel grid, so every
//! coordinate here is an `i32`.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left corner and Y grows downward, matching SVG and
//! the host view stores.

/// A 2D point in diagram coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate.
    pub fn x(self) -> i32 {
        self.x
    }

    /// Returns the y-coordinate.
    pub fn y(self) -> i32 {
        self.y
    }

    /// Creates a [`Bounds`] with this point as its top-left corner.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_top_left(self, size)
    }
}

/// Width and height of a diagram element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> i32 {
        self.width
    }

    pub fn height(self) -> i32 {
        self.height
    }

    /// Returns the component-wise maximum of two sizes.
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> i32 {
        self.min_x
    }

    pub fn min_y(self) -> i32 {
        self.min_y
    }

    pub fn max_x(self) -> i32 {
        self.max_x
    }

    pub fn max_y(self) -> i32 {
        self.max_y
    }

    pub fn width(self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> i32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Returns the center point, rounded toward the top-left.
    pub fn center(self) -> Point {
        Point::new(
            self.min_x + self.width() / 2,
            self.min_y + self.height() / 2,
        )
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlbridge_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0, 0), Size::new(100, 30));
    /// let b = Bounds::new_from_top_left(Point::new(10, 40), Size::new(120, 80));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.min_point(), Point::new(0, 0));
    /// assert_eq!(combined.width(), 130);
    /// assert_eq!(combined.height(), 120);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds outward by the given insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left,
            min_y: self.min_y - insets.top,
            max_x: self.max_x + insets.right,
            max_y: self.max_y + insets.bottom,
        }
    }

    /// Returns `true` if `other` lies entirely within these bounds.
    pub fn contains(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }
}

/// Padding around an element, one value per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    top: i32,
    right: i32,
    bottom: i32,
    left: i32,
}

impl Insets {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates insets with the same value on every side.
    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> i32 {
        self.top
    }

    pub fn left(self) -> i32 {
        self.left
    }
}
