//! Color handling for rendered diagram previews
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, so style configuration can accept any CSS color string.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#ff0000"`,
    /// `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use umlbridge_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert_ne!(red, blue);
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default().to_string(), "black");
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Color::new("red").unwrap());

        assert!(set.contains(&Color::new("red").unwrap()));
        assert!(!set.contains(&Color::new("blue").unwrap()));
    }
}
