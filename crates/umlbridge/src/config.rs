//! Configuration types for umlbridge import and preview rendering.
//!
//! This module provides configuration structures that control where imported
//! elements are placed and how previews are styled. All types implement
//! [`serde::Deserialize`] so the CLI can load them from a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Spacing constants of the grid and use case strategies,
//!   plus package fitting.
//! - [`StyleConfig`] - Colors used by the SVG preview.
//!
//! Every field is optional; missing fields keep their defaults.
//!
//! # Example
//!
//! ```
//! # use umlbridge::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().grid().columns, 6);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use umlbridge_core::color::Color;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Placement constants for imported diagrams.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    grid: GridConfig,

    #[serde(default)]
    use_case: UseCaseConfig,

    #[serde(default)]
    packages: PackageConfig,
}

impl LayoutConfig {
    pub fn new(grid: GridConfig, use_case: UseCaseConfig, packages: PackageConfig) -> Self {
        Self {
            grid,
            use_case,
            packages,
        }
    }

    /// Settings of the grid strategy used for class diagrams.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Settings of the actor-centric strategy used for use case diagrams.
    pub fn use_case(&self) -> &UseCaseConfig {
        &self.use_case
    }

    /// Padding and minimum size of fitted package boxes.
    pub fn packages(&self) -> &PackageConfig {
        &self.packages
    }
}

/// Uniform grid placement.
///
/// Views are laid out left to right, `columns` per row, and are at least
/// `min_width` wide or `char_width` per character of their name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub origin_x: i32,
    pub origin_y: i32,
    pub column_spacing: i32,
    pub row_spacing: i32,
    pub columns: usize,
    pub min_width: i32,
    pub char_width: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin_x: 100,
            origin_y: 100,
            column_spacing: 800,
            row_spacing: 400,
            columns: 6,
            min_width: 100,
            char_width: 10,
        }
    }
}

impl GridConfig {
    /// Width given to a view named `name`.
    pub fn width_for(&self, name: &str) -> i32 {
        self.min_width
            .max(char_count(name).saturating_mul(self.char_width))
    }
}

/// Actor-centric placement for use case diagrams.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UseCaseConfig {
    pub origin_x: i32,
    pub origin_y: i32,
    /// Horizontal offset per generalization level of an actor.
    pub depth_indent: i32,
    /// Offset from an actor's top to its vertical center.
    pub actor_center_offset: i32,
    /// Minimum distance between the tops of consecutive actors.
    pub min_actor_advance: i32,
    /// Left edge of the first exclusive use case column.
    pub exclusive_x: i32,
    pub exclusive_columns: usize,
    pub column_spacing: i32,
    pub row_spacing: i32,
    /// Leftmost column of shared use cases.
    pub shared_min_x: i32,
    /// Gap kept between exclusive use cases and the shared column.
    pub shared_gap: i32,
    /// Orphan and remaining elements wrap once the cursor passes this x.
    pub wrap_x: i32,
    pub min_use_case_width: i32,
    pub use_case_char_width: i32,
    pub use_case_text_padding: i32,
}

impl Default for UseCaseConfig {
    fn default() -> Self {
        Self {
            origin_x: 100,
            origin_y: 100,
            depth_indent: 50,
            actor_center_offset: 40,
            min_actor_advance: 225,
            exclusive_x: 450,
            exclusive_columns: 2,
            column_spacing: 200,
            row_spacing: 150,
            shared_min_x: 800,
            shared_gap: 50,
            wrap_x: 900,
            min_use_case_width: 120,
            use_case_char_width: 8,
            use_case_text_padding: 30,
        }
    }
}

impl UseCaseConfig {
    /// Width given to a use case named `name`.
    pub fn use_case_width(&self, name: &str) -> i32 {
        self.min_use_case_width.max(
            char_count(name)
                .saturating_mul(self.use_case_char_width)
                .saturating_add(self.use_case_text_padding),
        )
    }
}

/// Package fitting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Space kept between a package border and its children.
    pub padding: i32,
    /// Extra space above the children for the package name tab.
    pub header: i32,
    /// Size of a package without placed children.
    pub min_width: i32,
    pub min_height: i32,
    /// Gap between empty packages in the trailing row.
    pub spacing: i32,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            padding: 30,
            header: 30,
            min_width: 200,
            min_height: 150,
            spacing: 50,
        }
    }
}

/// Visual styling of SVG previews. Unset colors fall back to renderer
/// defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] of the preview, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Stroke [`Color`] of shapes and relationship lines.
    #[serde(default)]
    line_color: Option<String>,

    /// Fill [`Color`] of package boxes.
    #[serde(default)]
    package_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color("background", self.background_color.as_deref())
    }

    /// Returns the parsed line [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn line_color(&self) -> Result<Option<Color>, String> {
        parse_color("line", self.line_color.as_deref())
    }

    /// Returns the parsed package fill [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn package_color(&self) -> Result<Option<Color>, String> {
        parse_color("package", self.package_color.as_deref())
    }
}

fn parse_color(field: &str, value: Option<&str>) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {field} color in config: {err}"))
}

fn char_count(name: &str) -> i32 {
    i32::try_from(name.chars().count()).unwrap_or(i32::MAX / 16)
}
