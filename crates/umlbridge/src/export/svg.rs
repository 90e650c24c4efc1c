//! SVG preview of a laid-out diagram.

use std::{collections::HashMap, path::PathBuf};

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use umlbridge_core::{
    color::Color,
    geometry::{Bounds, Point},
    model::{
        Aggregation, ElementBody, ModelElement, Relationship, RelationshipKind, Visibility,
    },
    store::ModelStore,
    view::{RelationshipView, ViewId},
};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    layout::{LayoutEntry, LayoutReport},
};

const MARGIN: i32 = 20;
const FONT_SIZE: i32 = 12;
const LINE_HEIGHT: i32 = 15;
const NAME_HEIGHT: i32 = 25;
const DEFAULT_PACKAGE_FILL: &str = "whitesmoke";
const SHAPE_FILL: &str = "white";

/// Builder for [`Svg`].
#[derive(Debug, Default)]
pub struct SvgBuilder {
    output: Option<PathBuf>,
    style: StyleConfig,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes each export to `path`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, Error> {
        Ok(Svg {
            output: self.output,
            background: self.style.background_color().map_err(Error::Render)?,
            line: self
                .style
                .line_color()
                .map_err(Error::Render)?
                .unwrap_or_default(),
            package_fill: self.style.package_color().map_err(Error::Render)?,
            rendered: None,
        })
    }
}

/// Renders layout reports as SVG documents.
#[derive(Debug)]
pub struct Svg {
    output: Option<PathBuf>,
    background: Option<Color>,
    line: Color,
    package_fill: Option<Color>,
    rendered: Option<String>,
}

impl Svg {
    /// The document produced by the last export.
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    /// Renders `layout` as an SVG document.
    pub fn render<S>(&self, store: &S, layout: &LayoutReport) -> Document
    where
        S: ModelStore + ?Sized,
    {
        let content = layout
            .entries
            .iter()
            .map(LayoutEntry::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default();
        let width = content.width() + 2 * MARGIN;
        let height = content.height() + 2 * MARGIN;

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {width} {height}",
                    content.min_x() - MARGIN,
                    content.min_y() - MARGIN
                ),
            )
            .set("width", width)
            .set("height", height)
            .set("font-family", "sans-serif")
            .set("font-size", FONT_SIZE);

        if let Some(background) = self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", content.min_x() - MARGIN)
                    .set("y", content.min_y() - MARGIN)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", background.to_string()),
            );
        }
        doc = doc.add(self.marker_definitions());

        let mut shapes = svg_element::Group::new().set("id", "elements");
        for entry in &layout.entries {
            if let Some(element) = store.element(entry.element) {
                shapes = shapes.add(self.render_element(element, entry));
            }
        }

        let by_view: HashMap<ViewId, Bounds> = layout
            .entries
            .iter()
            .map(|entry| (entry.view, entry.bounds()))
            .collect();
        let mut lines = svg_element::Group::new().set("id", "relationships");
        for view in &layout.relationships {
            if let Some(group) = self.render_relationship(store, view, &by_view) {
                lines = lines.add(group);
            }
        }

        debug!(
            elements = layout.entries.len(),
            relationships = layout.relationships.len();
            "Rendered SVG preview"
        );
        doc.add(shapes).add(lines)
    }

    fn stroke(&self) -> String {
        self.line.to_string()
    }

    fn render_element(&self, element: &ModelElement, entry: &LayoutEntry) -> svg_element::Group {
        let group = svg_element::Group::new();
        let bounds = entry.bounds();

        match &element.body {
            ElementBody::Package => {
                let fill = self
                    .package_fill
                    .map_or_else(|| DEFAULT_PACKAGE_FILL.to_string(), |color| color.to_string());
                group
                    .add(self.rectangle(bounds, &fill))
                    .add(text(
                        Point::new(bounds.min_x() + 8, bounds.min_y() + 18),
                        &element.name,
                        "start",
                    ))
            }
            ElementBody::Actor => self.render_actor(group, bounds, &element.name),
            ElementBody::UseCase => {
                let center = bounds.center();
                group
                    .add(
                        svg_element::Ellipse::new()
                            .set("cx", center.x())
                            .set("cy", center.y())
                            .set("rx", bounds.width() / 2)
                            .set("ry", bounds.height() / 2)
                            .set("fill", SHAPE_FILL)
                            .set("stroke", self.stroke()),
                    )
                    .add(text(center, &element.name, "middle").set("dominant-baseline", "middle"))
            }
            ElementBody::Class(_) | ElementBody::Interface(_) | ElementBody::Enumeration(_) => {
                self.render_classifier(group, bounds, element)
            }
            ElementBody::Project | ElementBody::Relationship(_) => group,
        }
    }

    fn render_classifier(
        &self,
        group: svg_element::Group,
        bounds: Bounds,
        element: &ModelElement,
    ) -> svg_element::Group {
        let center_x = bounds.center().x();
        let title = match &element.body {
            ElementBody::Interface(_) => format!("\u{ab}interface\u{bb} {}", element.name),
            ElementBody::Enumeration(_) => format!("\u{ab}enum\u{bb} {}", element.name),
            _ => element.name.clone(),
        };
        let mut title_text = text(Point::new(center_x, bounds.min_y() + 17), &title, "middle")
            .set("font-weight", "bold");
        if element.classifier().is_some_and(|classifier| classifier.is_abstract) {
            title_text = title_text.set("font-style", "italic");
        }

        let divider_y = bounds.min_y() + NAME_HEIGHT;
        let mut group = group
            .add(self.rectangle(bounds, SHAPE_FILL))
            .add(title_text)
            .add(
                svg_element::Line::new()
                    .set("x1", bounds.min_x())
                    .set("y1", divider_y)
                    .set("x2", bounds.max_x())
                    .set("y2", divider_y)
                    .set("stroke", self.stroke()),
            );

        let mut y = divider_y + LINE_HEIGHT;
        for member in member_lines(element) {
            group = group.add(text(Point::new(bounds.min_x() + 5, y), &member, "start"));
            y += LINE_HEIGHT;
        }
        group
    }

    fn render_actor(
        &self,
        group: svg_element::Group,
        bounds: Bounds,
        name: &str,
    ) -> svg_element::Group {
        let center_x = bounds.center().x();
        let head_radius = bounds.width() / 4;
        let neck_y = bounds.min_y() + 2 * head_radius;
        let hip_y = bounds.min_y() + bounds.height() * 5 / 8;
        let arm_y = neck_y + (hip_y - neck_y) / 3;
        let stroke = self.stroke();

        let limb = |x1: i32, y1: i32, x2: i32, y2: i32| {
            svg_element::Line::new()
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2)
                .set("stroke", stroke.as_str())
        };

        group
            .add(
                svg_element::Circle::new()
                    .set("cx", center_x)
                    .set("cy", bounds.min_y() + head_radius)
                    .set("r", head_radius)
                    .set("fill", SHAPE_FILL)
                    .set("stroke", stroke.as_str()),
            )
            .add(limb(center_x, neck_y, center_x, hip_y))
            .add(limb(bounds.min_x(), arm_y, bounds.max_x(), arm_y))
            .add(limb(center_x, hip_y, bounds.min_x(), bounds.max_y()))
            .add(limb(center_x, hip_y, bounds.max_x(), bounds.max_y()))
            .add(text(
                Point::new(center_x, bounds.max_y() + LINE_HEIGHT),
                name,
                "middle",
            ))
    }

    fn render_relationship<S>(
        &self,
        store: &S,
        view: &RelationshipView,
        by_view: &HashMap<ViewId, Bounds>,
    ) -> Option<svg_element::Group>
    where
        S: ModelStore + ?Sized,
    {
        let tail = by_view.get(&view.tail)?.center();
        let head = by_view.get(&view.head)?.center();
        let element = store.element(view.model)?;
        let relationship = element.relationship()?;

        let mut line = svg_element::Line::new()
            .set("x1", tail.x())
            .set("y1", tail.y())
            .set("x2", head.x())
            .set("y2", head.y())
            .set("stroke", self.stroke());
        if is_dashed(relationship.kind) {
            line = line.set("stroke-dasharray", "6 4");
        }
        let (start, end) = markers(relationship);
        if let Some(marker) = start {
            line = line.set("marker-start", format!("url(#{marker})"));
        }
        if let Some(marker) = end {
            line = line.set("marker-end", format!("url(#{marker})"));
        }

        let label = match relationship.kind {
            RelationshipKind::Include => "\u{ab}include\u{bb}".to_string(),
            RelationshipKind::Extend => "\u{ab}extend\u{bb}".to_string(),
            _ => element.name.clone(),
        };
        let mut group = svg_element::Group::new().add(line);
        if !label.is_empty() {
            let middle = Point::new((tail.x() + head.x()) / 2, (tail.y() + head.y()) / 2 - 4);
            group = group.add(text(middle, &label, "middle"));
        }
        Some(group)
    }

    fn rectangle(&self, bounds: Bounds, fill: &str) -> svg_element::Rectangle {
        svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", fill)
            .set("stroke", self.stroke())
    }

    fn marker_definitions(&self) -> svg_element::Definitions {
        let stroke = self.stroke();
        let marker = |id: &str, path: &str, fill: &str, ref_x: i32| {
            svg_element::Marker::new()
                .set("id", id)
                .set("viewBox", "0 0 20 10")
                .set("refX", ref_x)
                .set("refY", 5)
                .set("markerWidth", 12)
                .set("markerHeight", 6)
                .set("orient", "auto-start-reverse")
                .add(
                    svg_element::Path::new()
                        .set("d", path)
                        .set("fill", fill)
                        .set("stroke", stroke.as_str()),
                )
        };

        svg_element::Definitions::new()
            .add(marker("triangle", "M 0 0 L 10 5 L 0 10 z", SHAPE_FILL, 10))
            .add(marker("arrow", "M 0 0 L 10 5 L 0 10", "none", 10))
            .add(marker(
                "diamond-filled",
                "M 0 5 L 10 0 L 20 5 L 10 10 z",
                stroke.as_str(),
                20,
            ))
            .add(marker(
                "diamond",
                "M 0 5 L 10 0 L 20 5 L 10 10 z",
                SHAPE_FILL,
                20,
            ))
    }
}

impl Exporter for Svg {
    fn export_layout<S>(&mut self, store: &S, layout: &LayoutReport) -> Result<(), Error>
    where
        S: ModelStore + ?Sized,
    {
        let doc = self.render(store, layout);
        if let Some(path) = &self.output {
            svg::save(path, &doc).map_err(Error::Io)?;
            info!(path:? = path; "SVG preview written");
        }
        self.rendered = Some(doc.to_string());
        Ok(())
    }
}

fn text(position: Point, content: &str, anchor: &str) -> svg_element::Text {
    svg_element::Text::new(content)
        .set("x", position.x())
        .set("y", position.y())
        .set("text-anchor", anchor)
}

fn member_lines(element: &ModelElement) -> Vec<String> {
    if let Some(literals) = element.literals() {
        return literals.iter().map(|literal| literal.name.clone()).collect();
    }
    let Some(classifier) = element.classifier() else {
        return Vec::new();
    };

    let attributes = classifier.attributes.iter().map(|attribute| {
        let mut line = format!("{} {}", marker_of(attribute.visibility), attribute.name);
        if let Some(type_name) = &attribute.type_name {
            line.push_str(": ");
            line.push_str(type_name);
        }
        line
    });
    let operations = classifier.operations.iter().map(|operation| {
        let parameters = operation
            .inputs()
            .filter_map(|param| param.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        let mut line = format!(
            "{} {}({parameters})",
            marker_of(operation.visibility),
            operation.name
        );
        if let Some(return_type) = operation.return_type() {
            line.push_str(": ");
            line.push_str(return_type);
        }
        line
    });
    attributes.chain(operations).collect()
}

fn marker_of(visibility: Visibility) -> char {
    match visibility {
        Visibility::Public => '+',
        Visibility::Private => '-',
        Visibility::Protected => '#',
        Visibility::Package => '~',
    }
}

fn is_dashed(kind: RelationshipKind) -> bool {
    matches!(
        kind,
        RelationshipKind::InterfaceRealization
            | RelationshipKind::Dependency
            | RelationshipKind::Include
            | RelationshipKind::Extend
    )
}

/// Marker ids for the tail and head of a relationship line.
fn markers(relationship: &Relationship) -> (Option<&'static str>, Option<&'static str>) {
    match relationship.kind {
        RelationshipKind::Generalization | RelationshipKind::InterfaceRealization => {
            (None, Some("triangle"))
        }
        RelationshipKind::Dependency | RelationshipKind::Include | RelationshipKind::Extend => {
            (None, Some("arrow"))
        }
        RelationshipKind::Association => {
            let end_marker = |aggregation: Aggregation, navigable: bool| match aggregation {
                Aggregation::Composite => Some("diamond-filled"),
                Aggregation::Shared => Some("diamond"),
                Aggregation::None if navigable => Some("arrow"),
                Aggregation::None => None,
            };
            (
                end_marker(relationship.end1.aggregation, relationship.end1.navigable),
                end_marker(relationship.end2.aggregation, relationship.end2.navigable),
            )
        }
    }
}
