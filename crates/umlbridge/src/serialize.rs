//! Serialization of model elements back to diagram text.
//!
//! Only classes and associations are written. Other kinds in the selection
//! are skipped, so the output is always text the parser accepts.

use std::fmt::Write as _;

use log::{debug, trace};

use umlbridge_core::{
    model::{
        Attribute, ElementBody, ElementId, ModelElement, Operation, Relationship,
        RelationshipKind,
    },
    store::ModelStore,
};

/// Tag whose value is written as an `AI_CMD` comment.
const AI_TAG: &str = "AI";

/// Writes `elements` as diagram text wrapped in `@startuml`/`@enduml`.
///
/// Elements unknown to the store are ignored.
///
/// # Examples
///
/// ```
/// use umlbridge::serialize::to_text;
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
/// let text = to_text(&workspace, &[order]);
/// assert_eq!(text, "@startuml\nclass Order {\n}\n@enduml");
/// ```
pub fn to_text<S>(store: &S, elements: &[ElementId]) -> String
where
    S: ModelStore + ?Sized,
{
    let mut out = String::from("@startuml\n");
    let mut written = 0;

    for &id in elements {
        let Some(element) = store.element(id) else {
            debug!(element:% = id; "Skipping unknown element");
            continue;
        };

        match &element.body {
            ElementBody::Class(classifier) => {
                write_comments(&mut out, element);
                let _ = writeln!(out, "class {} {{", quote_name(&element.name));
                for attribute in &classifier.attributes {
                    write_attribute(&mut out, attribute);
                }
                for operation in &classifier.operations {
                    write_operation(&mut out, operation);
                }
                out.push_str("}\n");
                written += 1;
            }
            ElementBody::Relationship(relationship)
                if relationship.kind == RelationshipKind::Association =>
            {
                write_comments(&mut out, element);
                write_association(&mut out, store, element, relationship);
                written += 1;
            }
            _ => {
                trace!(element:% = id, name = element.name.as_str(); "Element kind is not serialized");
            }
        }
    }

    out.push_str("@enduml");
    debug!(selected = elements.len(), written; "Serialized elements to text");
    out
}

fn write_comments(out: &mut String, element: &ModelElement) {
    if let Some(documentation) = element.documentation.as_deref() {
        for line in documentation.lines() {
            let _ = writeln!(out, "' {line}");
        }
    }
    if let Some(command) = element.tag(AI_TAG).filter(|value| !value.is_empty()) {
        let _ = writeln!(out, "' AI_CMD: {command}");
    }
}

fn write_attribute(out: &mut String, attribute: &Attribute) {
    let _ = write!(out, "  {} {}", attribute.visibility, attribute.name);
    if let Some(type_name) = &attribute.type_name {
        let _ = write!(out, ": {type_name}");
    }
    out.push('\n');
}

fn write_operation(out: &mut String, operation: &Operation) {
    let parameters = operation
        .inputs()
        .map(|param| {
            let name = param.name.as_deref().unwrap_or_default();
            match &param.type_name {
                Some(type_name) => format!("{name}: {type_name}"),
                None => name.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    let _ = write!(
        out,
        "  {} {}({parameters})",
        operation.visibility, operation.name
    );
    if let Some(return_type) = operation.return_type() {
        let _ = write!(out, ": {return_type}");
    }
    out.push('\n');
}

fn write_association<S>(
    out: &mut String,
    store: &S,
    element: &ModelElement,
    relationship: &Relationship,
) where
    S: ModelStore + ?Sized,
{
    let end_name = |id: ElementId| {
        store
            .element(id)
            .map_or_else(|| id.to_string(), |end| quote_name(&end.name))
    };

    let mut parts = vec![end_name(relationship.end1.reference)];
    if let Some(multiplicity) = &relationship.end1.multiplicity {
        parts.push(format!("\"{multiplicity}\""));
    }
    parts.push("--".to_string());
    if let Some(multiplicity) = &relationship.end2.multiplicity {
        parts.push(format!("\"{multiplicity}\""));
    }
    parts.push(end_name(relationship.end2.reference));

    out.push_str(&parts.join(" "));
    if !element.name.trim().is_empty() {
        let _ = write!(out, " : {}", element.name.trim());
    }
    out.push('\n');
}

/// Quotes names the parser would not read back as a single token.
fn quote_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

#[cfg(test)]
mod tests {
    use umlbridge_core::{
        geometry::Point,
        model::{ElementKind, Parameter, Tag, Visibility},
        store::{MemoryWorkspace, NewElement, NewRelationship, ViewStore},
        view::DiagramKind,
    };

    use super::*;

    fn class(workspace: &mut MemoryWorkspace, name: &str) -> ElementId {
        let root = workspace.project_root();
        workspace
            .create_element(NewElement::new(ElementKind::Class, root, name))
            .unwrap()
    }

    #[test]
    fn test_class_members() {
        let mut workspace = MemoryWorkspace::new("Zoo");
        let animal = class(&mut workspace, "Animal");
        workspace
            .add_attribute(
                animal,
                Attribute {
                    name: "name".to_string(),
                    type_name: Some("string".to_string()),
                    visibility: Visibility::Public,
                    default_value: None,
                },
            )
            .unwrap();
        workspace
            .add_attribute(
                animal,
                Attribute {
                    name: "age".to_string(),
                    type_name: None,
                    visibility: Visibility::Private,
                    default_value: None,
                },
            )
            .unwrap();
        workspace
            .add_operation(
                animal,
                Operation {
                    name: "feed".to_string(),
                    visibility: Visibility::Protected,
                    parameters: vec![
                        Parameter::input("food", Some("Food".to_string())),
                        Parameter::input("amount", None),
                        Parameter::returning("bool"),
                    ],
                },
            )
            .unwrap();

        let text = to_text(&workspace, &[animal]);

        assert_eq!(
            text,
            "@startuml\n\
             class Animal {\n\
             \x20 public name: string\n\
             \x20 private age\n\
             \x20 protected feed(food: Food, amount): bool\n\
             }\n\
             @enduml"
        );
    }

    #[test]
    fn test_comments_and_ai_tag() {
        let mut workspace = MemoryWorkspace::new("Zoo");
        let animal = class(&mut workspace, "Animal");
        let element = workspace.element_mut(animal).unwrap();
        element.documentation = Some("Base type\nof every animal".to_string());
        element.tags.push(Tag::new("AI", "add a habitat"));

        let text = to_text(&workspace, &[animal]);

        assert!(text.contains("' Base type\n' of every animal\n' AI_CMD: add a habitat\nclass Animal {"));
    }

    #[test]
    fn test_empty_ai_tag_is_not_written() {
        let mut workspace = MemoryWorkspace::new("Zoo");
        let animal = class(&mut workspace, "Animal");
        workspace
            .element_mut(animal)
            .unwrap()
            .tags
            .push(Tag::new("AI", ""));

        assert!(!to_text(&workspace, &[animal]).contains("AI_CMD"));
    }

    #[test]
    fn test_association_line() {
        let mut workspace = MemoryWorkspace::new("Shop");
        let order = class(&mut workspace, "Order");
        let line = class(&mut workspace, "Order Line");
        let root = workspace.project_root();
        let diagram = workspace.create_diagram(DiagramKind::Class, root).unwrap();
        let order_view = workspace
            .create_view(order, diagram, Point::new(0, 0), None)
            .unwrap();
        let line_view = workspace
            .create_view(line, diagram, Point::new(200, 0), None)
            .unwrap();
        let relationship = workspace
            .create_relationship_view(NewRelationship {
                kind: RelationshipKind::Association,
                diagram,
                source: order,
                target: line,
                source_view: order_view,
                target_view: line_view,
            })
            .unwrap();

        let element = workspace.element_mut(relationship.model).unwrap();
        element.name = "contains".to_string();
        let ends = element.relationship_mut().unwrap();
        ends.end1.multiplicity = Some("1".to_string());
        ends.end2.multiplicity = Some("*".to_string());

        let text = to_text(&workspace, &[relationship.model]);

        assert_eq!(
            text,
            "@startuml\nOrder \"1\" -- \"*\" \"Order Line\" : contains\n@enduml"
        );
    }

    #[test]
    fn test_other_kinds_are_skipped() {
        let mut workspace = MemoryWorkspace::new("Zoo");
        let root = workspace.project_root();
        let actor = workspace
            .create_element(NewElement::new(ElementKind::Actor, root, "Keeper"))
            .unwrap();

        assert_eq!(to_text(&workspace, &[actor]), "@startuml\n@enduml");
    }
}
