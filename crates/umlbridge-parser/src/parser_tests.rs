//! Tests for the whole text-to-model pass.
//!
//! These run the parser against an in-memory workspace and check the
//! created elements, the alias table, the relationship blueprints and the
//! reported diagnostics.

use umlbridge_core::{
    model::{
        Aggregation, ElementId, ElementKind, ModelElement, RelationshipKind, Visibility,
    },
    store::{MemoryWorkspace, ModelStore, NewElement, StoreError},
    view::DiagramKind,
};

use crate::{ParseOutput, error::ErrorCode, parse};

fn parse_fresh(source: &str) -> (MemoryWorkspace, ParseOutput) {
    let mut workspace = MemoryWorkspace::new("Test");
    let root = workspace.project_root();
    let output = parse(source, &mut workspace, root);
    (workspace, output)
}

fn element<'w>(workspace: &'w MemoryWorkspace, output: &ParseOutput, alias: &str) -> &'w ModelElement {
    let id = output
        .element(alias)
        .unwrap_or_else(|| panic!("`{alias}` should be registered"));
    workspace.element(id).expect("registered ids exist in the store")
}

fn codes(output: &ParseOutput) -> Vec<ErrorCode> {
    output
        .diagnostics
        .iter()
        .filter_map(|diag| diag.code())
        .collect()
}

/// Rejects every element whose name starts with `Broken`.
struct PickyStore {
    inner: MemoryWorkspace,
}

impl ModelStore for PickyStore {
    fn project_root(&self) -> ElementId {
        self.inner.project_root()
    }

    fn current_selection(&self) -> Vec<ElementId> {
        self.inner.current_selection()
    }

    fn element(&self, id: ElementId) -> Option<&ModelElement> {
        self.inner.element(id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut ModelElement> {
        self.inner.element_mut(id)
    }

    fn create_element(&mut self, request: NewElement) -> Result<ElementId, StoreError> {
        if request.name.starts_with("Broken") {
            return Err(StoreError::Rejected(format!("{} is broken", request.name)));
        }
        self.inner.create_element(request)
    }
}

#[test]
fn test_generalization_left_parent() {
    let (_, output) = parse_fresh("class A\nclass B\nA <|-- B\n");

    assert_eq!(output.blueprints.len(), 1);
    let blueprint = &output.blueprints[0];
    assert_eq!(blueprint.kind, RelationshipKind::Generalization);
    assert_eq!(Some(blueprint.source), output.element("B"));
    assert_eq!(Some(blueprint.target), output.element("A"));
}

#[test]
fn test_generalization_right_parent() {
    let (_, output) = parse_fresh("class A\nclass B\nA --|> B\n");

    let blueprint = &output.blueprints[0];
    assert_eq!(Some(blueprint.source), output.element("A"));
    assert_eq!(Some(blueprint.target), output.element("B"));
}

#[test]
fn test_composition_ends() {
    let (_, output) = parse_fresh("class A\nclass B\nA *-- B\nA --* B\n");

    let left = &output.blueprints[0];
    assert_eq!(left.kind, RelationshipKind::Association);
    assert_eq!(left.end1.aggregation, Aggregation::Composite);
    assert_eq!(left.end2.aggregation, Aggregation::None);

    let right = &output.blueprints[1];
    assert_eq!(right.end1.aggregation, Aggregation::None);
    assert_eq!(right.end2.aggregation, Aggregation::Composite);
}

#[test]
fn test_association_multiplicities_keep_written_order() {
    let (_, output) = parse_fresh("class Order\nclass Line\nOrder \"1\" o-- \"0..*\" Line : has\n");

    let blueprint = &output.blueprints[0];
    assert_eq!(Some(blueprint.source), output.element("Order"));
    assert_eq!(blueprint.end1.multiplicity.as_deref(), Some("1"));
    assert_eq!(blueprint.end1.aggregation, Aggregation::Shared);
    assert_eq!(blueprint.end2.multiplicity.as_deref(), Some("0..*"));
    assert_eq!(blueprint.label.as_deref(), Some("has"));
}

#[test]
fn test_garbage_member_line_is_skipped() {
    let (workspace, output) = parse_fresh("class A {\n  ???not-a-thing???\n}\n");

    let class = element(&workspace, &output, "A");
    assert_eq!(class.member_count(), 0);
    assert_eq!(codes(&output), vec![ErrorCode::W100]);
}

#[test]
fn test_package_visible_members_stay_in_their_class() {
    let source = "\
class Order {
  package count: int
  package total(): int
  ~ note
}
class Customer
";
    let (workspace, output) = parse_fresh(source);

    let order = element(&workspace, &output, "Order");
    let classifier = order.classifier().unwrap();
    assert_eq!(classifier.attributes.len(), 2);
    assert_eq!(classifier.attributes[0].name, "count");
    assert_eq!(classifier.attributes[0].visibility, Visibility::Package);
    assert_eq!(classifier.operations.len(), 1);
    assert_eq!(classifier.operations[0].visibility, Visibility::Package);

    assert!(workspace.elements().all(|e| !e.is_kind(ElementKind::Package)));
    assert_eq!(
        element(&workspace, &output, "Customer").parent(),
        Some(workspace.project_root())
    );
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_actor_inside_identifier_keeps_class_diagram() {
    let (workspace, output) = parse_fresh("class Reactor {\n  + power: int\n}\n");

    assert_eq!(output.diagram_kind, DiagramKind::Class);
    assert!(element(&workspace, &output, "Reactor").is_kind(ElementKind::Class));
}

#[test]
fn test_end_to_end_class_diagram() {
    let source = "\
@startuml
class Animal {
  + name: string
}
class Dog
Animal <|-- Dog
@enduml
";
    let (workspace, output) = parse_fresh(source);

    assert_eq!(output.diagram_kind, DiagramKind::Class);
    assert_eq!(output.unique_elements().len(), 2);

    let animal = element(&workspace, &output, "Animal");
    let attributes = &animal.classifier().unwrap().attributes;
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].name, "name");
    assert_eq!(attributes[0].type_name.as_deref(), Some("string"));
    assert_eq!(attributes[0].visibility, Visibility::Public);

    let blueprint = &output.blueprints[0];
    assert_eq!(blueprint.kind, RelationshipKind::Generalization);
    assert_eq!(workspace.element(blueprint.source).unwrap().name, "Dog");
    assert_eq!(workspace.element(blueprint.target).unwrap().name, "Animal");
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_operations_and_parameters() {
    let source = "\
interface Shape {
  + area(scale: float, unit): float
  # reset()
}
";
    let (workspace, output) = parse_fresh(source);

    let shape = element(&workspace, &output, "Shape");
    assert!(shape.is_kind(ElementKind::Interface));
    let operations = &shape.classifier().unwrap().operations;
    assert_eq!(operations.len(), 2);

    let area = &operations[0];
    assert_eq!(area.inputs().count(), 2);
    assert_eq!(area.return_type(), Some("float"));
    assert_eq!(area.parameters[1].type_name, None);

    let reset = &operations[1];
    assert_eq!(reset.visibility, Visibility::Protected);
    assert!(reset.parameters.is_empty());
}

#[test]
fn test_abstract_class_and_enumeration() {
    let source = "\
abstract class Vehicle {
}
enum Color {
  RED
  GREEN
  not a literal
}
";
    let (workspace, output) = parse_fresh(source);

    let vehicle = element(&workspace, &output, "Vehicle");
    assert!(vehicle.classifier().unwrap().is_abstract);

    let color = element(&workspace, &output, "Color");
    let literals: Vec<_> = color
        .literals()
        .unwrap()
        .iter()
        .map(|literal| literal.name.as_str())
        .collect();
    assert_eq!(literals, ["RED", "GREEN"]);
    assert_eq!(codes(&output), vec![ErrorCode::W100]);
}

#[test]
fn test_alias_registers_both_names() {
    let source = "\
actor \"Store Clerk\" as Clerk
usecase \"Ring up sale\" as UC1
Clerk --> UC1
";
    let (workspace, output) = parse_fresh(source);

    assert_eq!(output.diagram_kind, DiagramKind::UseCase);
    assert_eq!(output.element("Clerk"), output.element("Store Clerk"));
    assert_eq!(output.element("UC1"), output.element("Ring up sale"));
    assert_eq!(output.aliases.len(), 4);
    assert_eq!(output.unique_elements().len(), 2);

    let clerk = element(&workspace, &output, "Clerk");
    assert_eq!(clerk.name, "Store Clerk");

    let blueprint = &output.blueprints[0];
    assert_eq!(blueprint.kind, RelationshipKind::Association);
    assert!(blueprint.end2.navigable);
}

#[test]
fn test_include_stereotype() {
    let source = "\
usecase Checkout
usecase Pay
Checkout ..> Pay : <<include>>
";
    let (_, output) = parse_fresh(source);

    let blueprint = &output.blueprints[0];
    assert_eq!(blueprint.kind, RelationshipKind::Include);
    assert_eq!(blueprint.label, None);
}

#[test]
fn test_nested_packages() {
    let source = "\
package shop {
  package \"Order Handling\" as orders {
    class Order
  }
  class Customer
}
class Audit
";
    let (workspace, output) = parse_fresh(source);
    let root = workspace.project_root();

    let shop = element(&workspace, &output, "shop");
    let orders = element(&workspace, &output, "orders");
    assert_eq!(orders.name, "Order Handling");
    assert_eq!(orders.parent(), Some(shop.id()));
    assert_eq!(shop.parent(), Some(root));

    assert_eq!(element(&workspace, &output, "Order").parent(), Some(orders.id()));
    assert_eq!(element(&workspace, &output, "Customer").parent(), Some(shop.id()));
    assert_eq!(element(&workspace, &output, "Audit").parent(), Some(root));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_package_without_brace_is_not_entered() {
    let (workspace, output) = parse_fresh("package util\nclass Helper\n");

    let root = workspace.project_root();
    assert!(element(&workspace, &output, "util").is_kind(ElementKind::Package));
    assert_eq!(element(&workspace, &output, "Helper").parent(), Some(root));
}

#[test]
fn test_inline_body_does_not_capture_following_lines() {
    let (workspace, output) = parse_fresh("class Empty {}\nclass Next\nEmpty -- Next\n");

    assert_eq!(element(&workspace, &output, "Empty").member_count(), 0);
    assert_eq!(output.blueprints.len(), 1);
}

#[test]
fn test_close_brace_underflow() {
    let (workspace, output) = parse_fresh("}\n}\nclass A\n");

    assert_eq!(
        element(&workspace, &output, "A").parent(),
        Some(workspace.project_root())
    );
    assert_eq!(codes(&output), vec![ErrorCode::W103, ErrorCode::W103]);
}

#[test]
fn test_unclosed_block_reported() {
    let (_, output) = parse_fresh("package p {\nclass A {\n");

    assert_eq!(codes(&output), vec![ErrorCode::W103, ErrorCode::W103]);
    let diag = &output.diagnostics[0];
    assert_eq!(diag.labels().len(), 2);
}

#[test]
fn test_unresolved_endpoint_drops_relationship() {
    let (_, output) = parse_fresh("class A\nA --> Ghost\n");

    assert!(output.blueprints.is_empty());
    assert_eq!(codes(&output), vec![ErrorCode::W101]);
    assert!(output.diagnostics[0].message().contains("Ghost"));
}

#[test]
fn test_relationship_before_declaration_is_unresolved() {
    let (_, output) = parse_fresh("A -- B\nclass A\nclass B\n");

    assert!(output.blueprints.is_empty());
    assert_eq!(codes(&output), vec![ErrorCode::W101]);
}

#[test]
fn test_unsupported_arrow() {
    let (_, output) = parse_fresh("class A\nclass B\nA -..- B\n");

    assert!(output.blueprints.is_empty());
    assert_eq!(codes(&output), vec![ErrorCode::W102]);
}

#[test]
fn test_directives_and_comments_are_ignored() {
    let source = "\
@startuml
' a comment
skinparam monochrome true
left to right direction
hide empty members
title Domain
class A
@enduml
";
    let (_, output) = parse_fresh(source);

    assert_eq!(output.unique_elements().len(), 1);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_redeclaration_keeps_first_position() {
    let (_, output) = parse_fresh("class A\nclass B\nclass A\n");

    let keys: Vec<String> = output.aliases.keys().map(ToString::to_string).collect();
    assert_eq!(keys, ["A", "B"]);
    assert_eq!(output.unique_elements().len(), 2);
}

#[test]
fn test_rejected_element_is_skipped() {
    let source = "\
class Good
class Broken {
  + field: int
}
Good -- Broken
class BrokenToo
";
    let mut store = PickyStore {
        inner: MemoryWorkspace::new("Test"),
    };
    let root = store.project_root();
    let output = parse(source, &mut store, root);

    assert!(output.element("Good").is_some());
    assert!(output.element("Broken").is_none());
    assert!(output.element("BrokenToo").is_none());
    assert_eq!(
        codes(&output),
        vec![
            ErrorCode::W104,
            ErrorCode::W101,
            ErrorCode::W104,
        ]
    );
}

#[test]
fn test_rejected_package_keeps_braces_balanced() {
    let source = "\
package BrokenPkg {
  class Inner
}
class Outer
";
    let mut store = PickyStore {
        inner: MemoryWorkspace::new("Test"),
    };
    let root = store.project_root();
    let output = parse(source, &mut store, root);

    let outer = output.element("Outer").unwrap();
    let inner = output.element("Inner").unwrap();
    assert_eq!(store.element(outer).unwrap().parent(), Some(root));
    assert_eq!(store.element(inner).unwrap().parent(), Some(root));
    assert_eq!(codes(&output), vec![ErrorCode::W104]);
}

#[test]
fn test_diagnostic_spans_point_at_line() {
    let source = "class A\n  A => B\n";
    let (_, output) = parse_fresh(source);

    let span = output.diagnostics[0].primary_span().unwrap();
    assert_eq!(&source[span.to_range()], "A => B");
}

mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z ]{0,12}",
            "(class|enum|interface|actor|usecase|package) [A-Za-z\"]{1,8}( \\{| \\{\\})?",
            "[A-Za-z]{1,4} [-.<|>*o]{1,5} [A-Za-z]{1,4}( : [a-z<>]{0,10})?",
            "[+#~-]?[a-z]{1,6}(\\([a-z:, ]{0,10}\\))?(: [a-z]{1,5})?",
            Just("}".to_string()),
            Just("{".to_string()),
            "\\PC{0,20}",
        ]
    }

    proptest! {
        #[test]
        fn arbitrary_lines_never_panic(lines in prop::collection::vec(line_strategy(), 0..30)) {
            let source = lines.join("\n");
            let (workspace, output) = parse_fresh(&source);

            for id in output.aliases.values() {
                prop_assert!(workspace.element(*id).is_some());
            }
            for blueprint in &output.blueprints {
                prop_assert!(workspace.element(blueprint.source).is_some());
                prop_assert!(workspace.element(blueprint.target).is_some());
            }
        }

        #[test]
        fn arbitrary_text_never_panics(source in "\\PC{0,200}") {
            let _ = parse_fresh(&source);
        }
    }
}
