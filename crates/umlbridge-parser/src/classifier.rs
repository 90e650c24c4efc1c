//! Maps an arrow token to a relationship kind.
//!
//! Arrows are matched by substring, first rule wins:
//!
//! | arrow              | kind                   | notes                              |
//! |--------------------|------------------------|------------------------------------|
//! | `<\|--` `--\|>`    | generalization         | `<\|--` points at the parent       |
//! | `<\|..` `..\|>`    | interface realization  | `<\|..` points at the interface    |
//! | `*--` `--*`        | association            | composite on the marked end        |
//! | `o--` `--o`        | association            | shared on the marked end           |
//! | `-->` `<--`        | association/dependency | see [`classify`]                   |
//! | `..>` `<..`        | dependency             | `<..` points at the depended-upon  |
//! | `--` `..` `---`... | association            | undirected                         |

use umlbridge_core::model::{Aggregation, ElementKind, RelationshipKind};

use crate::blueprint::EndSpec;

const INCLUDE_STEREOTYPE: &str = "<<include>>";
const EXTEND_STEREOTYPE: &str = "<<extend>>";

/// The outcome of classifying one arrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: RelationshipKind,
    /// `true` when the right operand is the semantic source.
    pub swapped: bool,
    /// Decoration of the left operand's end.
    pub end1: EndSpec,
    /// Decoration of the right operand's end.
    pub end2: EndSpec,
    /// The label left after stereotype handling.
    pub label: Option<String>,
}

impl Classification {
    fn new(kind: RelationshipKind, swapped: bool) -> Self {
        Self {
            kind,
            swapped,
            end1: EndSpec::default(),
            end2: EndSpec::default(),
            label: None,
        }
    }

    fn with_ends(mut self, end1: EndSpec, end2: EndSpec) -> Self {
        self.end1 = end1;
        self.end2 = end2;
        self
    }
}

/// Classifies `arrow` written between a `left` and a `right` endpoint.
///
/// `-->` and `<--` depend on the endpoints: when either side is an actor or
/// a use case the result is an association navigable toward the arrow head.
/// Between other kinds a token that also carries a dotted head (`..>` or
/// `<..`) is a dependency, anything else a directed association.
///
/// A label containing `<<include>>` or `<<extend>>` turns an association or
/// dependency into an include or extend and is consumed.
///
/// Returns `None` when the arrow matches no rule.
///
/// # Examples
///
/// ```
/// use umlbridge_core::model::{ElementKind, RelationshipKind};
/// use umlbridge_parser::classifier::classify;
///
/// let parent_left = classify("<|--", ElementKind::Class, ElementKind::Class, None).unwrap();
/// assert_eq!(parent_left.kind, RelationshipKind::Generalization);
/// assert!(parent_left.swapped);
///
/// let include = classify(
///     "..>",
///     ElementKind::UseCase,
///     ElementKind::UseCase,
///     Some("<<include>>"),
/// )
/// .unwrap();
/// assert_eq!(include.kind, RelationshipKind::Include);
/// assert_eq!(include.label, None);
/// ```
pub fn classify(
    arrow: &str,
    left: ElementKind,
    right: ElementKind,
    label: Option<&str>,
) -> Option<Classification> {
    let classification = classify_arrow(arrow, left, right)?;
    Some(apply_label(classification, label))
}

fn classify_arrow(arrow: &str, left: ElementKind, right: ElementKind) -> Option<Classification> {
    use RelationshipKind::*;

    let has = |pattern: &str| arrow.contains(pattern);

    if has("<|--") || has("--|>") {
        return Some(Classification::new(Generalization, has("<|--")));
    }
    if has("<|..") || has("..|>") {
        return Some(Classification::new(InterfaceRealization, has("<|..")));
    }
    if has("*--") || has("--*") {
        return Some(Classification::new(Association, false).with_ends(
            aggregated_if(has("*--"), Aggregation::Composite),
            aggregated_if(has("--*"), Aggregation::Composite),
        ));
    }
    if has("o--") || has("--o") {
        return Some(Classification::new(Association, false).with_ends(
            aggregated_if(has("o--"), Aggregation::Shared),
            aggregated_if(has("--o"), Aggregation::Shared),
        ));
    }
    if has("-->") || has("<--") {
        let participants = left.is_use_case_participant() || right.is_use_case_participant();
        if !participants && (has("..>") || has("<..")) {
            return Some(Classification::new(Dependency, has("<..")));
        }
        return Some(Classification::new(Association, false).with_ends(
            navigable_if(has("<--")),
            navigable_if(has("-->")),
        ));
    }
    if has("..>") || has("<..") {
        return Some(Classification::new(Dependency, has("<..")));
    }
    if is_bare_line(arrow) {
        return Some(Classification::new(Association, false));
    }
    None
}

fn apply_label(mut classification: Classification, label: Option<&str>) -> Classification {
    let label = label.map(str::trim).filter(|label| !label.is_empty());
    classification.label = label.map(str::to_string);

    let Some(label) = label else {
        return classification;
    };
    if !matches!(
        classification.kind,
        RelationshipKind::Association | RelationshipKind::Dependency
    ) {
        return classification;
    }

    if label.contains(INCLUDE_STEREOTYPE) {
        classification.kind = RelationshipKind::Include;
        classification.label = None;
    } else if label.contains(EXTEND_STEREOTYPE) {
        classification.kind = RelationshipKind::Extend;
        classification.label = None;
    }
    classification
}

/// A run of at least two `-` or two `.` and nothing else.
fn is_bare_line(arrow: &str) -> bool {
    arrow.len() >= 2 && (arrow.chars().all(|c| c == '-') || arrow.chars().all(|c| c == '.'))
}

fn aggregated_if(marked: bool, aggregation: Aggregation) -> EndSpec {
    if marked {
        EndSpec::aggregated(aggregation)
    } else {
        EndSpec::default()
    }
}

fn navigable_if(pointed: bool) -> EndSpec {
    if pointed {
        EndSpec::navigable()
    } else {
        EndSpec::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASS: ElementKind = ElementKind::Class;

    fn kind_of(arrow: &str) -> Option<RelationshipKind> {
        classify(arrow, CLASS, CLASS, None).map(|c| c.kind)
    }

    #[test]
    fn test_generalization_direction() {
        let left_parent = classify("<|--", CLASS, CLASS, None).unwrap();
        let right_parent = classify("--|>", CLASS, CLASS, None).unwrap();

        assert_eq!(left_parent.kind, RelationshipKind::Generalization);
        assert!(left_parent.swapped);
        assert_eq!(right_parent.kind, RelationshipKind::Generalization);
        assert!(!right_parent.swapped);
    }

    #[test]
    fn test_interface_realization() {
        let left_interface = classify("<|..", CLASS, ElementKind::Interface, None).unwrap();
        assert_eq!(left_interface.kind, RelationshipKind::InterfaceRealization);
        assert!(left_interface.swapped);
        assert!(!classify("..|>", CLASS, CLASS, None).unwrap().swapped);
    }

    #[test]
    fn test_composition_marks_the_diamond_end() {
        let left = classify("*--", CLASS, CLASS, None).unwrap();
        assert_eq!(left.end1.aggregation, Aggregation::Composite);
        assert_eq!(left.end2.aggregation, Aggregation::None);

        let right = classify("--*", CLASS, CLASS, None).unwrap();
        assert_eq!(right.end1.aggregation, Aggregation::None);
        assert_eq!(right.end2.aggregation, Aggregation::Composite);
    }

    #[test]
    fn test_shared_aggregation() {
        let both = classify("o--o", CLASS, CLASS, None).unwrap();
        assert_eq!(both.kind, RelationshipKind::Association);
        assert_eq!(both.end1.aggregation, Aggregation::Shared);
        assert_eq!(both.end2.aggregation, Aggregation::Shared);
    }

    #[test]
    fn test_arrow_between_use_case_participants_is_association() {
        let actor_to_case = classify("-->", ElementKind::Actor, ElementKind::UseCase, None).unwrap();
        assert_eq!(actor_to_case.kind, RelationshipKind::Association);
        assert!(actor_to_case.end2.navigable);
        assert!(!actor_to_case.end1.navigable);

        let reversed = classify("<--", ElementKind::UseCase, CLASS, None).unwrap();
        assert!(reversed.end1.navigable);
        assert!(!reversed.end2.navigable);
    }

    #[test]
    fn test_directed_association_between_classes() {
        let classification = classify("-->", CLASS, CLASS, None).unwrap();
        assert_eq!(classification.kind, RelationshipKind::Association);
        assert!(classification.end2.navigable);
    }

    #[test]
    fn test_mixed_arrow_prefers_dependency_between_classes() {
        let classification = classify("<..-->", CLASS, CLASS, None).unwrap();
        assert_eq!(classification.kind, RelationshipKind::Dependency);
        assert!(classification.swapped);

        let with_actor = classify("<..-->", ElementKind::Actor, CLASS, None).unwrap();
        assert_eq!(with_actor.kind, RelationshipKind::Association);
    }

    #[test]
    fn test_dependency_direction() {
        assert!(!classify("..>", CLASS, CLASS, None).unwrap().swapped);
        assert!(classify("<..", CLASS, CLASS, None).unwrap().swapped);
        assert_eq!(kind_of("..>"), Some(RelationshipKind::Dependency));
    }

    #[test]
    fn test_bare_lines() {
        assert_eq!(kind_of("--"), Some(RelationshipKind::Association));
        assert_eq!(kind_of(".."), Some(RelationshipKind::Association));
        assert_eq!(kind_of("----"), Some(RelationshipKind::Association));
        assert_eq!(kind_of("..."), Some(RelationshipKind::Association));
    }

    #[test]
    fn test_unknown_arrows() {
        assert_eq!(kind_of("-.-"), None);
        assert_eq!(kind_of("-"), None);
        assert_eq!(kind_of("=>"), None);
    }

    #[test]
    fn test_label_stereotypes() {
        let include = classify("..>", ElementKind::UseCase, ElementKind::UseCase, Some("<<include>>"))
            .unwrap();
        assert_eq!(include.kind, RelationshipKind::Include);
        assert_eq!(include.label, None);

        let extend = classify("--", ElementKind::UseCase, ElementKind::UseCase, Some(" <<extend>> "))
            .unwrap();
        assert_eq!(extend.kind, RelationshipKind::Extend);
    }

    #[test]
    fn test_stereotype_ignored_on_generalization() {
        let classification = classify("<|--", CLASS, CLASS, Some("<<include>>")).unwrap();
        assert_eq!(classification.kind, RelationshipKind::Generalization);
        assert_eq!(classification.label.as_deref(), Some("<<include>>"));
    }

    #[test]
    fn test_plain_label_is_kept() {
        let classification = classify("--", CLASS, CLASS, Some("owns")).unwrap();
        assert_eq!(classification.label.as_deref(), Some("owns"));
        assert_eq!(classify("--", CLASS, CLASS, Some("  ")).unwrap().label, None);
    }
}
