//! Line grammar for diagram text.
//!
//! The text is line oriented, so every recognizer here takes one trimmed
//! line and either returns its parts or `None` when the line has another
//! shape. Recognizers borrow from the line; nothing is allocated until the
//! parser turns the parts into model data.

use winnow::{
    Parser as _,
    ascii::{space0, space1},
    combinator::{alt, delimited, opt, preceded},
    error::{ContextError, ErrMode},
    token::take_while,
};

use umlbridge_core::model::{ElementKind, Visibility};

type Input<'s> = &'s str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Lines that configure rendering and carry no model content.
const DIRECTIVE_PREFIXES: &[&str] = &[
    "skinparam",
    "top to bottom direction",
    "left to right direction",
    "hide ",
    "show ",
    "title ",
];

/// Type names that stand for "no type".
const ABSENT_TYPES: &[&str] = &["undefined", "null"];

/// How an element header line ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Block {
    /// No `{`: the header declares the element and nothing else.
    None,
    /// A `{` opens a body continued on the following lines.
    Open,
    /// `{ ... }` opened and closed on the header line.
    Inline,
}

/// `package <name> [as <alias>] [{]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PackageHeader<'s> {
    pub name: &'s str,
    pub alias: Option<&'s str>,
    pub opens: bool,
}

/// `<keyword> <name> [as <alias>] [...] [{]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntityHeader<'s> {
    pub kind: ElementKind,
    pub is_abstract: bool,
    pub name: &'s str,
    pub alias: Option<&'s str>,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParameterLine<'s> {
    pub name: &'s str,
    pub type_name: Option<&'s str>,
}

/// `[vis] name(params)[: return]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OperationLine<'s> {
    pub visibility: Visibility,
    pub name: &'s str,
    pub parameters: Vec<ParameterLine<'s>>,
    pub return_type: Option<&'s str>,
}

/// `[vis] name[: type][= default]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeLine<'s> {
    pub visibility: Visibility,
    pub name: &'s str,
    pub type_name: Option<&'s str>,
    pub default_value: Option<&'s str>,
}

/// `left ["m1"] ARROW ["m2"] right [: label]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelationshipLine<'s> {
    pub left: &'s str,
    pub left_multiplicity: Option<&'s str>,
    pub arrow: &'s str,
    pub right_multiplicity: Option<&'s str>,
    pub right: &'s str,
    pub label: Option<&'s str>,
}

/// Returns `true` for lines the parser ignores outright: comments,
/// `@start`/`@end` markers and rendering directives.
pub(crate) fn is_ignored(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('\'')
        || line.starts_with('@')
        || DIRECTIVE_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

pub(crate) fn is_block_close(line: &str) -> bool {
    line == "}"
}

/// Returns `true` if `text` contains `usecase` or `actor` as a whole word
/// followed by whitespace or the end of the text, ignoring case.
pub(crate) fn mentions_use_case_keyword(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    ["usecase", "actor"]
        .iter()
        .any(|keyword| has_keyword(&lower, keyword))
}

fn has_keyword(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + keyword.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && after.is_none_or(char::is_whitespace)
    })
}

pub(crate) fn package_header(line: &str) -> Option<PackageHeader<'_>> {
    if line.contains('}') {
        return None;
    }
    let mut input = line;
    let (name, alias) = preceded(("package", space1), name_and_alias)
        .parse_next(&mut input)
        .ok()?;
    Some(PackageHeader {
        name,
        alias,
        opens: input.contains('{'),
    })
}

pub(crate) fn entity_header(line: &str) -> Option<EntityHeader<'_>> {
    let mut input = line;
    let ((kind, is_abstract), (name, alias)) =
        (entity_keyword, name_and_alias).parse_next(&mut input).ok()?;

    let block = match input.find('{') {
        None => Block::None,
        Some(open) if input[open..].contains('}') => Block::Inline,
        Some(_) => Block::Open,
    };
    Some(EntityHeader {
        kind,
        is_abstract,
        name,
        alias,
        block,
    })
}

/// A bare identifier on its own line.
pub(crate) fn enumeration_literal(line: &str) -> Option<&str> {
    let mut input = line;
    let name = identifier.parse_next(&mut input).ok()?;
    input.is_empty().then_some(name)
}

/// Returns `true` if `line` reads as an operation or attribute.
pub(crate) fn is_member(line: &str) -> bool {
    operation(line).is_some() || attribute(line).is_some()
}

pub(crate) fn operation(line: &str) -> Option<OperationLine<'_>> {
    let mut input = line;
    let (visibility, name, _) = (opt(visibility), identifier, '(')
        .parse_next(&mut input)
        .ok()?;

    let close = input.rfind(')')?;
    let parameters = parameter_list(&input[..close]);
    let after = input[close + 1..].trim();
    let return_type = if after.is_empty() {
        None
    } else {
        present_type(after.strip_prefix(':')?)
    };

    Some(OperationLine {
        visibility: visibility.unwrap_or_default(),
        name,
        parameters,
        return_type,
    })
}

pub(crate) fn attribute(line: &str) -> Option<AttributeLine<'_>> {
    let mut input = line;
    let (visibility, name) = (opt(visibility), identifier)
        .parse_next(&mut input)
        .ok()?;

    let rest = input.trim();
    let (type_part, default_part) = if rest.is_empty() {
        (None, None)
    } else if let Some(typed) = rest.strip_prefix(':') {
        match typed.split_once('=') {
            Some((type_name, default)) => (Some(type_name), Some(default)),
            None => (Some(typed), None),
        }
    } else if let Some(default) = rest.strip_prefix('=') {
        (None, Some(default))
    } else {
        return None;
    };

    Some(AttributeLine {
        visibility: visibility.unwrap_or_default(),
        name,
        type_name: type_part.and_then(present_type),
        default_value: default_part.map(str::trim).filter(|value| !value.is_empty()),
    })
}

pub(crate) fn relationship(line: &str) -> Option<RelationshipLine<'_>> {
    let mut input = line;
    let (left, left_multiplicity, arrow) = (
        endpoint,
        opt(preceded(space0, quoted)),
        preceded(space0, arrow),
    )
        .parse_next(&mut input)
        .ok()?;
    let (right_multiplicity, right) = preceded(
        space0,
        alt((
            (quoted, space0, endpoint).map(|(multiplicity, _, right)| (Some(multiplicity), right)),
            endpoint.map(|right| (None, right)),
        )),
    )
    .parse_next(&mut input)
    .ok()?;

    let rest = input.trim();
    let label = if rest.is_empty() {
        None
    } else {
        Some(rest.strip_prefix(':')?.trim()).filter(|label| !label.is_empty())
    };

    Some(RelationshipLine {
        left,
        left_multiplicity,
        arrow,
        right_multiplicity,
        right,
        label,
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_arrow_char(c: char) -> bool {
    matches!(c, '-' | '.' | '<' | '>' | '|' | '*' | 'o' | '+')
}

fn identifier<'s>(input: &mut Input<'s>) -> IResult<&'s str> {
    take_while(1.., is_identifier_char).parse_next(input)
}

fn quoted<'s>(input: &mut Input<'s>) -> IResult<&'s str> {
    delimited('"', take_while(1.., |c: char| c != '"'), '"').parse_next(input)
}

/// A quoted string, or a single token up to whitespace or a brace.
fn name<'s>(input: &mut Input<'s>) -> IResult<&'s str> {
    alt((
        quoted,
        take_while(1.., |c: char| {
            !c.is_whitespace() && !matches!(c, '{' | '}' | '"')
        }),
    ))
    .parse_next(input)
}

fn name_and_alias<'s>(input: &mut Input<'s>) -> IResult<(&'s str, Option<&'s str>)> {
    (name, opt(preceded((space1, "as", space1), identifier))).parse_next(input)
}

fn entity_keyword(input: &mut Input<'_>) -> IResult<(ElementKind, bool)> {
    alt((
        ("abstract", space1, "class", space1).value((ElementKind::Class, true)),
        ("abstract", space1).value((ElementKind::Class, true)),
        ("class", space1).value((ElementKind::Class, false)),
        ("interface", space1).value((ElementKind::Interface, false)),
        ("enum", space1).value((ElementKind::Enumeration, false)),
        ("actor", space1).value((ElementKind::Actor, false)),
        ("usecase", space1).value((ElementKind::UseCase, false)),
    ))
    .parse_next(input)
}

/// `+ - # ~`, optionally followed by spaces, or a visibility keyword
/// followed by at least one space.
fn visibility(input: &mut Input<'_>) -> IResult<Visibility> {
    alt((
        (take_while(1, |c: char| matches!(c, '+' | '-' | '#' | '~')), space0)
            .map(|(marker, _)| marker)
            .verify_map(Visibility::from_marker),
        (
            alt(("public", "private", "protected", "package")),
            space1,
        )
            .map(|(keyword, _)| keyword)
            .verify_map(Visibility::from_marker),
    ))
    .parse_next(input)
}

fn endpoint<'s>(input: &mut Input<'s>) -> IResult<&'s str> {
    alt((quoted, identifier)).parse_next(input)
}

fn arrow<'s>(input: &mut Input<'s>) -> IResult<&'s str> {
    take_while(2.., is_arrow_char)
        .verify(|token: &str| token.contains("--") || token.contains(".."))
        .parse_next(input)
}

fn parameter_list(list: &str) -> Vec<ParameterLine<'_>> {
    list.split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(|param| match param.split_once(':') {
            Some((name, type_name)) => ParameterLine {
                name: name.trim(),
                type_name: present_type(type_name),
            },
            None => ParameterLine {
                name: param,
                type_name: None,
            },
        })
        .collect()
}

fn present_type(type_name: &str) -> Option<&str> {
    let type_name = type_name.trim();
    (!type_name.is_empty() && !ABSENT_TYPES.contains(&type_name)).then_some(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_lines() {
        assert!(is_ignored(""));
        assert!(is_ignored("' a comment"));
        assert!(is_ignored("@startuml"));
        assert!(is_ignored("skinparam classAttributeIconSize 0"));
        assert!(is_ignored("left to right direction"));
        assert!(!is_ignored("showroom -- Car"));
    }

    #[test]
    fn test_use_case_keyword_detection() {
        assert!(mentions_use_case_keyword("actor User"));
        assert!(mentions_use_case_keyword("@startuml\nUSECASE Pay\n"));
        assert!(mentions_use_case_keyword("x\nusecase"));
        assert!(!mentions_use_case_keyword("class Reactor {}"));
        assert!(!mentions_use_case_keyword("class actors"));
        assert!(!mentions_use_case_keyword("class Factor {\n}"));
    }

    #[test]
    fn test_package_header() {
        assert_eq!(
            package_header("package \"Sales Domain\" as sales {"),
            Some(PackageHeader {
                name: "Sales Domain",
                alias: Some("sales"),
                opens: true,
            })
        );
        assert_eq!(
            package_header("package model"),
            Some(PackageHeader {
                name: "model",
                alias: None,
                opens: false,
            })
        );
        assert_eq!(package_header("package model { }"), None);
        assert_eq!(package_header("packages model {"), None);
    }

    #[test]
    fn test_entity_header_kinds() {
        let header = entity_header("abstract class Shape {").unwrap();
        assert_eq!(header.kind, ElementKind::Class);
        assert!(header.is_abstract);
        assert_eq!(header.block, Block::Open);

        let header = entity_header("abstract Base").unwrap();
        assert!(header.is_abstract);
        assert_eq!(header.name, "Base");

        let header = entity_header("abstract classic").unwrap();
        assert_eq!(header.name, "classic");

        assert_eq!(
            entity_header("enum Color {").unwrap().kind,
            ElementKind::Enumeration
        );
        assert_eq!(
            entity_header("interface Drawable").unwrap().kind,
            ElementKind::Interface
        );
        assert!(entity_header("classy Dog").is_none());
    }

    #[test]
    fn test_entity_header_alias_and_blocks() {
        let header = entity_header("usecase \"Place order\" as UC1").unwrap();
        assert_eq!(header.kind, ElementKind::UseCase);
        assert_eq!(header.name, "Place order");
        assert_eq!(header.alias, Some("UC1"));
        assert_eq!(header.block, Block::None);

        let header = entity_header("class Point <<value>> {").unwrap();
        assert_eq!(header.name, "Point");
        assert_eq!(header.block, Block::Open);

        let header = entity_header("class Empty {}").unwrap();
        assert_eq!(header.block, Block::Inline);

        let header = entity_header("class Tight{").unwrap();
        assert_eq!(header.name, "Tight");
        assert_eq!(header.block, Block::Open);
    }

    #[test]
    fn test_enumeration_literal() {
        assert_eq!(enumeration_literal("RED"), Some("RED"));
        assert_eq!(enumeration_literal("RED,"), None);
        assert_eq!(enumeration_literal("dark red"), None);
    }

    #[test]
    fn test_operation() {
        let op = operation("+ area(scale: float, unit): float").unwrap();
        assert_eq!(op.visibility, Visibility::Public);
        assert_eq!(op.name, "area");
        assert_eq!(
            op.parameters,
            vec![
                ParameterLine {
                    name: "scale",
                    type_name: Some("float"),
                },
                ParameterLine {
                    name: "unit",
                    type_name: None,
                },
            ]
        );
        assert_eq!(op.return_type, Some("float"));

        let op = operation("#reset()").unwrap();
        assert_eq!(op.visibility, Visibility::Protected);
        assert!(op.parameters.is_empty());
        assert_eq!(op.return_type, None);

        let op = operation("private load(id: undefined): null").unwrap();
        assert_eq!(op.visibility, Visibility::Private);
        assert_eq!(op.parameters[0].type_name, None);
        assert_eq!(op.return_type, None);

        assert!(operation("name: string").is_none());
        assert!(operation("run() trailing").is_none());
    }

    #[test]
    fn test_attribute() {
        let attr = attribute("- count: int = 0").unwrap();
        assert_eq!(attr.visibility, Visibility::Private);
        assert_eq!(attr.name, "count");
        assert_eq!(attr.type_name, Some("int"));
        assert_eq!(attr.default_value, Some("0"));

        let attr = attribute("name").unwrap();
        assert_eq!(attr.visibility, Visibility::Public);
        assert_eq!(attr.type_name, None);

        let attr = attribute("~label = \"x\"").unwrap();
        assert_eq!(attr.visibility, Visibility::Package);
        assert_eq!(attr.default_value, Some("\"x\""));

        let attr = attribute("publicKey: Key").unwrap();
        assert_eq!(attr.name, "publicKey");
        assert_eq!(attr.visibility, Visibility::Public);

        assert_eq!(attribute("ref: undefined").unwrap().type_name, None);
        assert!(attribute("???not-a-thing???").is_none());
        assert!(attribute("two words").is_none());
    }

    #[test]
    fn test_relationship_line() {
        let rel = relationship("Order \"1\" *-- \"many\" LineItem : contains").unwrap();
        assert_eq!(rel.left, "Order");
        assert_eq!(rel.left_multiplicity, Some("1"));
        assert_eq!(rel.arrow, "*--");
        assert_eq!(rel.right_multiplicity, Some("many"));
        assert_eq!(rel.right, "LineItem");
        assert_eq!(rel.label, Some("contains"));

        let rel = relationship("\"Place order\" ..> Pay").unwrap();
        assert_eq!(rel.left, "Place order");
        assert_eq!(rel.right_multiplicity, None);

        let rel = relationship("A --> \"B\"").unwrap();
        assert_eq!(rel.right, "B");
        assert_eq!(rel.right_multiplicity, None);

        let rel = relationship("Animal<|--Dog").unwrap();
        assert_eq!(rel.arrow, "<|--");
        assert_eq!(rel.right, "Dog");

        assert!(relationship("A -> B").is_none());
        assert!(relationship("A -- B extra").is_none());
        assert!(relationship("just words").is_none());
    }
}
