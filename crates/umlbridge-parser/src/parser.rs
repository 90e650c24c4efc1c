//! Line-by-line state machine that builds model elements from text.

use indexmap::IndexMap;
use log::{debug, trace, warn};

use umlbridge_core::{
    identifier::Id,
    model::{Attribute, ElementId, ElementKind, EnumerationLiteral, Operation, Parameter},
    store::{ModelStore, NewElement},
};

use crate::{
    blueprint::RelationshipBlueprint,
    classifier,
    error::{Diagnostic, ErrorCode},
    grammar::{self, Block, EntityHeader, PackageHeader, RelationshipLine},
    span::Span,
};

/// The element whose body is being read.
#[derive(Debug, Clone, Copy)]
enum OpenBody {
    Element { id: ElementId, kind: ElementKind },
    /// The store refused the element; its members are dropped.
    Rejected,
}

/// A container pushed by a package header.
#[derive(Debug, Clone, Copy)]
struct OpenContainer {
    id: ElementId,
    opened_at: Span,
}

/// Parser state for one call to [`crate::parse`].
pub(crate) struct LineParser<'a, S: ?Sized> {
    store: &'a mut S,
    root: ElementId,
    containers: Vec<OpenContainer>,
    body: Option<(OpenBody, Span)>,
    aliases: IndexMap<Id, ElementId>,
    blueprints: Vec<RelationshipBlueprint>,
    diagnostics: Vec<Diagnostic>,
}

/// What the parser produced, before the caller attaches the diagram kind.
pub(crate) struct ParsedModel {
    pub aliases: IndexMap<Id, ElementId>,
    pub blueprints: Vec<RelationshipBlueprint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a, S: ModelStore + ?Sized> LineParser<'a, S> {
    pub fn new(store: &'a mut S, root: ElementId) -> Self {
        Self {
            store,
            root,
            containers: Vec::new(),
            body: None,
            aliases: IndexMap::new(),
            blueprints: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn run(mut self, source: &str) -> ParsedModel {
        let mut offset = 0;
        for raw in source.split('\n') {
            let leading = raw.len() - raw.trim_start().len();
            let line = raw.trim();
            let span = Span::new(offset + leading..offset + leading + line.len());
            offset += raw.len() + 1;

            if grammar::is_ignored(line) {
                continue;
            }
            self.line(line, span);
        }
        self.finish(Span::new(source.len()..source.len()))
    }

    fn line(&mut self, line: &str, span: Span) {
        // Inside a body, `package count: int` is a member, not a header.
        if let Some((body, _)) = self.body {
            if grammar::is_member(line) {
                self.member(body, line, span);
                return;
            }
        }

        if let Some(header) = grammar::package_header(line) {
            self.open_package(header, span);
        } else if let Some(header) = grammar::entity_header(line) {
            self.open_entity(header, span);
        } else if grammar::is_block_close(line) {
            self.close_block(span);
        } else if let Some((body, _)) = self.body {
            self.member(body, line, span);
        } else if let Some(relationship) = grammar::relationship(line) {
            self.relationship(relationship, span);
        } else {
            debug!(line; "Skipping unrecognized line");
            self.diagnostics.push(
                Diagnostic::warning("unrecognized line")
                    .with_code(ErrorCode::W100)
                    .with_label(span, "line skipped"),
            );
        }
    }

    fn parent(&self) -> ElementId {
        self.containers
            .last()
            .map_or(self.root, |container| container.id)
    }

    fn open_package(&mut self, header: PackageHeader<'_>, span: Span) {
        let parent = self.parent();
        let created = self.create(NewElement::new(ElementKind::Package, parent, header.name), span);

        if let Some(id) = created {
            self.register(header.alias.unwrap_or(header.name), id);
        }
        if header.opens {
            // A rejected package keeps the outer container, so its `}` still
            // balances.
            self.containers.push(OpenContainer {
                id: created.unwrap_or(parent),
                opened_at: span,
            });
        }
    }

    fn open_entity(&mut self, header: EntityHeader<'_>, span: Span) {
        let request = NewElement::new(header.kind, self.parent(), header.name)
            .with_abstract(header.is_abstract);
        let created = self.create(request, span);

        if let Some(id) = created {
            if let Some(alias) = header.alias {
                self.register(alias, id);
            }
            self.register(header.name, id);
        }

        if header.block == Block::Open {
            let body = match created {
                Some(id) => OpenBody::Element {
                    id,
                    kind: header.kind,
                },
                None => OpenBody::Rejected,
            };
            self.body = Some((body, span));
        }
    }

    fn close_block(&mut self, span: Span) {
        if self.body.take().is_some() {
            return;
        }
        if self.containers.pop().is_none() {
            debug!(span:?; "Ignoring `}}` without an open block");
            self.diagnostics.push(
                Diagnostic::warning("unbalanced `}`")
                    .with_code(ErrorCode::W103)
                    .with_label(span, "nothing to close here"),
            );
        }
    }

    fn member(&mut self, body: OpenBody, line: &str, span: Span) {
        let OpenBody::Element { id, kind } = body else {
            trace!(line; "Dropping member of rejected element");
            return;
        };

        let added = match kind {
            ElementKind::Enumeration => grammar::enumeration_literal(line).map(|name| {
                self.store.add_literal(
                    id,
                    EnumerationLiteral {
                        name: name.to_string(),
                    },
                )
            }),
            ElementKind::Class | ElementKind::Interface => {
                if let Some(operation) = grammar::operation(line) {
                    Some(self.store.add_operation(id, build_operation(&operation)))
                } else {
                    grammar::attribute(line).map(|attribute| {
                        self.store.add_attribute(
                            id,
                            Attribute {
                                name: attribute.name.to_string(),
                                type_name: attribute.type_name.map(str::to_string),
                                visibility: attribute.visibility,
                                default_value: attribute.default_value.map(str::to_string),
                            },
                        )
                    })
                }
            }
            ElementKind::Package | ElementKind::Actor | ElementKind::UseCase => None,
        };

        match added {
            Some(Ok(())) => {}
            Some(Err(err)) => {
                warn!(owner:% = id, line, err:err; "Store rejected member");
                self.diagnostics.push(
                    Diagnostic::warning(format!("member not added: {err}"))
                        .with_code(ErrorCode::W104)
                        .with_label(span, "member skipped"),
                );
            }
            None => {
                debug!(owner:% = id, kind:%, line; "Skipping unrecognized member line");
                self.diagnostics.push(
                    Diagnostic::warning(format!("unrecognized {kind} member"))
                        .with_code(ErrorCode::W100)
                        .with_label(span, "line skipped"),
                );
            }
        }
    }

    fn relationship(&mut self, line: RelationshipLine<'_>, span: Span) {
        let (Some(left), Some(right)) = (self.resolve(line.left), self.resolve(line.right)) else {
            let missing = if self.resolve(line.left).is_none() {
                line.left
            } else {
                line.right
            };
            debug!(endpoint = missing; "Dropping relationship with unresolved endpoint");
            self.diagnostics.push(
                Diagnostic::warning(format!("unresolved endpoint `{missing}`"))
                    .with_code(ErrorCode::W101)
                    .with_label(span, "relationship dropped")
                    .with_help(format!("declare `{missing}` before using it in a relationship")),
            );
            return;
        };

        let Some(classification) =
            classifier::classify(line.arrow, left.1, right.1, line.label)
        else {
            debug!(arrow = line.arrow; "Dropping relationship with unsupported arrow");
            self.diagnostics.push(
                Diagnostic::warning(format!("unsupported arrow `{}`", line.arrow))
                    .with_code(ErrorCode::W102)
                    .with_label(span, "relationship dropped"),
            );
            return;
        };

        let mut end1 = classification.end1;
        let mut end2 = classification.end2;
        end1.multiplicity = line.left_multiplicity.map(str::to_string);
        end2.multiplicity = line.right_multiplicity.map(str::to_string);

        let (source, target, end1, end2) = if classification.swapped {
            (right.0, left.0, end2, end1)
        } else {
            (left.0, right.0, end1, end2)
        };

        trace!(kind:% = classification.kind, source:%, target:%; "Recorded relationship");
        self.blueprints.push(RelationshipBlueprint {
            kind: classification.kind,
            source,
            target,
            label: classification.label,
            end1,
            end2,
        });
    }

    fn resolve(&self, name: &str) -> Option<(ElementId, ElementKind)> {
        let id = self.aliases.get(&Id::lookup(name)?).copied()?;
        let kind = self.store.element(id)?.kind()?;
        Some((id, kind))
    }

    fn register(&mut self, key: &str, id: ElementId) {
        self.aliases.insert(Id::new(key), id);
    }

    fn create(&mut self, request: NewElement, span: Span) -> Option<ElementId> {
        let kind = request.kind;
        let name = request.name.clone();
        match self.store.create_element(request) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(kind:%, name = name.as_str(), err:err; "Store rejected element");
                self.diagnostics.push(
                    Diagnostic::warning(format!("{kind} `{name}` was not created: {err}"))
                        .with_code(ErrorCode::W104)
                        .with_label(span, "declaration skipped"),
                );
                None
            }
        }
    }

    fn finish(mut self, end: Span) -> ParsedModel {
        if let Some((_, opened_at)) = self.body.take() {
            self.diagnostics.push(unclosed_block(end, opened_at));
        }
        while let Some(container) = self.containers.pop() {
            self.diagnostics.push(unclosed_block(end, container.opened_at));
        }

        debug!(
            aliases = self.aliases.len(),
            relationships = self.blueprints.len(),
            warnings = self.diagnostics.len();
            "Parsed diagram text"
        );
        ParsedModel {
            aliases: self.aliases,
            blueprints: self.blueprints,
            diagnostics: self.diagnostics,
        }
    }
}

fn unclosed_block(end: Span, opened_at: Span) -> Diagnostic {
    Diagnostic::warning("block not closed before end of input")
        .with_code(ErrorCode::W103)
        .with_label(end, "input ends here")
        .with_secondary_label(opened_at, "block opened here")
}

fn build_operation(line: &grammar::OperationLine<'_>) -> Operation {
    let mut parameters: Vec<Parameter> = line
        .parameters
        .iter()
        .map(|param| Parameter::input(param.name, param.type_name.map(str::to_string)))
        .collect();
    if let Some(return_type) = line.return_type {
        parameters.push(Parameter::returning(return_type));
    }

    Operation {
        name: line.name.to_string(),
        visibility: line.visibility,
        parameters,
    }
}
