//! Turns relationship blueprints into relationship elements and views.

use log::{debug, warn};

use umlbridge_core::{
    model::{RelationshipEnd, RelationshipKind},
    store::{ModelStore, NewRelationship, ViewStore},
    view::RelationshipView,
};
use umlbridge_parser::{EndSpec, RelationshipBlueprint};

use super::Placer;

/// Realizes every blueprint whose endpoints both have a view.
///
/// Returns the created views and the number of blueprints skipped.
pub(super) fn realize<S>(
    placer: &mut Placer<'_, S>,
    blueprints: &[RelationshipBlueprint],
) -> (Vec<RelationshipView>, usize)
where
    S: ModelStore + ViewStore + ?Sized,
{
    let mut created = Vec::with_capacity(blueprints.len());
    let mut skipped = 0;

    for blueprint in blueprints {
        let (Some(source_view), Some(target_view)) = (
            placer.view_of(blueprint.source),
            placer.view_of(blueprint.target),
        ) else {
            debug!(
                kind:% = blueprint.kind,
                source:% = blueprint.source,
                target:% = blueprint.target;
                "Skipping relationship without views for both endpoints"
            );
            skipped += 1;
            continue;
        };

        let request = NewRelationship {
            kind: blueprint.kind,
            diagram: placer.diagram,
            source: blueprint.source,
            target: blueprint.target,
            source_view,
            target_view,
        };
        match placer.store.create_relationship_view(request) {
            Ok(view) => {
                decorate(&mut *placer.store, &view, blueprint);
                created.push(view);
            }
            Err(err) => {
                warn!(
                    kind:% = blueprint.kind,
                    source = placer.name_of(blueprint.source).as_str(),
                    target = placer.name_of(blueprint.target).as_str(),
                    err:err;
                    "Could not create relationship"
                );
                skipped += 1;
            }
        }
    }

    (created, skipped)
}

/// Copies the label and, for associations, the end decorations onto the
/// created relationship element.
fn decorate<S>(store: &mut S, view: &RelationshipView, blueprint: &RelationshipBlueprint)
where
    S: ModelStore + ?Sized,
{
    let Some(element) = store.element_mut(view.model) else {
        warn!(model:% = view.model; "Created relationship is missing from the store");
        return;
    };

    if let Some(label) = blueprint.label.as_deref().map(str::trim) {
        element.name = label.to_string();
    }

    if blueprint.kind != RelationshipKind::Association {
        return;
    }
    if let Some(relationship) = element.relationship_mut() {
        apply_end(&mut relationship.end1, &blueprint.end1);
        apply_end(&mut relationship.end2, &blueprint.end2);
    }
}

fn apply_end(end: &mut RelationshipEnd, spec: &EndSpec) {
    end.aggregation = spec.aggregation;
    end.navigable = spec.navigable;
    end.multiplicity = spec.multiplicity.clone();
}
