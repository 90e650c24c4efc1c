//! Actor-centric placement for use case diagrams.
//!
//! Actors form a column on the left, ordered by their generalization
//! hierarchy. Use cases connected to exactly one actor sit in a block next to
//! that actor; use cases shared by several actors sit in a column further
//! right, near the mean height of their actors. Everything else wraps in rows
//! below.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use umlbridge_core::{
    geometry::Point,
    model::{ElementId, ElementKind, RelationshipKind},
    store::{ModelStore, ViewStore},
};
use umlbridge_parser::RelationshipBlueprint;

use super::Placer;
use crate::config::UseCaseConfig;

/// Use cases grouped by how many actors they connect to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UseCaseBuckets {
    /// Use cases connected to a single actor, keyed by that actor.
    pub exclusive: IndexMap<ElementId, Vec<ElementId>>,
    /// Use cases connected to more than one actor.
    pub shared: Vec<ElementId>,
    /// Use cases without any actor.
    pub orphans: Vec<ElementId>,
}

impl UseCaseBuckets {
    /// Exclusive use cases of `actor`, empty when it has none.
    pub fn exclusive_of(&self, actor: ElementId) -> &[ElementId] {
        self.exclusive.get(&actor).map_or(&[], Vec::as_slice)
    }
}

/// Buckets `use_cases` by the number of distinct `actors` they are related
/// to. Every blueprint counts, in either direction.
pub fn bucket_use_cases(
    actors: &[ElementId],
    use_cases: &[ElementId],
    blueprints: &[RelationshipBlueprint],
) -> UseCaseBuckets {
    let actor_set: HashSet<ElementId> = actors.iter().copied().collect();
    let use_case_set: HashSet<ElementId> = use_cases.iter().copied().collect();

    let mut connected: HashMap<ElementId, IndexSet<ElementId>> = HashMap::new();
    for blueprint in blueprints {
        for (actor, use_case) in [
            (blueprint.source, blueprint.target),
            (blueprint.target, blueprint.source),
        ] {
            if actor_set.contains(&actor) && use_case_set.contains(&use_case) {
                connected.entry(use_case).or_default().insert(actor);
            }
        }
    }

    let mut buckets = UseCaseBuckets::default();
    for &use_case in use_cases {
        match connected.get(&use_case) {
            Some(linked) if linked.len() == 1 => {
                if let Some(&actor) = linked.first() {
                    buckets.exclusive.entry(actor).or_default().push(use_case);
                }
            }
            Some(linked) if linked.len() > 1 => buckets.shared.push(use_case),
            _ => buckets.orphans.push(use_case),
        }
    }

    debug!(
        exclusive = buckets.exclusive.values().map(Vec::len).sum::<usize>(),
        shared = buckets.shared.len(),
        orphans = buckets.orphans.len();
        "Bucketed use cases"
    );
    buckets
}

/// Orders actors by their generalization hierarchy.
///
/// A generalization between two actors makes the source a child of the
/// target. Returns every actor exactly once with its depth, in pre-order:
/// parentless actors first, each followed by its descendants in the order
/// the generalizations were written. Actors only reachable through a cycle
/// are visited afterwards, each as a new root.
pub fn order_actors(
    actors: &[ElementId],
    blueprints: &[RelationshipBlueprint],
) -> Vec<(ElementId, usize)> {
    let mut hierarchy: DiGraph<ElementId, ()> = DiGraph::new();
    let nodes: IndexMap<ElementId, NodeIndex> = actors
        .iter()
        .map(|&actor| (actor, hierarchy.add_node(actor)))
        .collect();

    for blueprint in blueprints
        .iter()
        .filter(|blueprint| blueprint.kind == RelationshipKind::Generalization)
    {
        if let (Some(&child), Some(&parent)) =
            (nodes.get(&blueprint.source), nodes.get(&blueprint.target))
        {
            hierarchy.add_edge(parent, child, ());
        }
    }

    let roots = nodes.values().copied().filter(|&node| {
        hierarchy
            .neighbors_directed(node, Direction::Incoming)
            .next()
            .is_none()
    });

    let mut visited = HashSet::new();
    let mut ordered = Vec::with_capacity(actors.len());
    for start in roots.chain(nodes.values().copied()).collect::<Vec<_>>() {
        if visited.contains(&start) {
            continue;
        }
        let mut stack = vec![(start, 0)];
        while let Some((node, depth)) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            ordered.push((hierarchy[node], depth));

            // Neighbors come newest edge first, so pushing them as-is pops
            // the oldest child next.
            stack.extend(
                hierarchy
                    .neighbors_directed(node, Direction::Outgoing)
                    .filter(|child| !visited.contains(child))
                    .map(|child| (child, depth + 1)),
            );
        }
    }

    trace!(actors:? = ordered; "Ordered actors");
    ordered
}

/// Places actors, use cases and the remaining non-package roots.
pub(super) fn arrange<S>(
    placer: &mut Placer<'_, S>,
    roots: &[ElementId],
    blueprints: &[RelationshipBlueprint],
    config: &UseCaseConfig,
) where
    S: ModelStore + ViewStore + ?Sized,
{
    let mut actors = Vec::new();
    let mut use_cases = Vec::new();
    let mut others = Vec::new();
    for &root in roots {
        match placer.kind_of(root) {
            Some(ElementKind::Actor) => actors.push(root),
            Some(ElementKind::UseCase) => use_cases.push(root),
            Some(ElementKind::Package) | None => {}
            Some(_) => others.push(root),
        }
    }

    let buckets = bucket_use_cases(&actors, &use_cases, blueprints);
    let ordered = order_actors(&actors, blueprints);

    let mut actor_y = config.origin_y;
    let mut actor_centers: HashMap<ElementId, i32> = HashMap::new();
    let mut exclusive_right = i32::MIN;

    for (actor, depth) in ordered {
        let indent = config
            .depth_indent
            .saturating_mul(i32::try_from(depth).unwrap_or(i32::MAX));
        let position = Point::new(config.origin_x.saturating_add(indent), actor_y);
        if placer.place(actor, position, None).is_some() {
            actor_centers.insert(actor, actor_y + config.actor_center_offset);
        }

        let block = buckets.exclusive_of(actor);
        let mut x = config.exclusive_x;
        let mut y = actor_y;
        let mut block_offset = 0;
        for (index, &use_case) in block.iter().enumerate() {
            let width = config.use_case_width(&placer.name_of(use_case));
            let placed = placer.place(use_case, Point::new(x, y), Some(width));
            if let Some(bounds) = placed.and_then(|view| placer.bounds_of(view)) {
                exclusive_right = exclusive_right.max(bounds.max_x());
            }

            x += config.column_spacing;
            let row_full = (index + 1) % config.exclusive_columns.max(1) == 0;
            if row_full && index + 1 < block.len() {
                x = config.exclusive_x;
                y += config.row_spacing;
                block_offset += config.row_spacing;
            }
        }

        actor_y += config
            .min_actor_advance
            .max(block_offset + config.row_spacing);
    }

    let shared_x = if exclusive_right == i32::MIN {
        config.shared_min_x
    } else {
        config
            .shared_min_x
            .max(exclusive_right + config.shared_gap)
    };
    let mut shared_y = config.origin_y;
    for (index, &use_case) in buckets.shared.iter().enumerate() {
        let centers: Vec<i32> = connected_actors(use_case, blueprints)
            .filter_map(|actor| actor_centers.get(&actor).copied())
            .collect();
        let mut y = mean(&centers).unwrap_or(shared_y);
        if index > 0 && (y - shared_y).abs() < config.row_spacing {
            y = shared_y + config.row_spacing;
        }

        let width = config.use_case_width(&placer.name_of(use_case));
        placer.place(use_case, Point::new(shared_x, y), Some(width));
        shared_y = y;
    }

    let mut x = config.origin_x;
    let mut y = actor_y.max(shared_y + config.row_spacing);
    for &element in buckets.orphans.iter().chain(&others) {
        let width = (placer.kind_of(element) == Some(ElementKind::UseCase))
            .then(|| config.use_case_width(&placer.name_of(element)));
        placer.place(element, Point::new(x, y), width);

        x += config.column_spacing;
        if x > config.wrap_x {
            x = config.origin_x;
            y += config.row_spacing;
        }
    }
}

/// Actors related to `use_case` by any blueprint, each once, in blueprint
/// order.
fn connected_actors(
    use_case: ElementId,
    blueprints: &[RelationshipBlueprint],
) -> impl Iterator<Item = ElementId> {
    blueprints
        .iter()
        .filter_map(move |blueprint| {
            if blueprint.source == use_case {
                Some(blueprint.target)
            } else if blueprint.target == use_case {
                Some(blueprint.source)
            } else {
                None
            }
        })
        .collect::<IndexSet<_>>()
        .into_iter()
}

fn mean(values: &[i32]) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().map(|&value| i64::from(value)).sum();
    let count = i64::try_from(values.len()).ok()?;
    i32::try_from(sum / count).ok()
}
