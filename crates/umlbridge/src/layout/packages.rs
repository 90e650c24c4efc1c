//! Package boxes.
//!
//! Package views are created before anything else at a temporary origin so
//! that elements declared inside a package can be placed inside its view.
//! Once every other element is placed, each package is fitted to its
//! children. A package is *anchored* when it contains something placed by
//! a strategy, directly or through nested packages; other packages float and
//! are moved next to their anchored siblings, or into a trailing row below
//! the diagram.

use std::collections::HashSet;

use log::{debug, trace};

use umlbridge_core::{
    geometry::{Bounds, Insets, Point, Size},
    model::{ElementId, ElementKind},
    store::{ModelStore, ViewStore},
    view::ViewId,
};

use super::Placer;
use crate::config::PackageConfig;

/// Creates the views of all packages in `roots`, outer packages first.
///
/// Returns the packages that got a view, deepest first.
pub(super) fn open<S>(placer: &mut Placer<'_, S>, roots: &[ElementId]) -> Vec<ElementId>
where
    S: ModelStore + ViewStore + ?Sized,
{
    let mut packages: Vec<(ElementId, usize)> = roots
        .iter()
        .copied()
        .filter(|&root| placer.kind_of(root) == Some(ElementKind::Package))
        .map(|package| (package, package_depth(placer, package)))
        .collect();
    packages.sort_by_key(|&(_, depth)| depth);

    let mut opened = Vec::with_capacity(packages.len());
    for (package, depth) in packages {
        if placer.place(package, Point::default(), None).is_some() {
            opened.push((package, depth));
        }
    }

    opened.sort_by_key(|&(_, depth)| std::cmp::Reverse(depth));
    debug!(packages = opened.len(); "Created package views");
    opened.into_iter().map(|(package, _)| package).collect()
}

/// Fits every package in `packages` (deepest first) around its children.
///
/// Floating top-level packages go into a row below everything else,
/// starting at `origin.x`.
pub(super) fn fit<S>(
    placer: &mut Placer<'_, S>,
    packages: &[ElementId],
    origin: Point,
    config: &PackageConfig,
) where
    S: ModelStore + ViewStore + ?Sized,
{
    let package_views: HashSet<ViewId> = packages
        .iter()
        .filter_map(|&package| placer.view_of(package))
        .collect();
    let mut anchored: HashSet<ViewId> = HashSet::new();
    let insets = Insets::new(
        config.padding + config.header,
        config.padding,
        config.padding,
        config.padding,
    );

    for &package in packages {
        let Some(view) = placer.view_of(package) else {
            continue;
        };

        let (fixed, floating): (Vec<ViewId>, Vec<ViewId>) = placer
            .children_of(view)
            .into_iter()
            .partition(|child| !package_views.contains(child) || anchored.contains(child));

        let content = merged_bounds(placer, &fixed);
        let bounds = match content {
            Some(content) => {
                let start = Point::new(content.max_x() + config.spacing, content.min_y());
                let row = lay_out_row(placer, &floating, start, config.spacing);
                anchored.insert(view);
                Some(row.map_or(content, |row| content.merge(&row)))
            }
            None => lay_out_row(placer, &floating, Point::default(), config.spacing),
        };

        let fitted = match bounds {
            Some(bounds) => bounds.add_padding(insets),
            None => Point::default().to_bounds(Size::new(config.min_width, config.min_height)),
        };
        if let Some(package_view) = placer.store.view_mut(view) {
            package_view.set_bounds(fitted);
        }
        trace!(package:% = package, anchored = anchored.contains(&view); "Fitted package");
    }

    let floating_top_level: Vec<ViewId> = packages
        .iter()
        .filter_map(|&package| placer.view_of(package))
        .filter(|view| !anchored.contains(view))
        .filter(|&view| {
            placer
                .store
                .view(view)
                .is_some_and(|view| view.container.is_none())
        })
        .collect();
    if floating_top_level.is_empty() {
        return;
    }

    let top_level_anchored: Vec<ViewId> = placer
        .views
        .values()
        .copied()
        .filter(|view| !floating_top_level.contains(view))
        .filter(|&view| {
            placer
                .store
                .view(view)
                .is_some_and(|view| view.container.is_none())
        })
        .collect();
    let start_y = merged_bounds(placer, &top_level_anchored)
        .map_or(origin.y(), |bounds| bounds.max_y() + config.spacing);

    lay_out_row(
        placer,
        &floating_top_level,
        Point::new(origin.x(), start_y),
        config.spacing,
    );
    debug!(packages = floating_top_level.len(); "Moved floating packages to the trailing row");
}

/// Moves `views` into a left-to-right row starting at `start` and returns
/// the bounds of the row.
fn lay_out_row<S>(
    placer: &mut Placer<'_, S>,
    views: &[ViewId],
    start: Point,
    spacing: i32,
) -> Option<Bounds>
where
    S: ModelStore + ViewStore + ?Sized,
{
    let mut x = start.x();
    for &view in views {
        let Some(bounds) = placer.bounds_of(view) else {
            continue;
        };
        placer.translate(view, x - bounds.min_x(), start.y() - bounds.min_y());
        x += bounds.width() + spacing;
    }
    merged_bounds(placer, views)
}

fn merged_bounds<S>(placer: &Placer<'_, S>, views: &[ViewId]) -> Option<Bounds>
where
    S: ModelStore + ViewStore + ?Sized,
{
    views
        .iter()
        .filter_map(|&view| placer.bounds_of(view))
        .reduce(|acc, bounds| acc.merge(&bounds))
}

/// Number of packages enclosing `package`.
fn package_depth<S>(placer: &Placer<'_, S>, package: ElementId) -> usize
where
    S: ModelStore + ViewStore + ?Sized,
{
    let mut depth = 0;
    let mut current = placer
        .store
        .element(package)
        .and_then(|element| element.parent());
    while let Some(parent) = current {
        let Some(element) = placer.store.element(parent) else {
            break;
        };
        if !element.is_kind(ElementKind::Package) {
            break;
        }
        depth += 1;
        current = element.parent();
    }
    depth
}
