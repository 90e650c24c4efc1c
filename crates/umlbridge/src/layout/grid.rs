//! Uniform grid placement, used for class diagrams.
//!
//! Elements are grouped by the package views around them and every group
//! gets its own block of rows, so a package box never reaches over an
//! element that is not inside it. Free elements come first, followed by
//! the package groups in declaration order, each package's own members
//! before those of its nested packages.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;

use umlbridge_core::{
    geometry::{Bounds, Point},
    model::{ElementId, ElementKind},
    store::{ModelStore, ViewStore},
};

use super::Placer;
use crate::config::{GridConfig, PackageConfig};

/// Places every non-package root on a grid, left to right and top to
/// bottom. A cell is only used up when its view was created.
pub(super) fn arrange<S>(
    placer: &mut Placer<'_, S>,
    roots: &[ElementId],
    config: &GridConfig,
    packages: &PackageConfig,
) where
    S: ModelStore + ViewStore + ?Sized,
{
    let rank: HashMap<ElementId, usize> = roots
        .iter()
        .enumerate()
        .map(|(index, &element)| (element, index))
        .collect();

    let mut groups: IndexMap<Vec<usize>, Vec<ElementId>> = IndexMap::new();
    for &element in roots {
        if matches!(placer.kind_of(element), Some(ElementKind::Package) | None) {
            continue;
        }
        groups
            .entry(package_path(placer, element, &rank))
            .or_default()
            .push(element);
    }
    groups.sort_keys();

    let header = packages.padding.saturating_add(packages.header);
    let mut top = config.origin_y;
    for (path, members) in &groups {
        let depth = i32::try_from(path.len()).unwrap_or(i32::MAX);
        let block_top = top.saturating_add(header.saturating_mul(depth));

        let (rows, bounds) = place_block(placer, members, config, block_top);
        let Some(bounds) = bounds else {
            continue;
        };
        trace!(depth, members = members.len(), rows; "Placed grid block");

        let next_row = block_top.saturating_add(rows.saturating_mul(config.row_spacing));
        let below = bounds
            .max_y()
            .saturating_add(packages.padding.saturating_mul(depth))
            .saturating_add(packages.spacing);
        top = next_row.max(below);
    }
}

/// Places `members` in rows starting at `top`. Returns the number of rows
/// used and the bounds of the placed views.
fn place_block<S>(
    placer: &mut Placer<'_, S>,
    members: &[ElementId],
    config: &GridConfig,
    top: i32,
) -> (i32, Option<Bounds>)
where
    S: ModelStore + ViewStore + ?Sized,
{
    let columns = config.columns.max(1);
    let mut cell = 0usize;
    let mut bounds: Option<Bounds> = None;

    for &element in members {
        let column = i32::try_from(cell % columns).unwrap_or(i32::MAX);
        let row = i32::try_from(cell / columns).unwrap_or(i32::MAX);
        let position = Point::new(
            config
                .origin_x
                .saturating_add(column.saturating_mul(config.column_spacing)),
            top.saturating_add(row.saturating_mul(config.row_spacing)),
        );

        let width = config.width_for(&placer.name_of(element));
        let Some(view) = placer.place(element, position, Some(width)) else {
            continue;
        };
        cell += 1;
        if let Some(placed) = placer.bounds_of(view) {
            bounds = Some(bounds.map_or(placed, |acc| acc.merge(&placed)));
        }
    }

    let rows = i32::try_from(cell.div_ceil(columns)).unwrap_or(i32::MAX);
    (rows, bounds)
}

/// Declaration ranks of the packages whose views enclose `element`, outermost
/// first. Empty for an element drawn outside any package.
fn package_path<S>(
    placer: &Placer<'_, S>,
    element: ElementId,
    rank: &HashMap<ElementId, usize>,
) -> Vec<usize>
where
    S: ModelStore + ViewStore + ?Sized,
{
    let mut path = Vec::new();
    let mut current = element;
    while placer.container_for(current).is_some() {
        let Some(parent) = placer
            .store
            .element(current)
            .and_then(|element| element.parent())
        else {
            break;
        };
        path.push(rank.get(&parent).copied().unwrap_or(usize::MAX));
        current = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use umlbridge_core::{
        geometry::Bounds,
        store::{MemoryWorkspace, ModelStore, ViewStore},
    };

    use crate::{
        config::LayoutConfig,
        layout::{LayoutReport, layout},
    };

    fn run(source: &str) -> (MemoryWorkspace, umlbridge_parser::ParseOutput, LayoutReport) {
        let mut workspace = MemoryWorkspace::new("Test");
        let root = workspace.project_root();
        let parsed = umlbridge_parser::parse(source, &mut workspace, root);
        let diagram = workspace.create_diagram(parsed.diagram_kind, root).unwrap();
        let report = layout(&mut workspace, diagram, &parsed, &LayoutConfig::default());
        (workspace, parsed, report)
    }

    fn overlaps(a: Bounds, b: Bounds) -> bool {
        a.min_x() < b.max_x()
            && b.min_x() < a.max_x()
            && a.min_y() < b.max_y()
            && b.min_y() < a.max_y()
    }

    #[test]
    fn test_large_package_does_not_cover_outsider() {
        let members: String = (0..7).map(|index| format!("  class M{index}\n")).collect();
        let source = format!("package store {{\n{members}}}\nclass Outsider\n");
        let (_, parsed, report) = run(&source);

        let package = report.entry(parsed.element("store").unwrap()).unwrap();
        let outsider = report.entry(parsed.element("Outsider").unwrap()).unwrap();
        assert!(!overlaps(package.bounds(), outsider.bounds()));

        for index in 0..7 {
            let member = report.entry(parsed.element(&format!("M{index}")).unwrap()).unwrap();
            assert!(package.bounds().contains(&member.bounds()), "M{index}");
        }
        // The seventh member wraps into the package's own second row.
        let first = report.entry(parsed.element("M0").unwrap()).unwrap();
        let wrapped = report.entry(parsed.element("M6").unwrap()).unwrap();
        assert_eq!((wrapped.x, wrapped.y), (first.x, first.y + 400));
    }

    #[test]
    fn test_free_elements_keep_the_first_rows() {
        let (_, parsed, report) = run("package shop {\nclass Order\n}\nclass Outside\n");
        let outside = report.entry(parsed.element("Outside").unwrap()).unwrap();
        let order = report.entry(parsed.element("Order").unwrap()).unwrap();
        let shop = report.entry(parsed.element("shop").unwrap()).unwrap();

        assert_eq!((outside.x, outside.y), (100, 100));
        assert_eq!(order.x, 100);
        assert!(shop.y > outside.bounds().max_y());
    }

    #[test]
    fn test_sibling_packages_do_not_overlap() {
        let source = "\
package left {
  class A
  class B
}
package right {
  class C
}
class Free
";
        let (_, parsed, report) = run(source);
        let entry = |name: &str| report.entry(parsed.element(name).unwrap()).unwrap().bounds();

        assert!(!overlaps(entry("left"), entry("right")));
        assert!(!overlaps(entry("left"), entry("Free")));
        assert!(!overlaps(entry("right"), entry("Free")));
    }

    #[test]
    fn test_nested_package_members_stay_out_of_outer_rows() {
        let source = "\
package outer {
  class Shallow
  package inner {
    class Deep
  }
}
";
        let (_, parsed, report) = run(source);
        let entry = |name: &str| report.entry(parsed.element(name).unwrap()).unwrap().bounds();

        assert!(entry("outer").contains(&entry("inner")));
        assert!(entry("inner").contains(&entry("Deep")));
        assert!(!overlaps(entry("inner"), entry("Shallow")));
    }
}
