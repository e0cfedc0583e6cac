use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
};

use indexmap::IndexMap;
use log::{debug, warn};

use skyplan_core::{
    diagram::{GroupType, Node},
    geometry::{Bounds, Insets, Point, Size},
    identifier::Id,
};

use crate::{config::LayoutConfig, grid::Snapper};

/// Resolves the parent of every node whose parent exists in the node set.
///
/// Self references and references to unknown ids are ignored.
pub(super) fn resolve_parents(nodes: &[&Node]) -> IndexMap<Id, Id> {
    let ids: HashSet<Id> = nodes.iter().map(|node| node.id()).collect();
    let mut parents = IndexMap::new();

    for node in nodes {
        let Some(parent) = node.parent_id() else {
            continue;
        };
        if parent == node.id() || !ids.contains(&parent) {
            warn!(node = node.id().to_text(), parent = parent.to_text(); "Ignoring unresolvable parent");
            continue;
        }
        parents.insert(node.id(), parent);
    }
    parents
}

/// Number of ancestors of a node. Parent cycles stop the walk.
fn depth(id: Id, parents: &IndexMap<Id, Id>) -> usize {
    let mut seen = HashSet::from([id]);
    let mut current = parents.get(&id);
    let mut depth = 0;

    while let Some(&parent) = current {
        if !seen.insert(parent) {
            break;
        }
        depth += 1;
        current = parents.get(&parent);
    }
    depth
}

/// Sizes every group around its children and records the group boxes in
/// `bounds`.
///
/// Groups are processed innermost first so a group's box is known before
/// its parent is fitted. Groups without positioned children get a default
/// box in a row below the rest of the diagram.
pub(super) fn fit_groups(
    nodes: &[&Node],
    parents: &IndexMap<Id, Id>,
    bounds: &mut IndexMap<Id, Bounds>,
    config: &LayoutConfig,
    snapper: &dyn Snapper,
) -> IndexMap<Id, Size> {
    let mut groups: Vec<(usize, &Node)> = nodes
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, node)| node.is_group())
        .collect();
    groups.sort_by_key(|(index, node)| {
        let rank = node.group_type().map_or(0, GroupType::rank);
        (Reverse(depth(node.id(), parents)), Reverse(rank), *index)
    });

    let mut children: HashMap<Id, Vec<Id>> = HashMap::new();
    for node in nodes {
        if let Some(parent) = parents.get(&node.id()) {
            children.entry(*parent).or_default().push(node.id());
        }
    }

    let padding = config.group_padding();
    let insets = Insets::uniform(padding).with_top(padding + config.group_header());
    let content_bottom = bounds
        .values()
        .map(|bounds| bounds.max_y())
        .fold(config.origin().y(), f32::max);
    let mut empty_cursor = Point::new(
        config.origin().x(),
        content_bottom + config.empty_group_gap(),
    );

    let mut dimensions = IndexMap::new();
    for (_, group) in groups {
        let content = children
            .get(&group.id())
            .into_iter()
            .flatten()
            .filter_map(|child| bounds.get(child).copied())
            .reduce(|acc, child| acc.merge(&child));

        let (center, raw_size) = match content {
            Some(content) => {
                let padded = content.add_padding(insets);
                (padded.center(), padded.to_size())
            }
            None => {
                let size = config.empty_group_size();
                let center = empty_cursor.add_point(Point::new(size.width() / 2.0, size.height() / 2.0));
                empty_cursor = empty_cursor.add_point(Point::new(
                    size.width() + config.empty_group_gap(),
                    0.0,
                ));
                debug!(group = group.id().to_text(); "Placing empty group");
                (center, size)
            }
        };

        let size = snapper.snap_group_dimensions(raw_size);
        let top_left = center.sub_point(Point::new(size.width() / 2.0, size.height() / 2.0));
        let position = snapper.snap_group(top_left, size);

        bounds.insert(group.id(), Bounds::new_from_top_left(position, size));
        dimensions.insert(group.id(), size);
    }
    dimensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CartesianGrid;
    use skyplan_core::diagram::ServiceType;

    #[test]
    fn test_resolve_parents_skips_unknown_and_self() {
        let rg = Node::group(Id::new("rg"), "RG", GroupType::ResourceGroup);
        let app = Node::service(Id::new("app"), "App", ServiceType::AppService)
            .with_parent(Id::new("rg"));
        let lost = Node::service(Id::new("lost"), "Lost", ServiceType::AppService)
            .with_parent(Id::new("nowhere"));
        let own = Node::group(Id::new("own"), "Own", GroupType::ResourceGroup)
            .with_parent(Id::new("own"));

        let parents = resolve_parents(&[&rg, &app, &lost, &own]);

        assert_eq!(parents.len(), 1);
        assert_eq!(parents.get(&Id::new("app")), Some(&Id::new("rg")));
    }

    #[test]
    fn test_depth_survives_cycles() {
        let mut parents = IndexMap::new();
        parents.insert(Id::new("a"), Id::new("b"));
        parents.insert(Id::new("b"), Id::new("a"));

        assert_eq!(depth(Id::new("a"), &parents), 1);
    }

    #[test]
    fn test_group_wraps_children() {
        let config = LayoutConfig::default();
        let grid = CartesianGrid::default();
        let rg = Node::group(Id::new("rg"), "RG", GroupType::ResourceGroup);
        let app = Node::service(Id::new("app"), "App", ServiceType::AppService)
            .with_parent(Id::new("rg"));
        let nodes = [&rg, &app];
        let parents = resolve_parents(&nodes);

        let app_bounds =
            Bounds::new_from_top_left(Point::new(300.0, 40.0), config.service_size());
        let mut bounds = IndexMap::from([(Id::new("app"), app_bounds)]);

        let dimensions = fit_groups(&nodes, &parents, &mut bounds, &config, &grid);
        let group = bounds[&Id::new("rg")];

        assert_eq!(dimensions[&Id::new("rg")], group.to_size());
        assert!(group.min_x() < app_bounds.min_x());
        assert!(group.min_y() < app_bounds.min_y());
        assert!(group.max_x() > app_bounds.max_x());
        assert!(group.max_y() > app_bounds.max_y());
        assert_eq!(group.min_x() % 20.0, 0.0);
        assert_eq!(group.width() % 40.0, 0.0);
    }

    #[test]
    fn test_empty_groups_placed_below_content() {
        let config = LayoutConfig::default();
        let grid = CartesianGrid::default();
        let first = Node::group(Id::new("first"), "First", GroupType::ResourceGroup);
        let second = Node::group(Id::new("second"), "Second", GroupType::ResourceGroup);
        let nodes = [&first, &second];
        let parents = resolve_parents(&nodes);

        let content = Bounds::new_from_top_left(Point::new(40.0, 40.0), config.service_size());
        let mut bounds = IndexMap::from([(Id::new("svc"), content)]);

        let dimensions = fit_groups(&nodes, &parents, &mut bounds, &config, &grid);
        let first = bounds[&Id::new("first")];
        let second = bounds[&Id::new("second")];

        assert_eq!(dimensions[&Id::new("first")], Size::new(320.0, 200.0));
        assert!(first.min_y() >= content.max_y());
        assert!(!first.intersects(&second));
        assert!(second.min_x() > first.min_x());
    }

    #[test]
    fn test_inner_groups_fitted_before_outer() {
        let config = LayoutConfig::default();
        let grid = CartesianGrid::default();
        let vnet = Node::group(Id::new("vnet"), "VNet", GroupType::VirtualNetwork);
        let subnet = Node::group(Id::new("subnet"), "Subnet", GroupType::Subnet)
            .with_parent(Id::new("vnet"));
        let vm = Node::service(Id::new("vm"), "VM", ServiceType::VirtualMachine)
            .with_parent(Id::new("subnet"));
        let nodes = [&vnet, &subnet, &vm];
        let parents = resolve_parents(&nodes);

        let vm_bounds = Bounds::new_from_top_left(Point::new(560.0, 320.0), config.service_size());
        let mut bounds = IndexMap::from([(Id::new("vm"), vm_bounds)]);

        fit_groups(&nodes, &parents, &mut bounds, &config, &grid);
        let subnet = bounds[&Id::new("subnet")];
        let vnet = bounds[&Id::new("vnet")];

        assert!(subnet.contains_point(vm_bounds.center()));
        assert!(vnet.contains_point(subnet.min_point()));
        assert!(vnet.width() > subnet.width());
    }
}
