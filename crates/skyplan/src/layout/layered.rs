use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use log::{debug, warn};
use petgraph::{algo::is_cyclic_directed, graphmap::DiGraphMap};
use rust_sugiyama::configure::Config;

use skyplan_core::{
    diagram::{Edge, LayoutDirection, Node},
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::{
    LayoutResult, groups,
    tier::{DEFAULT_TIER, Tier, tier_of},
};
use crate::{config::LayoutConfig, grid::Snapper};

/// Position of a service inside its connected component, as computed by the
/// layered ordering. Isolated services sort after every connected one.
#[derive(Debug, Clone, Copy)]
struct OrderKey {
    component: usize,
    coordinate: f64,
}

impl OrderKey {
    const ISOLATED: Self = Self {
        component: usize::MAX,
        coordinate: 0.0,
    };
}

/// Tiered layout engine for architecture diagrams.
///
/// The engine is deterministic: the same nodes and edges in the same order
/// always produce the same result.
///
/// # Algorithm
///
/// 1. Every service gets a tier from its category.
/// 2. Edges between services feed a layered (Sugiyama) ordering whose
///    in-layer coordinate orders services sharing a tier. If the ordering
///    fails, insertion order is kept.
/// 3. Occupied tiers are packed into consecutive lanes. Lane `n` sits at
///    `n * tier_spacing` along the layout direction, and the `m`-th service of
///    a lane sits at `m * row_height` across it.
/// 4. Services snap to the lattice; groups are then fitted around their
///    children, innermost first.
/// 5. Positions of nested nodes become relative to their parent.
pub struct LayeredLayout {
    config: LayoutConfig,
}

impl LayeredLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the given nodes and edges.
    ///
    /// Edges referencing unknown nodes are ignored. Duplicate node ids keep
    /// the first occurrence.
    pub fn calculate<'a, N, E>(&self, nodes: N, edges: E, snapper: &dyn Snapper) -> LayoutResult
    where
        N: IntoIterator<Item = &'a Node>,
        E: IntoIterator<Item = &'a Edge>,
    {
        let mut unique: IndexMap<Id, &Node> = IndexMap::new();
        for node in nodes {
            if unique.contains_key(&node.id()) {
                warn!(id = node.id().to_text(); "Duplicate node id, ignoring later occurrence");
                continue;
            }
            unique.insert(node.id(), node);
        }
        let nodes: Vec<&Node> = unique.into_values().collect();
        let edges: Vec<&Edge> = edges.into_iter().collect();

        let services: Vec<&Node> = nodes.iter().copied().filter(|node| !node.is_group()).collect();
        let order = crossing_order(&services, &edges);

        let mut lanes: BTreeMap<Tier, Vec<usize>> = BTreeMap::new();
        for (index, service) in services.iter().enumerate() {
            let tier = service.service_type().map_or(DEFAULT_TIER, tier_of);
            lanes.entry(tier).or_default().push(index);
        }

        let mut bounds = IndexMap::new();
        for (slot, members) in lanes.values_mut().enumerate() {
            members.sort_by(|&a, &b| {
                order[a]
                    .component
                    .cmp(&order[b].component)
                    .then(order[a].coordinate.total_cmp(&order[b].coordinate))
                    .then(a.cmp(&b))
            });

            for (row, &index) in members.iter().enumerate() {
                let position = self.slot_position(slot, row);
                let size = self.config.service_size();
                let snapped = snapper.snap_service(position, size);
                bounds.insert(services[index].id(), Bounds::new_from_top_left(snapped, size));
            }
        }
        debug!(services = services.len(), lanes = lanes.len(); "Placed services in tier lanes");

        let parents = groups::resolve_parents(&nodes);
        let group_dimensions =
            groups::fit_groups(&nodes, &parents, &mut bounds, &self.config, snapper);

        let mut positions = IndexMap::new();
        let mut ordered_bounds = IndexMap::new();
        let mut ordered_dimensions = IndexMap::new();
        for node in &nodes {
            let id = node.id();
            let Some(absolute) = bounds.get(&id).copied() else {
                continue;
            };
            let position = match parents.get(&id).and_then(|parent| bounds.get(parent)) {
                Some(parent) => absolute.min_point().sub_point(parent.min_point()),
                None => absolute.min_point(),
            };
            positions.insert(id, position);
            ordered_bounds.insert(id, absolute);
            if let Some(size) = group_dimensions.get(&id) {
                ordered_dimensions.insert(id, *size);
            }
        }

        LayoutResult::new(positions, ordered_dimensions, parents, ordered_bounds)
    }

    /// Raw top-left corner of the `row`-th service in lane `slot`.
    fn slot_position(&self, slot: usize, row: usize) -> Point {
        let origin = self.config.origin();
        let along = slot as f32 * self.config.tier_spacing();
        let across = row as f32 * self.config.row_height();

        match self.config.direction() {
            LayoutDirection::LeftToRight => origin.add_point(Point::new(along, across)),
            LayoutDirection::TopToBottom => origin.add_point(Point::new(along, across).transpose()),
        }
    }
}

/// Computes the in-tier ordering key of every service.
fn crossing_order(services: &[&Node], edges: &[&Edge]) -> Vec<OrderKey> {
    let mut keys = vec![OrderKey::ISOLATED; services.len()];

    let indices: HashMap<Id, u32> = services
        .iter()
        .enumerate()
        .map(|(index, service)| (service.id(), index as u32))
        .collect();

    // The graph map drops duplicate edges between the same pair.
    let mut graph = DiGraphMap::<u32, ()>::new();
    for edge in edges {
        if let (Some(&source), Some(&target)) =
            (indices.get(&edge.source()), indices.get(&edge.target()))
        {
            // Skip self-loops
            if source != target {
                graph.add_edge(source, target, ());
            }
        }
    }

    if graph.edge_count() == 0 {
        return keys;
    }

    let edge_list: Vec<(u32, u32)> = graph.all_edges().map(|(source, target, _)| (source, target)).collect();
    debug!(
        nodes = graph.node_count(),
        edges = edge_list.len(),
        cyclic = is_cyclic_directed(&graph);
        "Applying layered ordering"
    );

    let layouts = std::panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 3.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&edge_list, &config)
    });

    match layouts {
        Ok(components) => {
            for (component, (coords, _, _)) in components.iter().enumerate() {
                for &(id, (x, _)) in coords {
                    match keys.get_mut(id as usize) {
                        Some(key) => {
                            *key = OrderKey {
                                component,
                                coordinate: x as f64,
                            }
                        }
                        None => debug!("Node ID {id} from rust-sugiyama result is out of range"),
                    }
                }
            }
        }
        Err(_) => {
            warn!("Layered ordering failed, keeping insertion order");
        }
    }

    keys
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::grid::CartesianGrid;
    use skyplan_core::diagram::ServiceType;

    fn graph_strategy() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
        (1usize..12).prop_flat_map(|count| {
            let types = prop::collection::vec(0..ServiceType::ALL.len(), count);
            let pairs = prop::collection::vec((0..count, 0..count), 0..count * 2);
            (types, pairs).prop_map(|(types, pairs)| {
                let nodes = types
                    .iter()
                    .enumerate()
                    .map(|(index, kind)| {
                        Node::service(
                            Id::new(&format!("n{index}")),
                            "node",
                            ServiceType::ALL[*kind],
                        )
                    })
                    .collect();
                let edges = pairs
                    .iter()
                    .enumerate()
                    .map(|(index, (source, target))| {
                        Edge::new(
                            Id::new(&format!("e{index}")),
                            Id::new(&format!("n{source}")),
                            Id::new(&format!("n{target}")),
                        )
                    })
                    .collect();
                (nodes, edges)
            })
        })
    }

    fn check_layout_is_deterministic(nodes: &[Node], edges: &[Edge]) {
        let engine = LayeredLayout::new(LayoutConfig::default());
        let grid = CartesianGrid::default();

        let first = engine.calculate(nodes, edges, &grid);
        let second = engine.calculate(nodes, edges, &grid);

        assert_eq!(first, second);
    }

    fn check_services_do_not_overlap(nodes: &[Node], edges: &[Edge]) {
        let engine = LayeredLayout::new(LayoutConfig::default());
        let result = engine.calculate(nodes, edges, &CartesianGrid::default());
        let all: Vec<Bounds> = result.all_bounds().map(|(_, bounds)| bounds).collect();

        assert_eq!(all.len(), nodes.len());
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    fn check_lower_tiers_come_first(nodes: &[Node], edges: &[Edge]) {
        let engine = LayeredLayout::new(LayoutConfig::default());
        let result = engine.calculate(nodes, edges, &CartesianGrid::default());

        for a in nodes {
            for b in nodes {
                let (Some(ta), Some(tb)) = (a.service_type(), b.service_type()) else {
                    continue;
                };
                if tier_of(ta) < tier_of(tb) {
                    let (Some(pa), Some(pb)) = (result.position(a.id()), result.position(b.id()))
                    else {
                        continue;
                    };
                    assert!(pa.x() < pb.x());
                }
            }
        }
    }

    proptest! {
        #[test]
        fn layout_is_deterministic((nodes, edges) in graph_strategy()) {
            check_layout_is_deterministic(&nodes, &edges);
        }

        #[test]
        fn services_do_not_overlap((nodes, edges) in graph_strategy()) {
            check_services_do_not_overlap(&nodes, &edges);
        }

        #[test]
        fn lower_tiers_come_first((nodes, edges) in graph_strategy()) {
            check_lower_tiers_come_first(&nodes, &edges);
        }
    }
}
