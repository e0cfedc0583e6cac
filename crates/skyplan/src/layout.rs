//! Layered layout of architecture diagrams.
//!
//! Services are placed in lanes by architectural [`tier`], ordered within a
//! lane by a crossing-minimising layered ordering, snapped to the active
//! lattice, and finally wrapped by their containing groups from the
//! innermost group outwards.
//!
//! The result keeps two views of the same geometry: absolute bounds, used by
//! the edge router, and parent-relative positions, which is what the diagram
//! model stores.

mod groups;
mod layered;
pub mod tier;

pub use layered::LayeredLayout;

use indexmap::IndexMap;
use serde::Serialize;

use skyplan_core::{
    diagram::DiagramGraph,
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::config::LayoutConfig;

/// Output of a layout run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Top-left of each node, relative to its parent when it has one
    positions: IndexMap<Id, Point>,
    group_dimensions: IndexMap<Id, Size>,
    /// Child id to parent id
    group_nesting: IndexMap<Id, Id>,
    #[serde(skip)]
    bounds: IndexMap<Id, Bounds>,
}

impl LayoutResult {
    fn new(
        positions: IndexMap<Id, Point>,
        group_dimensions: IndexMap<Id, Size>,
        group_nesting: IndexMap<Id, Id>,
        bounds: IndexMap<Id, Bounds>,
    ) -> Self {
        Self {
            positions,
            group_dimensions,
            group_nesting,
            bounds,
        }
    }

    /// Captures the geometry currently stored in `graph` without moving
    /// anything. Services take the configured service size.
    pub fn from_graph(graph: &DiagramGraph, config: &LayoutConfig) -> Self {
        let mut positions = IndexMap::new();
        let mut group_dimensions = IndexMap::new();
        let mut group_nesting = IndexMap::new();
        let mut bounds = IndexMap::new();

        for node in graph.nodes() {
            let size = node.size().unwrap_or_else(|| config.service_size());
            let origin = graph.absolute_position(node.id()).unwrap_or(node.position());

            positions.insert(node.id(), node.position());
            if node.is_group() {
                group_dimensions.insert(node.id(), size);
            }
            if let Some(parent) = node.parent_id().filter(|parent| graph.contains_node(*parent)) {
                group_nesting.insert(node.id(), parent);
            }
            bounds.insert(node.id(), Bounds::new_from_top_left(origin, size));
        }

        Self::new(positions, group_dimensions, group_nesting, bounds)
    }

    pub fn positions(&self) -> &IndexMap<Id, Point> {
        &self.positions
    }

    pub fn position(&self, id: Id) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    pub fn group_dimensions(&self) -> &IndexMap<Id, Size> {
        &self.group_dimensions
    }

    pub fn group_nesting(&self) -> &IndexMap<Id, Id> {
        &self.group_nesting
    }

    pub fn parent_of(&self, id: Id) -> Option<Id> {
        self.group_nesting.get(&id).copied()
    }

    /// Absolute canvas rectangle of a node.
    pub fn bounds(&self, id: Id) -> Option<Bounds> {
        self.bounds.get(&id).copied()
    }

    /// All absolute rectangles, in node order.
    pub fn all_bounds(&self) -> impl Iterator<Item = (Id, Bounds)> + '_ {
        self.bounds.iter().map(|(id, bounds)| (*id, *bounds))
    }

    /// Absolute position obtained by summing the relative positions along
    /// the nesting chain.
    pub fn absolute_position(&self, id: Id) -> Option<Point> {
        let mut position = self.position(id)?;
        let mut current = id;
        let mut steps = 0;
        while let Some(parent) = self.parent_of(current) {
            // A chain longer than the node count means a cycle.
            if steps > self.group_nesting.len() {
                break;
            }
            position = position.add_point(self.position(parent)?);
            current = parent;
            steps += 1;
        }
        Some(position)
    }

    /// Writes positions and group sizes back into the graph as one change.
    pub fn apply_to(&self, graph: &mut DiagramGraph) {
        graph.apply_layout(&self.positions, &self.group_dimensions);
    }
}

#[cfg(test)]
mod tests {
    use skyplan_core::diagram::{GroupType, Node, ServiceType};

    use super::*;

    #[test]
    fn test_from_graph_uses_stored_geometry() {
        let mut graph = DiagramGraph::new();
        graph
            .add_batch(
                vec![
                    Node::group(Id::new("rg"), "Prod", GroupType::ResourceGroup)
                        .with_position(Point::new(100.0, 100.0))
                        .with_size(Size::new(400.0, 300.0)),
                    Node::service(Id::new("web"), "Web", ServiceType::AppService)
                        .with_parent(Id::new("rg"))
                        .with_position(Point::new(40.0, 72.0)),
                ],
                vec![],
            )
            .expect("valid batch");

        let layout = LayoutResult::from_graph(&graph, &LayoutConfig::default());

        assert_eq!(layout.position(Id::new("web")), Some(Point::new(40.0, 72.0)));
        assert_eq!(
            layout.bounds(Id::new("web")),
            Some(Bounds::new(140.0, 172.0, 260.0, 252.0))
        );
        assert_eq!(layout.parent_of(Id::new("web")), Some(Id::new("rg")));
        assert_eq!(
            layout.group_dimensions().get(&Id::new("rg")),
            Some(&Size::new(400.0, 300.0))
        );
        assert_eq!(
            layout.absolute_position(Id::new("web")),
            Some(Point::new(140.0, 172.0))
        );
    }
}
