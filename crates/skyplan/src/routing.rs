//! Edge routing between positioned nodes.
//!
//! The cartesian view uses [`OrthogonalRouter`]: connectors leave a node
//! vertically, run along a horizontal channel and enter the other node
//! vertically. The isometric view uses [`IsometricRouter`], whose connectors
//! follow the ±0.5 slopes of the diamond lattice.
//!
//! [`EdgeRouter`] selects the router for the active view mode and routes
//! every edge of a [`LayoutResult`].

mod isometric;
mod orthogonal;
mod path;

pub use isometric::{Anchor, IsometricRouter};
pub use orthogonal::OrthogonalRouter;

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use skyplan_core::{
    diagram::{Edge, ViewMode},
    geometry::{Bounds, Point},
    identifier::Id,
};

use crate::{config::RoutingConfig, layout::LayoutResult};

/// How a path was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStrategy {
    /// Straight side-to-side connector between level nodes
    Direct,
    /// Vertical, horizontal, vertical connector through a channel
    Channel,
    /// Two slope segments meeting at a lattice-aligned corner
    Isometric,
    /// Two segments through the midpoint when the slope corner is off-screen
    IsometricFallback,
}

/// A routed connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgePath {
    strategy: RouteStrategy,
    points: Vec<Point>,
    corner_radius: f32,
    /// Y coordinate of the horizontal run, for channel routes
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<f32>,
    /// SVG path data with rounded corners
    path_data: String,
}

impl EdgePath {
    fn new(
        strategy: RouteStrategy,
        points: Vec<Point>,
        corner_radius: f32,
        channel: Option<f32>,
    ) -> Self {
        let points = path::dedup_points(points);
        let path_data = path::rounded_path_data(&points, corner_radius);
        Self {
            strategy,
            points,
            corner_radius,
            channel,
            path_data,
        }
    }

    pub fn strategy(&self) -> RouteStrategy {
        self.strategy
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn channel(&self) -> Option<f32> {
        self.channel
    }

    pub fn path_data(&self) -> &str {
        &self.path_data
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Total polyline length.
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

/// Routes edges for either view mode.
pub struct EdgeRouter {
    orthogonal: OrthogonalRouter,
    isometric: IsometricRouter,
}

impl EdgeRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            isometric: IsometricRouter::new(config.clone()),
            orthogonal: OrthogonalRouter::new(config),
        }
    }

    /// Routes one edge between two absolute node rectangles.
    ///
    /// `obstacles` are only considered by the cartesian router. They should
    /// not include the source and target rectangles.
    pub fn route(
        &self,
        edge_id: Id,
        source: Bounds,
        target: Bounds,
        view_mode: ViewMode,
        obstacles: &[Bounds],
    ) -> EdgePath {
        match view_mode {
            ViewMode::Cartesian => self.orthogonal.route(edge_id, source, target, obstacles),
            ViewMode::Isometric => self.isometric.route(source, target),
        }
    }

    /// Routes every edge whose endpoints were positioned by `layout`.
    ///
    /// Services other than the two endpoints act as obstacles; group boxes do
    /// not, since connectors routinely cross into and out of them. Edges with
    /// an unknown endpoint or identical endpoints are skipped.
    pub fn route_layout<'a, E>(
        &self,
        edges: E,
        layout: &LayoutResult,
        view_mode: ViewMode,
    ) -> IndexMap<Id, EdgePath>
    where
        E: IntoIterator<Item = &'a Edge>,
    {
        let groups: HashSet<Id> = layout.group_dimensions().keys().copied().collect();
        let services: Vec<(Id, Bounds)> = layout
            .all_bounds()
            .filter(|(id, _)| !groups.contains(id))
            .collect();

        let mut routes = IndexMap::new();
        for edge in edges {
            if edge.source() == edge.target() {
                continue;
            }
            let (Some(source), Some(target)) =
                (layout.bounds(edge.source()), layout.bounds(edge.target()))
            else {
                debug!(edge = edge.id().to_text(); "Skipping edge with unplaced endpoint");
                continue;
            };

            let obstacles: Vec<Bounds> = services
                .iter()
                .filter(|(id, _)| !edge.touches(*id))
                .map(|(_, bounds)| *bounds)
                .collect();
            routes.insert(
                edge.id(),
                self.route(edge.id(), source, target, view_mode, &obstacles),
            );
        }
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LayoutConfig, grid::CartesianGrid, layout::LayeredLayout};
    use skyplan_core::diagram::{Node, ServiceType};

    #[test]
    fn test_route_layout_skips_unplaced_and_self_edges() {
        let nodes = vec![
            Node::service(Id::new("app"), "App", ServiceType::AppService),
            Node::service(Id::new("db"), "Db", ServiceType::SqlDatabase),
        ];
        let edges = vec![
            Edge::new(Id::new("ok"), Id::new("app"), Id::new("db")),
            Edge::new(Id::new("self"), Id::new("app"), Id::new("app")),
            Edge::new(Id::new("ghost"), Id::new("app"), Id::new("nowhere")),
        ];
        let layout = LayeredLayout::new(LayoutConfig::default()).calculate(
            &nodes,
            &edges,
            &CartesianGrid::default(),
        );
        let router = EdgeRouter::new(RoutingConfig::default());

        let routes = router.route_layout(&edges, &layout, ViewMode::Cartesian);

        assert_eq!(routes.len(), 1);
        let route = &routes[&Id::new("ok")];
        // Both services share the first row, so the connector is direct.
        assert_eq!(route.strategy(), RouteStrategy::Direct);
        assert!(route.path_data().starts_with("M "));
    }

    #[test]
    fn test_route_dispatches_by_view_mode() {
        let router = EdgeRouter::new(RoutingConfig::default());
        let source = Bounds::new(0.0, 0.0, 120.0, 80.0);
        let target = Bounds::new(400.0, 300.0, 520.0, 380.0);

        let cartesian = router.route(Id::new("a"), source, target, ViewMode::Cartesian, &[]);
        let isometric = router.route(Id::new("a"), source, target, ViewMode::Isometric, &[]);

        assert_eq!(cartesian.strategy(), RouteStrategy::Channel);
        assert_ne!(isometric.strategy(), RouteStrategy::Channel);
    }

    #[test]
    fn test_length() {
        let path = EdgePath::new(
            RouteStrategy::Channel,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 30.0),
                Point::new(40.0, 30.0),
            ],
            4.0,
            Some(30.0),
        );
        assert_eq!(path.length(), 70.0);
    }
}
