//! Skyplan - layout, routing, pricing and linting for cloud architecture
//! diagrams.
//!
//! The engine turns a [`DiagramGraph`](diagram::DiagramGraph) of typed
//! services, groups and connections into positions, connector paths, monthly
//! costs and architecture findings. Every computation is a pure function of
//! its inputs; results are written back into the graph by the caller.

pub mod config;
pub mod grid;
pub mod layout;
pub mod lint;
pub mod pricing;
pub mod routing;

mod error;

pub use skyplan_core::{diagram, geometry, identifier};

pub use error::SkyplanError;
pub use skyplan_core::error::GraphError;

use indexmap::IndexMap;
use log::{debug, info, trace};

use skyplan_core::{
    diagram::{
        CostSummary, DiagramGraph, Edge, LayoutDirection, Node, ServiceConfig, ServiceType,
        ViewMode,
    },
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use config::AppConfig;
use grid::Snapper;
use layout::{LayeredLayout, LayoutResult};
use lint::{LintReport, Linter};
use pricing::{CostBreakdown, PricedDiagram};
use routing::{EdgePath, EdgeRouter};

/// Entry points of the engine, configured once from an [`AppConfig`].
///
/// # Examples
///
/// ```
/// use skyplan::{
///     DiagramEngine,
///     diagram::{Edge, LayoutDirection, Node, ServiceType, ViewMode},
///     identifier::Id,
/// };
///
/// let nodes = vec![
///     Node::service(Id::new("web"), "Web", ServiceType::AppService),
///     Node::service(Id::new("db"), "Orders", ServiceType::SqlDatabase),
/// ];
/// let edges = vec![Edge::new(Id::new("e1"), Id::new("web"), Id::new("db"))];
///
/// let engine = DiagramEngine::default();
/// let layout = engine.layout(&nodes, &edges, LayoutDirection::LeftToRight, ViewMode::Cartesian);
///
/// assert_eq!(layout.positions().len(), 2);
/// ```
#[derive(Default)]
pub struct DiagramEngine {
    config: AppConfig,
}

impl DiagramEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// View mode used for `graph`: the configured override, else the mode
    /// stored in the diagram.
    pub fn view_mode_for(&self, graph: &DiagramGraph) -> ViewMode {
        self.config.grid().view_mode().unwrap_or(graph.view_mode())
    }

    fn snapper(&self, view_mode: ViewMode) -> Box<dyn Snapper> {
        grid::snapper_for(view_mode, self.config.grid())
    }

    /// Computes positions for services and boxes for groups.
    pub fn layout<'a, N, E>(
        &self,
        nodes: N,
        edges: E,
        direction: LayoutDirection,
        view_mode: ViewMode,
    ) -> LayoutResult
    where
        N: IntoIterator<Item = &'a Node>,
        E: IntoIterator<Item = &'a Edge>,
    {
        let config = self.config.layout().clone().with_direction(direction);
        let snapper = self.snapper(view_mode);
        LayeredLayout::new(config).calculate(nodes, edges, snapper.as_ref())
    }

    /// Lays out every node of `graph` and writes the result back.
    pub fn arrange(&self, graph: &mut DiagramGraph) -> LayoutResult {
        let view_mode = self.view_mode_for(graph);
        info!(nodes = graph.nodes().count(), view_mode:% = view_mode; "Arranging diagram");

        let result = self.layout(
            graph.nodes(),
            graph.resolved_edges(),
            self.config.layout().direction(),
            view_mode,
        );
        result.apply_to(graph);
        debug!(version = graph.version(); "Layout applied");
        result
    }

    pub fn snap_point(&self, point: Point, view_mode: ViewMode) -> Point {
        self.snapper(view_mode).snap_point(point)
    }

    /// Lattice-aligned group dimensions for a raw size.
    ///
    /// In the isometric view only the width matters; the height is derived
    /// from it.
    pub fn snap_group_dimensions(&self, raw: Size, view_mode: ViewMode) -> Size {
        self.snapper(view_mode).snap_group_dimensions(raw)
    }

    /// Routes one connector between two absolute node rectangles.
    pub fn route_edge(
        &self,
        edge_id: Id,
        source: Bounds,
        target: Bounds,
        view_mode: ViewMode,
        obstacles: &[Bounds],
    ) -> EdgePath {
        EdgeRouter::new(self.config.routing().clone()).route(
            edge_id, source, target, view_mode, obstacles,
        )
    }

    /// Routes every resolved edge of `graph` over a layout of it.
    pub fn route_all(&self, graph: &DiagramGraph, layout: &LayoutResult) -> IndexMap<Id, EdgePath> {
        let view_mode = self.view_mode_for(graph);
        let routes = EdgeRouter::new(self.config.routing().clone()).route_layout(
            graph.resolved_edges(),
            layout,
            view_mode,
        );
        info!(routes = routes.len(); "Edges routed");
        trace!(routes:?; "Routed edges");
        routes
    }

    /// Prices one service. `region` defaults to the configured region.
    pub fn price_service(
        &self,
        service: ServiceType,
        config: Option<&ServiceConfig>,
        region: Option<&str>,
    ) -> CostBreakdown {
        pricing::price_service(service, config, region.unwrap_or(self.config.pricing().region()))
    }

    pub fn default_config(&self, service: ServiceType) -> ServiceConfig {
        pricing::default_config(service)
    }

    /// Prices every service of `graph` in the configured region.
    pub fn price_diagram(&self, graph: &DiagramGraph) -> PricedDiagram {
        let region = self.config.pricing().region();
        let priced = pricing::summarize(graph, region);
        info!(
            region,
            total = priced.summary().total(),
            currency = self.config.pricing().currency();
            "Diagram priced"
        );
        priced
    }

    /// Runs the rule battery.
    pub fn lint<'a, N, E>(&self, nodes: N, edges: E, summary: &CostSummary) -> LintReport
    where
        N: IntoIterator<Item = &'a Node>,
        E: IntoIterator<Item = &'a Edge>,
    {
        Linter::new(self.config.lint().clone()).lint(nodes, edges, summary)
    }
}

/// Recomputes the derived state of a graph (costs and findings) only when
/// the graph changed since the last run.
///
/// Skipping is an optimisation: a forced refresh of an unchanged graph
/// produces the same state.
pub struct Pipeline {
    engine: DiagramEngine,
    last_version: Option<u64>,
    report: LintReport,
}

impl Pipeline {
    pub fn new(engine: DiagramEngine) -> Self {
        Self {
            engine,
            last_version: None,
            report: LintReport::default(),
        }
    }

    pub fn engine(&self) -> &DiagramEngine {
        &self.engine
    }

    /// Version of the graph at the last recomputation
    pub fn last_version(&self) -> Option<u64> {
        self.last_version
    }

    /// Report of the last recomputation
    pub fn report(&self) -> &LintReport {
        &self.report
    }

    /// Recomputes costs and findings if the graph version moved.
    ///
    /// Returns `true` if anything was recomputed.
    pub fn refresh(&mut self, graph: &mut DiagramGraph) -> bool {
        if self.last_version == Some(graph.version()) {
            debug!(version = graph.version(); "Graph unchanged, skipping recomputation");
            return false;
        }
        self.force_refresh(graph);
        true
    }

    /// Recomputes costs and findings regardless of the graph version.
    pub fn force_refresh(&mut self, graph: &mut DiagramGraph) {
        info!(version = graph.version(); "Recomputing derived state");

        // Findings read per-node costs, so prices go in first.
        self.engine.price_diagram(graph).apply_to(graph);

        let report = self
            .engine
            .lint(graph.nodes(), graph.resolved_edges(), graph.cost_summary());
        graph.replace_findings(report.findings().to_vec());

        self.report = report;
        self.last_version = Some(graph.version());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> DiagramGraph {
        let mut graph = DiagramGraph::new();
        graph
            .add_batch(
                vec![
                    Node::service(Id::new("web"), "Web", ServiceType::AppService),
                    Node::service(Id::new("db"), "Orders", ServiceType::SqlDatabase),
                ],
                vec![Edge::new(Id::new("e1"), Id::new("web"), Id::new("db"))],
            )
            .expect("valid batch");
        graph
    }

    #[test]
    fn test_view_mode_override() {
        let mut graph = DiagramGraph::new();
        graph.set_view_mode(ViewMode::Isometric);

        assert_eq!(
            DiagramEngine::default().view_mode_for(&graph),
            ViewMode::Isometric
        );
        let forced = DiagramEngine::new(AppConfig::default().with_view_mode(ViewMode::Cartesian));
        assert_eq!(forced.view_mode_for(&graph), ViewMode::Cartesian);
    }

    #[test]
    fn test_pipeline_skips_unchanged_graph() {
        let mut graph = sample_graph();
        let mut pipeline = Pipeline::new(DiagramEngine::default());

        assert!(pipeline.refresh(&mut graph));
        let findings = graph.findings().to_vec();
        assert!(!findings.is_empty());
        assert!(!pipeline.refresh(&mut graph));

        graph
            .update_position(Id::new("web"), Point::new(10.0, 10.0))
            .expect("node exists");
        assert!(pipeline.refresh(&mut graph));
        assert_eq!(graph.findings(), findings.as_slice());
    }

    #[test]
    fn test_force_refresh_is_idempotent() {
        let mut graph = sample_graph();
        let mut pipeline = Pipeline::new(DiagramEngine::default());

        pipeline.force_refresh(&mut graph);
        let summary = graph.cost_summary().clone();
        let version = graph.version();
        pipeline.force_refresh(&mut graph);

        assert_eq!(graph.cost_summary(), &summary);
        assert_eq!(graph.version(), version);
        assert_eq!(pipeline.last_version(), Some(version));
    }

    #[test]
    fn test_arrange_writes_positions() {
        let mut graph = sample_graph();
        let version = graph.version();

        let layout = DiagramEngine::default().arrange(&mut graph);

        assert_eq!(graph.version(), version + 1);
        for (id, position) in layout.positions() {
            assert_eq!(graph.node(*id).map(Node::position), Some(*position));
        }
    }
}
