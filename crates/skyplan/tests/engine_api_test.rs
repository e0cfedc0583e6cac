//! Integration tests for the DiagramEngine API
//!
//! These tests drive the engine the way a collaborator does: load a
//! document, arrange it, route it and refresh the derived state.

use skyplan::{
    DiagramEngine, Pipeline,
    config::AppConfig,
    diagram::{DiagramGraph, Edge, LayoutDirection, Node, ServiceConfig, ServiceType, ViewMode},
    geometry::{Bounds, Point, Size},
    grid::IsometricGrid,
    identifier::Id,
    routing::RouteStrategy,
};

const WEB_APP: &str = include_str!("../../../demos/web_app.json");
const EXPOSED_DATABASE: &str = include_str!("../../../demos/exposed_database.json");

fn load(document: &str) -> DiagramGraph {
    DiagramGraph::from_json(document).expect("Failed to load document")
}

#[test]
fn test_engine_api_exists() {
    let _engine = DiagramEngine::default();
    let _pipeline = Pipeline::new(DiagramEngine::new(AppConfig::default()));
}

#[test]
fn test_arrange_keeps_nested_positions_consistent() {
    let mut graph = load(WEB_APP);
    let engine = DiagramEngine::default();

    let layout = engine.arrange(&mut graph);

    for node in graph.nodes() {
        let absolute = graph
            .absolute_position(node.id())
            .expect("node exists");
        let bounds = layout.bounds(node.id()).expect("node was laid out");
        assert_eq!(
            absolute,
            bounds.min_point(),
            "absolute position of {} drifted",
            node.id()
        );
    }
}

#[test]
fn test_groups_wrap_their_children() {
    let mut graph = load(WEB_APP);
    let layout = DiagramEngine::default().arrange(&mut graph);

    for node in graph.nodes() {
        let Some(parent) = node.parent_id() else {
            continue;
        };
        let child = layout.bounds(node.id()).expect("child bounds");
        let outer = layout.bounds(parent).expect("parent bounds");
        assert!(outer.min_x() <= child.min_x() && child.max_x() <= outer.max_x());
        assert!(outer.min_y() <= child.min_y() && child.max_y() <= outer.max_y());
    }
}

#[test]
fn test_layout_is_deterministic() {
    let graph = load(WEB_APP);
    let engine = DiagramEngine::default();

    let first = engine.layout(
        graph.nodes(),
        graph.edges(),
        LayoutDirection::LeftToRight,
        ViewMode::Cartesian,
    );
    let second = engine.layout(
        graph.nodes(),
        graph.edges(),
        LayoutDirection::LeftToRight,
        ViewMode::Cartesian,
    );

    assert_eq!(first, second);
}

#[test]
fn test_isometric_layout_is_lattice_aligned() {
    let mut graph = load(EXPOSED_DATABASE);
    let engine = DiagramEngine::default();
    let grid = IsometricGrid::default();

    let layout = engine.arrange(&mut graph);

    for node in graph.services() {
        let bounds = layout.bounds(node.id()).expect("service laid out");
        let anchor = Point::new(bounds.center().x(), bounds.max_y());
        assert!(grid.is_vertex(anchor), "{} not on lattice", node.id());
    }
}

#[test]
fn test_snap_entry_points() {
    let engine = DiagramEngine::default();

    assert_eq!(
        engine.snap_point(Point::new(47.0, 13.0), ViewMode::Cartesian),
        Point::new(40.0, 20.0)
    );

    let size = engine.snap_group_dimensions(Size::new(500.0, 100.0), ViewMode::Isometric);
    assert_eq!(size.height(), size.width() / 2.0);
    assert_eq!(size.width() % 80.0, 0.0);
}

#[test]
fn test_level_nodes_route_directly() {
    let engine = DiagramEngine::default();
    let source = Bounds::new(0.0, 0.0, 120.0, 80.0);
    let target = Bounds::new(300.0, 0.0, 420.0, 80.0);

    let path = engine.route_edge(Id::new("e1"), source, target, ViewMode::Cartesian, &[]);

    assert_eq!(path.strategy(), RouteStrategy::Direct);
    assert_eq!(path.start(), Some(Point::new(120.0, 40.0)));
    assert_eq!(path.end(), Some(Point::new(300.0, 40.0)));
}

#[test]
fn test_route_all_skips_dangling_edges() {
    let mut graph = load(EXPOSED_DATABASE);
    let engine = DiagramEngine::default();

    let layout = engine.arrange(&mut graph);
    let routes = engine.route_all(&graph, &layout);

    assert_eq!(routes.len(), 2);
    assert!(!routes.contains_key(&Id::new("e3")));
    // The dangling edge is still part of the stored graph.
    assert!(graph.edge(Id::new("e3")).is_some());
    for path in routes.values() {
        assert!(matches!(
            path.strategy(),
            RouteStrategy::Isometric | RouteStrategy::IsometricFallback
        ));
    }
}

#[test]
fn test_price_service_redis() {
    let engine = DiagramEngine::default();
    let config = ServiceConfig::new()
        .with("tier", "standard-c1")
        .with("shards", 1u32);

    let breakdown = engine.price_service(ServiceType::RedisCache, Some(&config), Some("eastus"));

    assert_eq!(breakdown.line_items().len(), 1);
    assert_eq!(breakdown.total(), 101.47);
}

#[test]
fn test_default_config_round_trip() {
    let engine = DiagramEngine::default();
    let config = engine.default_config(ServiceType::AppService);

    assert_eq!(config.choice("tier"), Some("b1"));
    assert_eq!(
        engine.price_service(ServiceType::AppService, Some(&config), None),
        engine.price_service(ServiceType::AppService, None, None),
    );
}

#[test]
fn test_lint_single_unconnected_service() {
    let engine = DiagramEngine::default();
    let nodes = vec![Node::service(Id::new("api"), "API", ServiceType::AppService)];

    let report = engine.lint(&nodes, &Vec::<Edge>::new(), &Default::default());

    assert_eq!(report.by_rule("unreferenced-node").count(), 1);
}

#[test]
fn test_pipeline_on_documents() {
    let engine = DiagramEngine::new(AppConfig::default().with_monthly_budget(50.0));
    let mut pipeline = Pipeline::new(engine);

    let mut clean = load(WEB_APP);
    pipeline.refresh(&mut clean);
    assert_eq!(pipeline.report().by_rule("public-exposure").count(), 0);
    assert_eq!(pipeline.report().by_rule("budget-exceeded").count(), 1);
    assert!(clean.cost_summary().total() > 0.0);
    assert!(clean.cost_summary().by_group().contains_key(&Id::new("rg-prod")));

    let mut exposed = load(EXPOSED_DATABASE);
    pipeline.refresh(&mut exposed);
    let flagged: Vec<_> = pipeline
        .report()
        .by_rule("public-exposure")
        .filter_map(|finding| finding.node_id())
        .collect();
    assert_eq!(flagged, [Id::new("db"), Id::new("storage")]);
    assert_eq!(
        pipeline.report().by_rule("single-instance-compute").count(),
        1
    );
    assert_eq!(exposed.findings(), pipeline.report().findings());
}

#[test]
fn test_document_round_trip_keeps_derived_state() {
    let mut graph = load(WEB_APP);
    let engine = DiagramEngine::default();
    engine.arrange(&mut graph);
    Pipeline::new(engine).refresh(&mut graph);

    let json = graph.to_json().expect("Failed to serialize");
    let reloaded = DiagramGraph::from_json(&json).expect("Failed to reload");

    assert_eq!(reloaded.version(), graph.version());
    assert_eq!(reloaded.cost_summary(), graph.cost_summary());
    assert_eq!(reloaded.findings(), graph.findings());
    assert_eq!(reloaded.nodes().count(), graph.nodes().count());
}
