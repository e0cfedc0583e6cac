//! CLI logic for the Skyplan architecture tool.
//!
//! A run loads a diagram document, lays it out, routes its connectors,
//! recomputes costs and findings and writes everything to a JSON report.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;

use skyplan::{
    DiagramEngine, GraphError, Pipeline, SkyplanError, diagram::DiagramGraph, identifier::Id,
    layout::LayoutResult, routing::EdgePath,
};

/// Document written to the output path.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    diagram: &'a DiagramGraph,
    routes: &'a IndexMap<Id, EdgePath>,
    lint: LintOutcome,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LintOutcome {
    score: u32,
    passed: bool,
}

/// Run the Skyplan CLI application
///
/// # Errors
///
/// Returns `SkyplanError` for:
/// - File I/O errors
/// - Configuration loading errors and invalid overrides
/// - Malformed diagram documents
pub fn run(args: &Args) -> Result<(), SkyplanError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_overrides(app_config, args)?;

    let source = fs::read_to_string(&args.input)?;
    let mut graph = DiagramGraph::from_json(&source)?;

    let dangling = graph.edges().len() - graph.resolved_edges().count();
    if dangling > 0 {
        warn!(dangling; "Edges with unknown endpoints are ignored");
    }

    let engine = DiagramEngine::new(app_config);
    let layout = if args.no_layout {
        LayoutResult::from_graph(&graph, engine.config().layout())
    } else {
        engine.arrange(&mut graph)
    };
    let routes = engine.route_all(&graph, &layout);

    let mut pipeline = Pipeline::new(engine);
    pipeline.refresh(&mut graph);

    let report = Report {
        diagram: &graph,
        routes: &routes,
        lint: LintOutcome {
            score: pipeline.report().score(),
            passed: pipeline.report().passed(),
        },
    };
    let json = serde_json::to_string_pretty(&report).map_err(GraphError::from)?;
    fs::write(&args.output, json)?;

    info!(
        output_file = args.output,
        total_cost = graph.cost_summary().total(),
        findings = graph.findings().len(),
        score = pipeline.report().score();
        "Report exported successfully"
    );

    Ok(())
}
