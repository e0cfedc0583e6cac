use indexmap::IndexMap;
use log::debug;

use skyplan_core::{
    diagram::{CostSummary, DiagramGraph, GroupType},
    identifier::Id,
};

use super::{CostBreakdown, derive_sku, price_service};

/// Pricing of every service of a diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricedDiagram {
    summary: CostSummary,
    node_costs: IndexMap<Id, (f64, Option<String>)>,
    breakdowns: IndexMap<Id, CostBreakdown>,
}

impl PricedDiagram {
    pub fn summary(&self) -> &CostSummary {
        &self.summary
    }

    /// Monthly cost and SKU per service node
    pub fn node_costs(&self) -> &IndexMap<Id, (f64, Option<String>)> {
        &self.node_costs
    }

    pub fn breakdown(&self, id: Id) -> Option<&CostBreakdown> {
        self.breakdowns.get(&id)
    }

    pub fn breakdowns(&self) -> &IndexMap<Id, CostBreakdown> {
        &self.breakdowns
    }

    /// Stores the summary and per-node figures in the graph.
    pub fn apply_to(&self, graph: &mut DiagramGraph) {
        graph.replace_costs(self.summary.clone(), &self.node_costs);
    }
}

/// Prices every service of `graph` in `region` and aggregates the result.
///
/// A service counts towards the nearest enclosing resource group, or the
/// outermost enclosing group when no resource group encloses it. Services
/// outside any group only contribute to the total and per-type figures.
pub fn summarize(graph: &DiagramGraph, region: &str) -> PricedDiagram {
    let mut total = 0.0;
    let mut by_service_type = IndexMap::new();
    let mut by_group: IndexMap<Id, f64> = IndexMap::new();
    let mut node_costs = IndexMap::new();
    let mut breakdowns = IndexMap::new();

    for node in graph.services() {
        let Some(service_type) = node.service_type() else {
            continue;
        };
        let breakdown = price_service(service_type, node.config(), region);
        let cost = breakdown.total();

        total += cost;
        *by_service_type.entry(service_type).or_insert(0.0) += cost;
        if let Some(group) = owning_group(graph, node.id()) {
            *by_group.entry(group).or_insert(0.0) += cost;
        }

        node_costs.insert(node.id(), (cost, derive_sku(service_type, node.config())));
        breakdowns.insert(node.id(), breakdown);
    }

    debug!(services = node_costs.len(), total; "Priced diagram");

    PricedDiagram {
        summary: CostSummary::new(total, by_service_type, by_group),
        node_costs,
        breakdowns,
    }
}

fn owning_group(graph: &DiagramGraph, id: Id) -> Option<Id> {
    let ancestors = graph.ancestors(id);
    ancestors
        .iter()
        .copied()
        .find(|ancestor| {
            graph
                .node(*ancestor)
                .and_then(|node| node.group_type())
                .is_some_and(|group_type| group_type == GroupType::ResourceGroup)
        })
        .or_else(|| ancestors.last().copied())
}
