use std::collections::HashSet;

use skyplan_core::{
    diagram::{ConnectionType, Finding, GroupType, Node, Pillar, ServiceType, Severity},
    identifier::Id,
};

use super::LintContext;
use crate::pricing;

pub(super) type Rule = fn(&LintContext<'_>) -> Vec<Finding>;

/// The rule battery, in evaluation order.
pub(super) const RULES: &[(&str, Rule)] = &[
    ("unreferenced-node", unreferenced_node),
    ("missing-observability", missing_observability),
    ("missing-secrets-store", missing_secrets_store),
    ("missing-identity", missing_identity),
    ("compute-secrets-link", compute_secrets_link),
    ("public-exposure", public_exposure),
    ("unencrypted-public-connection", unencrypted_public_connection),
    ("missing-network-boundary", missing_network_boundary),
    ("network-segmentation", network_segmentation),
    ("single-instance-compute", single_instance_compute),
    ("budget-exceeded", budget_exceeded),
    ("dominant-cost", dominant_cost),
    ("description-too-short", description_too_short),
    (
        "description-missing-security-context",
        description_missing_security_context,
    ),
];

/// Words that show a description talks about how the service is secured.
const SECURITY_KEYWORDS: &[&str] = &[
    "auth",
    "encrypt",
    "tls",
    "ssl",
    "https",
    "private",
    "firewall",
    "identity",
    "rbac",
    "secret",
    "key vault",
    "access",
    "waf",
    "isolated",
];

fn service_type(node: &Node) -> ServiceType {
    node.service_type().unwrap_or(ServiceType::Unknown)
}

/// Flags every service whose id is neither the source nor the target of a
/// resolved edge.
///
/// Edges with an unknown endpoint are not part of the context, so a service
/// that is only referenced by such an edge is still reported. Self-loops do
/// count as a reference.
fn unreferenced_node(context: &LintContext<'_>) -> Vec<Finding> {
    let referenced: HashSet<Id> = context
        .edges
        .iter()
        .flat_map(|edge| [edge.source(), edge.target()])
        .collect();

    context
        .services
        .iter()
        .filter(|node| !referenced.contains(&node.id()))
        .map(|node| {
            Finding::new(
                "unreferenced-node",
                Pillar::OperationalExcellence,
                Severity::Warning,
                format!("'{}' is not connected", node.name()),
            )
            .with_node(node.id())
            .with_description("The service has no incoming or outgoing connection.")
            .with_recommendation("Connect the service to its consumers or remove it.")
        })
        .collect()
}

fn missing_observability(context: &LintContext<'_>) -> Vec<Finding> {
    if context.services.is_empty()
        || context.has_service(|node| service_type(node).is_observability())
    {
        return Vec::new();
    }
    vec![
        Finding::new(
            "missing-observability",
            Pillar::OperationalExcellence,
            Severity::Warning,
            "No monitoring service",
        )
        .with_description("Nothing collects telemetry from the services in this diagram.")
        .with_recommendation("Add Application Insights or a Log Analytics workspace."),
    ]
}

fn missing_secrets_store(context: &LintContext<'_>) -> Vec<Finding> {
    if context.services.is_empty()
        || context.has_service(|node| service_type(node).is_secrets_store())
    {
        return Vec::new();
    }
    vec![
        Finding::new(
            "missing-secrets-store",
            Pillar::Security,
            Severity::Warning,
            "No secrets store",
        )
        .with_description("Connection strings and keys have no managed home.")
        .with_recommendation("Add a Key Vault and keep secrets out of application settings."),
    ]
}

fn missing_identity(context: &LintContext<'_>) -> Vec<Finding> {
    if context.services.is_empty() || context.has_service(|node| service_type(node).is_identity())
    {
        return Vec::new();
    }
    vec![
        Finding::new(
            "missing-identity",
            Pillar::Security,
            Severity::Info,
            "No identity provider",
        )
        .with_description("Services authenticate without a managed identity or directory.")
        .with_recommendation("Use managed identities backed by Entra ID."),
    ]
}

fn compute_secrets_link(context: &LintContext<'_>) -> Vec<Finding> {
    let vaults: HashSet<Id> = context
        .services
        .iter()
        .filter(|node| service_type(node).is_secrets_store())
        .map(|node| node.id())
        .collect();
    if vaults.is_empty() {
        return Vec::new();
    }

    context
        .services
        .iter()
        .filter(|node| service_type(node).is_compute())
        .filter(|node| {
            !context
                .edges_of(node.id())
                .filter_map(|edge| edge.other_end(node.id()))
                .any(|other| vaults.contains(&other))
        })
        .map(|node| {
            Finding::new(
                "compute-secrets-link",
                Pillar::Security,
                Severity::Warning,
                format!("'{}' does not use the secrets store", node.name()),
            )
            .with_node(node.id())
            .with_description("The compute service has no connection to a Key Vault.")
            .with_recommendation("Read secrets from Key Vault through a managed identity.")
        })
        .collect()
}

fn public_exposure(context: &LintContext<'_>) -> Vec<Finding> {
    context
        .services
        .iter()
        .filter(|node| service_type(node).is_sensitive())
        .filter(|node| {
            context
                .edges_of(node.id())
                .any(|edge| edge.connection_type() == ConnectionType::Public)
        })
        .map(|node| {
            Finding::new(
                "public-exposure",
                Pillar::Security,
                Severity::Critical,
                format!("'{}' is reachable over a public connection", node.name()),
            )
            .with_node(node.id())
            .with_description(format!(
                "{} holds data or secrets and must not accept public traffic.",
                service_type(node).label()
            ))
            .with_recommendation("Use a private endpoint or a service endpoint instead.")
        })
        .collect()
}

fn unencrypted_public_connection(context: &LintContext<'_>) -> Vec<Finding> {
    context
        .edges
        .iter()
        .filter(|edge| edge.connection_type() == ConnectionType::Public && !edge.encrypted())
        .map(|edge| {
            let name = |id: Id| {
                context
                    .node(id)
                    .map_or_else(|| id.to_text(), |node| node.name().to_string())
            };
            Finding::new(
                "unencrypted-public-connection",
                Pillar::Security,
                Severity::Warning,
                format!(
                    "Unencrypted public connection from '{}' to '{}'",
                    name(edge.source()),
                    name(edge.target())
                ),
            )
            .with_node(edge.target())
            .with_description(format!("Connection '{}' sends plain traffic.", edge.id()))
            .with_recommendation("Enforce TLS on the connection.")
        })
        .collect()
}

fn missing_network_boundary(context: &LintContext<'_>) -> Vec<Finding> {
    let has_network = context
        .groups
        .iter()
        .any(|group| group.group_type() == Some(GroupType::VirtualNetwork));
    if context.services.is_empty() || has_network {
        return Vec::new();
    }
    vec![
        Finding::new(
            "missing-network-boundary",
            Pillar::Security,
            Severity::Info,
            "No virtual network",
        )
        .with_description("Every service is placed outside a network boundary.")
        .with_recommendation("Place private workloads in a virtual network."),
    ]
}

fn network_segmentation(context: &LintContext<'_>) -> Vec<Finding> {
    let subnets: Vec<Id> = context
        .groups
        .iter()
        .filter(|group| group.group_type() == Some(GroupType::Subnet))
        .map(|group| group.id())
        .collect();

    context
        .groups
        .iter()
        .filter(|group| group.group_type() == Some(GroupType::VirtualNetwork))
        .filter(|network| {
            subnets
                .iter()
                .filter(|subnet| context.is_descendant(**subnet, network.id()))
                .count()
                < 2
        })
        .map(|network| {
            Finding::new(
                "network-segmentation",
                Pillar::Security,
                Severity::Warning,
                format!("'{}' is not segmented", network.name()),
            )
            .with_node(network.id())
            .with_description("The virtual network has fewer than two subnets.")
            .with_recommendation("Split tiers into separate subnets with their own rules.")
        })
        .collect()
}

fn single_instance_compute(context: &LintContext<'_>) -> Vec<Finding> {
    context
        .services
        .iter()
        .filter(|node| service_type(node).is_compute())
        .filter(|node| {
            // Only explicit configurations; an unconfigured node is a sketch.
            let Some(config) = node.config() else {
                return false;
            };
            pricing::descriptor(service_type(node))
                .and_then(|descriptor| descriptor.instance_count(config))
                .is_some_and(|count| count <= 1.0)
        })
        .map(|node| {
            Finding::new(
                "single-instance-compute",
                Pillar::Reliability,
                Severity::Warning,
                format!("'{}' runs a single instance", node.name()),
            )
            .with_node(node.id())
            .with_description("A single instance is a single point of failure.")
            .with_recommendation("Run at least two instances or enable zone redundancy.")
        })
        .collect()
}

fn budget_exceeded(context: &LintContext<'_>) -> Vec<Finding> {
    let Some(budget) = context.config.monthly_budget() else {
        return Vec::new();
    };
    let total = context.summary.total();
    if total <= budget {
        return Vec::new();
    }
    vec![
        Finding::new(
            "budget-exceeded",
            Pillar::CostOptimization,
            Severity::Warning,
            "Monthly budget exceeded",
        )
        .with_description(format!(
            "Estimated monthly cost {total:.2} exceeds the budget of {budget:.2}."
        ))
        .with_recommendation("Review tiers and instance counts of the largest services."),
    ]
}

fn dominant_cost(context: &LintContext<'_>) -> Vec<Finding> {
    let total = context.summary.total();
    let priced: Vec<(&Node, f64)> = context
        .services
        .iter()
        .filter_map(|node| node.monthly_cost().map(|cost| (*node, cost)))
        .collect();
    if total <= 0.0 || priced.len() < 2 {
        return Vec::new();
    }

    let share = context.config.dominant_cost_share();
    priced
        .into_iter()
        .filter(|(_, cost)| cost / total > share)
        .map(|(node, cost)| {
            Finding::new(
                "dominant-cost",
                Pillar::CostOptimization,
                Severity::Info,
                format!("'{}' dominates the monthly cost", node.name()),
            )
            .with_node(node.id())
            .with_description(format!(
                "{:.0}% of the estimated monthly cost comes from this service.",
                cost / total * 100.0
            ))
            .with_recommendation("Check whether a smaller tier or reserved capacity fits.")
        })
        .collect()
}

fn description_too_short(context: &LintContext<'_>) -> Vec<Finding> {
    let minimum = context.config.min_description_length();
    context
        .services
        .iter()
        .filter_map(|node| node.description().map(|description| (node, description)))
        .filter(|(_, description)| description.trim().chars().count() < minimum)
        .map(|(node, _)| {
            Finding::new(
                "description-too-short",
                Pillar::OperationalExcellence,
                Severity::Info,
                format!("'{}' has a very short description", node.name()),
            )
            .with_node(node.id())
            .with_description(format!(
                "Descriptions should have at least {minimum} characters."
            ))
            .with_recommendation("Describe what the service does and who uses it.")
        })
        .collect()
}

fn description_missing_security_context(context: &LintContext<'_>) -> Vec<Finding> {
    let minimum = context.config.min_description_length();
    context
        .services
        .iter()
        .filter_map(|node| node.description().map(|description| (node, description)))
        .filter(|(_, description)| description.trim().chars().count() >= minimum)
        .filter(|(_, description)| {
            let lowered = description.to_lowercase();
            !SECURITY_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
        .map(|(node, _)| {
            Finding::new(
                "description-missing-security-context",
                Pillar::Security,
                Severity::Info,
                format!("'{}' description does not mention security", node.name()),
            )
            .with_node(node.id())
            .with_description("The description says nothing about access or encryption.")
            .with_recommendation("Note how the service authenticates and protects data.")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use skyplan_core::diagram::{CostSummary, Edge, ServiceConfig};

    use super::*;
    use crate::{
        config::{AppConfig, LintConfig},
        lint::{LintReport, Linter},
    };

    fn id(name: &str) -> Id {
        Id::new(name)
    }

    fn service(name: &str, service_type: ServiceType) -> Node {
        Node::service(id(name), name, service_type)
    }

    fn private(edge_id: &str, source: &str, target: &str) -> Edge {
        Edge::new(id(edge_id), id(source), id(target))
            .with_connection_type(ConnectionType::PrivateEndpoint)
    }

    fn lint(nodes: &[Node], edges: &[Edge]) -> LintReport {
        Linter::new(LintConfig::default()).lint(nodes, edges, &CostSummary::default())
    }

    fn rule_ids(report: &LintReport) -> Vec<&str> {
        report.findings().iter().map(Finding::rule).collect()
    }

    #[test]
    fn test_rule_order_is_stable() {
        let ids: Vec<&str> = RULES.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.first(), Some(&"unreferenced-node"));
        assert_eq!(ids.len(), 14);
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_single_service_is_unreferenced_once() {
        let report = lint(&[service("api", ServiceType::AppService)], &[]);

        let unreferenced: Vec<_> = report.by_rule("unreferenced-node").collect();
        assert_eq!(unreferenced.len(), 1);
        assert_eq!(unreferenced[0].node_id(), Some(id("api")));
        assert_eq!(unreferenced[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_dangling_edge_does_not_reference() {
        let nodes = [
            service("api", ServiceType::AppService),
            service("db", ServiceType::SqlDatabase),
        ];
        let edges = [
            private("e1", "api", "ghost"),
            private("e2", "db", "db"),
        ];

        let report = lint(&nodes, &edges);

        let flagged: Vec<_> = report
            .by_rule("unreferenced-node")
            .filter_map(Finding::node_id)
            .collect();
        assert_eq!(flagged, [id("api")]);
    }

    #[test]
    fn test_groups_are_never_unreferenced() {
        let nodes = [Node::group(id("rg"), "Prod", GroupType::ResourceGroup)];

        let report = lint(&nodes, &[]);

        assert!(report.findings().is_empty());
    }

    #[test]
    fn test_presence_rules() {
        let nodes = [
            service("api", ServiceType::AppService),
            service("logs", ServiceType::LogAnalytics),
        ];
        let edges = [private("e1", "api", "logs")];

        let report = lint(&nodes, &edges);
        let ids = rule_ids(&report);

        assert!(!ids.contains(&"missing-observability"));
        assert!(ids.contains(&"missing-secrets-store"));
        assert!(ids.contains(&"missing-identity"));
        assert!(ids.contains(&"missing-network-boundary"));
        // Without a vault there is nothing to link to.
        assert!(!ids.contains(&"compute-secrets-link"));
    }

    #[test]
    fn test_compute_without_vault_link() {
        let nodes = [
            service("api", ServiceType::AppService),
            service("worker", ServiceType::FunctionApp),
            service("vault", ServiceType::KeyVault),
        ];
        let edges = [private("e1", "vault", "api")];

        let report = lint(&nodes, &edges);

        let flagged: Vec<_> = report
            .by_rule("compute-secrets-link")
            .filter_map(Finding::node_id)
            .collect();
        assert_eq!(flagged, [id("worker")]);
    }

    #[test]
    fn test_public_exposure_of_sensitive_service() {
        let nodes = [
            service("api", ServiceType::AppService),
            service("db", ServiceType::SqlDatabase),
            service("cache", ServiceType::RedisCache),
        ];
        let edges = [
            Edge::new(id("e1"), id("api"), id("db")).with_encrypted(true),
            private("e2", "api", "cache"),
        ];

        let report = lint(&nodes, &edges);

        let exposed: Vec<_> = report.by_rule("public-exposure").collect();
        assert_eq!(exposed.len(), 1);
        assert_eq!(exposed[0].node_id(), Some(id("db")));
        assert_eq!(exposed[0].severity(), Severity::Critical);
        assert_eq!(report.by_rule("unencrypted-public-connection").count(), 0);
        assert!(!report.passed());
    }

    #[test]
    fn test_unencrypted_public_connection() {
        let nodes = [
            service("gw", ServiceType::FrontDoor),
            service("api", ServiceType::AppService),
        ];
        let edges = [Edge::new(id("e1"), id("gw"), id("api"))];

        let report = lint(&nodes, &edges);

        let plain: Vec<_> = report.by_rule("unencrypted-public-connection").collect();
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].node_id(), Some(id("api")));
        assert_eq!(plain[0].title(), "Unencrypted public connection from 'gw' to 'api'");
    }

    #[test]
    fn test_network_segmentation_counts_nested_subnets() {
        let nodes = [
            Node::group(id("rg"), "Prod", GroupType::ResourceGroup),
            Node::group(id("hub"), "Hub", GroupType::VirtualNetwork).with_parent(id("rg")),
            Node::group(id("web"), "Web", GroupType::Subnet).with_parent(id("hub")),
            Node::group(id("data"), "Data", GroupType::Subnet).with_parent(id("hub")),
            Node::group(id("spoke"), "Spoke", GroupType::VirtualNetwork),
            Node::group(id("only"), "Only", GroupType::Subnet).with_parent(id("spoke")),
        ];

        let report = lint(&nodes, &[]);

        let flagged: Vec<_> = report
            .by_rule("network-segmentation")
            .filter_map(Finding::node_id)
            .collect();
        assert_eq!(flagged, [id("spoke")]);
        assert_eq!(report.by_rule("missing-network-boundary").count(), 0);
    }

    #[test]
    fn test_single_instance_needs_explicit_config() {
        let nodes = [
            service("sketch", ServiceType::AppService),
            service("single", ServiceType::AppService)
                .with_config(ServiceConfig::new().with("tier", "s1").with("instances", 1u32)),
            service("pair", ServiceType::AppService)
                .with_config(ServiceConfig::new().with("tier", "s1").with("instances", 2u32)),
        ];

        let report = lint(&nodes, &[]);

        let flagged: Vec<_> = report
            .by_rule("single-instance-compute")
            .filter_map(Finding::node_id)
            .collect();
        assert_eq!(flagged, [id("single")]);
    }

    #[test]
    fn test_budget_exceeded() {
        let config = AppConfig::default()
            .with_monthly_budget(100.0)
            .lint()
            .clone();
        let linter = Linter::new(config);
        let nodes = [service("api", ServiceType::AppService)];
        let summary = CostSummary::new(150.0, Default::default(), Default::default());

        let report = linter.lint(&nodes, &[], &summary);

        assert_eq!(report.by_rule("budget-exceeded").count(), 1);

        let within = CostSummary::new(90.0, Default::default(), Default::default());
        let report = linter.lint(&nodes, &[], &within);
        assert_eq!(report.by_rule("budget-exceeded").count(), 0);
    }

    #[test]
    fn test_dominant_cost_uses_node_costs() {
        let mut graph = skyplan_core::diagram::DiagramGraph::new();
        graph
            .add_batch(
                vec![
                    service("vm", ServiceType::VirtualMachine).with_config(
                        ServiceConfig::new().with("size", "d4s-v5").with("count", 4u32),
                    ),
                    service("vault", ServiceType::KeyVault),
                ],
                vec![],
            )
            .expect("valid batch");
        crate::pricing::summarize(&graph, "eastus").apply_to(&mut graph);

        let report = Linter::new(LintConfig::default()).lint(
            graph.nodes(),
            graph.edges(),
            graph.cost_summary(),
        );

        let flagged: Vec<_> = report
            .by_rule("dominant-cost")
            .filter_map(Finding::node_id)
            .collect();
        assert_eq!(flagged, [id("vm")]);
    }

    #[test]
    fn test_description_rules() {
        let nodes = [
            service("short", ServiceType::AppService).with_property("description", "Web app"),
            service("plain", ServiceType::AppService)
                .with_property("description", "Serves the public product catalogue pages"),
            service("secure", ServiceType::AppService).with_property(
                "description",
                "Order API, authenticates callers with Entra ID tokens",
            ),
            service("silent", ServiceType::AppService),
        ];

        let report = lint(&nodes, &[]);

        let short: Vec<_> = report
            .by_rule("description-too-short")
            .filter_map(Finding::node_id)
            .collect();
        assert_eq!(short, [id("short")]);

        let missing: Vec<_> = report
            .by_rule("description-missing-security-context")
            .filter_map(Finding::node_id)
            .collect();
        assert_eq!(missing, [id("plain")]);
    }
}
