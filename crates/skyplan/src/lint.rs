//! Architecture linter.
//!
//! A fixed, ordered battery of rules runs over the services, groups and
//! edges of a diagram together with its cost summary. Every rule runs on
//! every invocation and findings are concatenated in rule order.
//!
//! ## Rules
//!
//! | id | pillar | severity |
//! |----|--------|----------|
//! | `unreferenced-node` | operational excellence | warning |
//! | `missing-observability` | operational excellence | warning |
//! | `missing-secrets-store` | security | warning |
//! | `missing-identity` | security | info |
//! | `compute-secrets-link` | security | warning |
//! | `public-exposure` | security | critical |
//! | `unencrypted-public-connection` | security | warning |
//! | `missing-network-boundary` | security | info |
//! | `network-segmentation` | security | warning |
//! | `single-instance-compute` | reliability | warning |
//! | `budget-exceeded` | cost optimization | warning |
//! | `dominant-cost` | cost optimization | info |
//! | `description-too-short` | operational excellence | info |
//! | `description-missing-security-context` | security | info |
//!
//! Edges whose endpoints do not both resolve to a node take no part in any
//! rule.

mod rules;

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

use skyplan_core::{
    diagram::{CostSummary, Edge, Finding, Node, Severity},
    identifier::Id,
};

use crate::config::LintConfig;

/// Findings of one lint run with the derived score.
///
/// The score and pass flag are a display aid; the findings are what matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    findings: Vec<Finding>,
    score: u32,
    passed: bool,
}

impl LintReport {
    fn new(findings: Vec<Finding>) -> Self {
        let criticals = count(&findings, Severity::Critical);
        let warnings = count(&findings, Severity::Warning);
        let penalty = 20 * criticals + 5 * warnings;

        Self {
            score: 100u32.saturating_sub(penalty),
            passed: criticals == 0 && warnings <= 2,
            findings,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// `100 - 20 * criticals - 5 * warnings`, floored at zero
    pub fn score(&self) -> u32 {
        self.score
    }

    /// No criticals and at most two warnings
    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn count(&self, severity: Severity) -> u32 {
        count(&self.findings, severity)
    }

    /// Findings produced by one rule.
    pub fn by_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings
            .iter()
            .filter(move |finding| finding.rule() == rule)
    }
}

fn count(findings: &[Finding], severity: Severity) -> u32 {
    findings
        .iter()
        .filter(|finding| finding.severity() == severity)
        .count() as u32
}

/// Read-only view of the diagram shared by every rule.
struct LintContext<'a> {
    services: Vec<&'a Node>,
    groups: Vec<&'a Node>,
    /// Edges whose endpoints both resolve
    edges: Vec<&'a Edge>,
    parents: IndexMap<Id, Id>,
    summary: &'a CostSummary,
    config: &'a LintConfig,
}

impl<'a> LintContext<'a> {
    fn new(
        nodes: Vec<&'a Node>,
        edges: Vec<&'a Edge>,
        summary: &'a CostSummary,
        config: &'a LintConfig,
    ) -> Self {
        let (groups, services): (Vec<&Node>, Vec<&Node>) =
            nodes.into_iter().partition(|node| node.is_group());
        let known: HashSet<Id> = services.iter().chain(&groups).map(|node| node.id()).collect();
        let edges = edges
            .into_iter()
            .filter(|edge| known.contains(&edge.source()) && known.contains(&edge.target()))
            .collect();
        let parents = services
            .iter()
            .chain(&groups)
            .filter_map(|node| node.parent_id().map(|parent| (node.id(), parent)))
            .filter(|(_, parent)| known.contains(parent))
            .collect();

        Self {
            services,
            groups,
            edges,
            parents,
            summary,
            config,
        }
    }

    fn has_service(&self, predicate: impl Fn(&Node) -> bool) -> bool {
        self.services.iter().any(|node| predicate(node))
    }

    fn node(&self, id: Id) -> Option<&'a Node> {
        self.services
            .iter()
            .chain(&self.groups)
            .find(|node| node.id() == id)
            .copied()
    }

    /// Resolved edges touching `id`.
    fn edges_of(&self, id: Id) -> impl Iterator<Item = &'a Edge> + '_ {
        self.edges.iter().copied().filter(move |edge| edge.touches(id))
    }

    /// Returns `true` if `ancestor` encloses `id`, directly or transitively.
    fn is_descendant(&self, id: Id, ancestor: Id) -> bool {
        let mut current = id;
        for _ in 0..=self.parents.len() {
            match self.parents.get(&current) {
                Some(parent) if *parent == ancestor => return true,
                Some(parent) => current = *parent,
                None => return false,
            }
        }
        false
    }
}

/// Evaluates the rule battery.
pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Lints a diagram given its nodes (services and groups), its edges and
    /// its current cost summary.
    pub fn lint<'a, N, E>(&self, nodes: N, edges: E, summary: &CostSummary) -> LintReport
    where
        N: IntoIterator<Item = &'a Node>,
        E: IntoIterator<Item = &'a Edge>,
    {
        let nodes: Vec<&Node> = nodes.into_iter().collect();
        let edges: Vec<&Edge> = edges.into_iter().collect();
        let context = LintContext::new(nodes, edges, summary, &self.config);

        let mut findings = Vec::new();
        for (id, rule) in rules::RULES {
            let produced = rule(&context);
            debug!(rule = *id, count = produced.len(); "Rule evaluated");
            findings.extend(produced);
        }

        let report = LintReport::new(findings);
        info!(
            findings = report.findings().len(),
            score = report.score(),
            passed = report.passed();
            "Lint completed"
        );
        report
    }
}
