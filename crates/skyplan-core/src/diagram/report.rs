//! Derived state stored alongside the graph: cost summary and lint findings.
//!
//! Both are always recomputed from the graph and replaced wholesale, never
//! edited in place.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{diagram::ServiceType, identifier::Id};

/// Aggregated monthly cost of a diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    #[serde(default)]
    total: f64,
    #[serde(default)]
    by_service_type: IndexMap<ServiceType, f64>,
    #[serde(default)]
    by_group: IndexMap<Id, f64>,
}

impl CostSummary {
    pub fn new(
        total: f64,
        by_service_type: IndexMap<ServiceType, f64>,
        by_group: IndexMap<Id, f64>,
    ) -> Self {
        Self {
            total,
            by_service_type,
            by_group,
        }
    }

    /// Total monthly figure over every priced service
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn by_service_type(&self) -> &IndexMap<ServiceType, f64> {
        &self.by_service_type
    }

    /// Monthly cost attributed to each owning group
    pub fn by_group(&self) -> &IndexMap<Id, f64> {
        &self.by_group
    }
}

/// Severity of a lint finding, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(text)
    }
}

/// Architecture quality pillar a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pillar {
    Security,
    Reliability,
    CostOptimization,
    OperationalExcellence,
    PerformanceEfficiency,
}

/// One output record of the architecture linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    rule: String,
    pillar: Pillar,
    severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node_id: Option<Id>,
    title: String,
    description: String,
    recommendation: String,
}

impl Finding {
    pub fn new(rule: &str, pillar: Pillar, severity: Severity, title: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            pillar,
            severity,
            node_id: None,
            title: title.into(),
            description: String::new(),
            recommendation: String::new(),
        }
    }

    pub fn with_node(mut self, node_id: Id) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    /// Stable identifier of the rule that produced the finding
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn pillar(&self) -> Pillar {
        self.pillar
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn node_id(&self) -> Option<Id> {
        self.node_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }
}
