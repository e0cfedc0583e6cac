//! The [`DiagramGraph`] aggregate and its document form.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    diagram::{CostSummary, Edge, Finding, Node, ServiceConfig, ViewMode},
    error::GraphError,
    geometry::{Point, Size},
    identifier::Id,
};

/// What happens to the children of a removed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    /// Remove the node together with every descendant.
    Cascade,
    /// Move direct children to the removed node's parent, keeping their
    /// absolute positions.
    Reparent,
}

/// Node/edge/group model shared by every computation.
///
/// Nodes keep insertion order. Every structural mutation advances
/// [`DiagramGraph::version`]; replacing derived state (costs, findings) does
/// not.
///
/// Edges whose endpoints do not resolve are kept as stored but ignored by
/// computations; see [`DiagramGraph::resolved_edges`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "DiagramDocument", into = "DiagramDocument")]
pub struct DiagramGraph {
    nodes: IndexMap<Id, Node>,
    edges: Vec<Edge>,
    view_mode: ViewMode,
    version: u64,
    cost_summary: CostSummary,
    findings: Vec<Finding>,
}

impl DiagramGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic counter of structural changes
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        if self.view_mode != view_mode {
            self.view_mode = view_mode;
            self.bump();
        }
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn services(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| !node.is_group())
    }

    pub fn groups(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| node.is_group())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: Id) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id() == id)
    }

    /// Edges whose source and target both exist
    pub fn resolved_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| {
            self.nodes.contains_key(&edge.source()) && self.nodes.contains_key(&edge.target())
        })
    }

    /// Direct children of a node, in insertion order
    pub fn children(&self, id: Id) -> impl Iterator<Item = &Node> {
        self.nodes
            .values()
            .filter(move |node| node.parent_id() == Some(id))
    }

    pub fn cost_summary(&self) -> &CostSummary {
        &self.cost_summary
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Adds a single node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if the id is taken.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id()) {
            return Err(GraphError::DuplicateNode(node.id()));
        }
        self.nodes.insert(node.id(), node);
        self.bump();
        Ok(())
    }

    /// Adds a single edge. Endpoints are not required to exist.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateEdge`] if the id is taken.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edge(edge.id()).is_some() {
            return Err(GraphError::DuplicateEdge(edge.id()));
        }
        self.edges.push(edge);
        self.bump();
        Ok(())
    }

    /// Adds many nodes and edges as one change.
    ///
    /// Either everything is added and the version advances once, or nothing
    /// is added.
    ///
    /// # Errors
    ///
    /// Returns a duplicate error if any id collides with the graph or with
    /// another item of the batch.
    pub fn add_batch(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<(), GraphError> {
        let mut node_ids = HashSet::new();
        for node in &nodes {
            if self.nodes.contains_key(&node.id()) || !node_ids.insert(node.id()) {
                return Err(GraphError::DuplicateNode(node.id()));
            }
        }
        let mut edge_ids = HashSet::new();
        for edge in &edges {
            if self.edge(edge.id()).is_some() || !edge_ids.insert(edge.id()) {
                return Err(GraphError::DuplicateEdge(edge.id()));
            }
        }

        debug!(nodes = nodes.len(), edges = edges.len(); "Applying batch");
        self.nodes
            .extend(nodes.into_iter().map(|node| (node.id(), node)));
        self.edges.extend(edges);
        self.bump();
        Ok(())
    }

    pub fn remove_edge(&mut self, id: Id) -> Result<Edge, GraphError> {
        let index = self
            .edges
            .iter()
            .position(|edge| edge.id() == id)
            .ok_or(GraphError::EdgeNotFound(id))?;
        let edge = self.edges.remove(index);
        self.bump();
        Ok(edge)
    }

    /// Removes a node and every edge referencing a removed node.
    ///
    /// Returns the removed nodes, the requested node first.
    pub fn remove_node(&mut self, id: Id, mode: RemovalMode) -> Result<Vec<Node>, GraphError> {
        let removed = self
            .nodes
            .shift_remove(&id)
            .ok_or(GraphError::NodeNotFound(id))?;

        let mut removed_ids = HashSet::from([id]);
        let mut removed_nodes = vec![removed];

        match mode {
            RemovalMode::Cascade => {
                let mut frontier = vec![id];
                while let Some(current) = frontier.pop() {
                    let children: Vec<Id> = self.children(current).map(Node::id).collect();
                    for child in children {
                        if !removed_ids.insert(child) {
                            continue;
                        }
                        if let Some(node) = self.nodes.shift_remove(&child) {
                            removed_nodes.push(node);
                            frontier.push(child);
                        }
                    }
                }
            }
            RemovalMode::Reparent => {
                let offset = removed_nodes[0].position();
                let new_parent = removed_nodes[0].parent_id();
                for node in self.nodes.values_mut() {
                    if node.parent_id() == Some(id) {
                        node.set_parent(new_parent);
                        node.set_position(node.position().add_point(offset));
                    }
                }
            }
        }

        self.edges.retain(|edge| {
            !removed_ids.contains(&edge.source()) && !removed_ids.contains(&edge.target())
        });
        self.bump();
        Ok(removed_nodes)
    }

    /// Moves a node. `position` is relative to the node's parent.
    pub fn update_position(&mut self, id: Id, position: Point) -> Result<(), GraphError> {
        self.node_mut(id)?.set_position(position);
        self.bump();
        Ok(())
    }

    /// Merges entries into the node's property bag.
    pub fn update_properties<I>(&mut self, id: Id, properties: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.node_mut(id)?.properties_mut().extend(properties);
        self.bump();
        Ok(())
    }

    /// Replaces the pricing configuration of a node.
    pub fn set_config(&mut self, id: Id, config: Option<ServiceConfig>) -> Result<(), GraphError> {
        self.node_mut(id)?.set_config(config);
        self.bump();
        Ok(())
    }

    /// Moves a node under a new parent (or to the root), keeping its absolute
    /// position on the canvas.
    ///
    /// # Errors
    ///
    /// Fails if either node is missing or if the move would make the node an
    /// ancestor of itself.
    pub fn set_parent(&mut self, id: Id, parent: Option<Id>) -> Result<(), GraphError> {
        let absolute = self
            .absolute_position(id)
            .ok_or(GraphError::NodeNotFound(id))?;

        let origin = match parent {
            Some(parent_id) => {
                if !self.nodes.contains_key(&parent_id) {
                    return Err(GraphError::InvalidParent {
                        node: id,
                        parent: parent_id,
                    });
                }
                if parent_id == id || self.ancestors(parent_id).contains(&id) {
                    return Err(GraphError::ParentCycle {
                        node: id,
                        parent: parent_id,
                    });
                }
                self.absolute_position(parent_id).unwrap_or_default()
            }
            None => Point::default(),
        };

        let node = self.node_mut(id)?;
        node.set_parent(parent);
        node.set_position(absolute.sub_point(origin));
        self.bump();
        Ok(())
    }

    /// Ancestor chain of a node, nearest first.
    ///
    /// The walk stops at a missing parent or at a repeated id, so malformed
    /// documents with parent cycles still terminate.
    pub fn ancestors(&self, id: Id) -> Vec<Id> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.nodes.get(&id).and_then(Node::parent_id);

        while let Some(parent) = current {
            if !seen.insert(parent) {
                break;
            }
            let Some(node) = self.nodes.get(&parent) else {
                break;
            };
            chain.push(parent);
            current = node.parent_id();
        }
        chain
    }

    /// Absolute canvas position: the node's own position plus the positions
    /// of every ancestor.
    pub fn absolute_position(&self, id: Id) -> Option<Point> {
        let node = self.nodes.get(&id)?;
        Some(
            self.ancestors(id)
                .into_iter()
                .filter_map(|ancestor| self.nodes.get(&ancestor))
                .fold(node.position(), |acc, ancestor| {
                    acc.add_point(ancestor.position())
                }),
        )
    }

    /// Writes computed positions and group sizes back in a single change.
    ///
    /// Ids that do not exist are skipped.
    pub fn apply_layout(
        &mut self,
        positions: &IndexMap<Id, Point>,
        group_sizes: &IndexMap<Id, Size>,
    ) {
        for (id, position) in positions {
            if let Some(node) = self.nodes.get_mut(id) {
                node.set_position(*position);
            }
        }
        for (id, size) in group_sizes {
            if let Some(node) = self.nodes.get_mut(id) {
                node.set_size(*size);
            }
        }
        self.bump();
    }

    /// Replaces the cost summary and the per-node cost/SKU.
    ///
    /// Nodes missing from `node_costs` have their derived pricing cleared.
    pub fn replace_costs(
        &mut self,
        summary: CostSummary,
        node_costs: &IndexMap<Id, (f64, Option<String>)>,
    ) {
        for (id, node) in self.nodes.iter_mut() {
            match node_costs.get(id) {
                Some((cost, sku)) => node.set_pricing(Some(*cost), sku.clone()),
                None => node.set_pricing(None, None),
            }
        }
        self.cost_summary = summary;
    }

    pub fn replace_findings(&mut self, findings: Vec<Finding>) {
        self.findings = findings;
    }

    /// Serializes the graph into its JSON document form.
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a graph from its JSON document form.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    fn node_mut(&mut self, id: Id) -> Result<&mut Node, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

/// Persisted/exported form of a [`DiagramGraph`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagramDocument {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    groups: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    view_mode: ViewMode,
    #[serde(default)]
    cost_summary: CostSummary,
    #[serde(default)]
    validation_results: Vec<Finding>,
    #[serde(default)]
    version: u64,
}

impl From<DiagramDocument> for DiagramGraph {
    fn from(document: DiagramDocument) -> Self {
        let mut nodes = IndexMap::new();
        for node in document.groups.into_iter().chain(document.nodes) {
            if let Some(previous) = nodes.insert(node.id(), node) {
                warn!(id = previous.id().to_text(); "Duplicate node id in document, keeping the last one");
            }
        }

        Self {
            nodes,
            edges: document.edges,
            view_mode: document.view_mode,
            version: document.version,
            cost_summary: document.cost_summary,
            findings: document.validation_results,
        }
    }
}

impl From<DiagramGraph> for DiagramDocument {
    fn from(graph: DiagramGraph) -> Self {
        let (groups, nodes): (Vec<Node>, Vec<Node>) = graph.nodes.into_values().partition(Node::is_group);

        Self {
            nodes,
            groups,
            edges: graph.edges,
            view_mode: graph.view_mode,
            cost_summary: graph.cost_summary,
            validation_results: graph.findings,
            version: graph.version,
        }
    }
}
