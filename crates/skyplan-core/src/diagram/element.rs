//! Diagram elements: service and group nodes, and the edges between them.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    diagram::{ServiceConfig, ServiceType},
    geometry::{Point, Size},
    identifier::Id,
};

/// Container kind of a group node.
///
/// Groups nest strictly: a resource group holds virtual networks, which hold
/// subnets. [`GroupType::rank`] encodes that order; a higher rank nests deeper.
/// Unknown names read from a document become [`GroupType::ResourceGroup`],
/// the generic container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupType {
    #[default]
    ResourceGroup,
    VirtualNetwork,
    Subnet,
}

impl GroupType {
    /// Nesting rank: `resource-group` = 0, `virtual-network` = 1, `subnet` = 2
    pub fn rank(self) -> u8 {
        match self {
            Self::ResourceGroup => 0,
            Self::VirtualNetwork => 1,
            Self::Subnet => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResourceGroup => "resource-group",
            Self::VirtualNetwork => "virtual-network",
            Self::Subnet => "subnet",
        }
    }
}

impl FromStr for GroupType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "virtual-network" | "vnet" => Self::VirtualNetwork,
            "subnet" => Self::Subnet,
            _ => Self::ResourceGroup,
        })
    }
}

impl From<String> for GroupType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(group_type) => group_type,
            Err(never) => match never {},
        }
    }
}

impl From<GroupType> for String {
    fn from(value: GroupType) -> Self {
        value.as_str().to_string()
    }
}

/// Lifecycle status of a node as shown on the canvas.
///
/// Unknown names read from a document become [`NodeStatus::Planned`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeStatus {
    #[default]
    Planned,
    Deployed,
    Degraded,
    Retired,
}

impl NodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Deployed => "deployed",
            Self::Degraded => "degraded",
            Self::Retired => "retired",
        }
    }
}

impl From<String> for NodeStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "deployed" => Self::Deployed,
            "degraded" => Self::Degraded,
            "retired" => Self::Retired,
            _ => Self::Planned,
        }
    }
}

impl From<NodeStatus> for String {
    fn from(value: NodeStatus) -> Self {
        value.as_str().to_string()
    }
}

/// What a node is: a priced service or a container group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeKind {
    Service {
        #[serde(rename = "serviceType")]
        service_type: ServiceType,
    },
    Group {
        #[serde(rename = "groupType")]
        group_type: GroupType,
        #[serde(default)]
        width: f32,
        #[serde(default)]
        height: f32,
    },
}

/// A node of the diagram.
///
/// `position` is absolute for root nodes and relative to the parent's origin
/// for nodes with a `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: Id,
    #[serde(flatten)]
    kind: NodeKind,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: NodeStatus,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<Id>,
    #[serde(default)]
    position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<ServiceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monthly_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sku: Option<String>,
}

impl Node {
    fn new(id: Id, kind: NodeKind, name: &str) -> Self {
        Self {
            id,
            kind,
            name: name.to_string(),
            status: NodeStatus::default(),
            properties: BTreeMap::new(),
            parent_id: None,
            position: Point::default(),
            config: None,
            monthly_cost: None,
            sku: None,
        }
    }

    /// Creates a service node.
    ///
    /// # Examples
    ///
    /// ```
    /// use skyplan_core::{diagram::{Node, ServiceType}, identifier::Id};
    ///
    /// let api = Node::service(Id::new("api"), "Orders API", ServiceType::AppService);
    /// assert_eq!(api.service_type(), Some(ServiceType::AppService));
    /// assert!(!api.is_group());
    /// ```
    pub fn service(id: Id, name: &str, service_type: ServiceType) -> Self {
        Self::new(id, NodeKind::Service { service_type }, name)
    }

    /// Creates a group node with zero size; layout assigns the real box.
    pub fn group(id: Id, name: &str, group_type: GroupType) -> Self {
        Self::new(
            id,
            NodeKind::Group {
                group_type,
                width: 0.0,
                height: 0.0,
            },
            name,
        )
    }

    pub fn with_parent(mut self, parent: Id) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.set_size(size);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Free-text description from the property bag
    pub fn description(&self) -> Option<&str> {
        self.property("description")
    }

    pub fn parent_id(&self) -> Option<Id> {
        self.parent_id
    }

    /// Position relative to the parent, or absolute for root nodes
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn config(&self) -> Option<&ServiceConfig> {
        self.config.as_ref()
    }

    pub fn monthly_cost(&self) -> Option<f64> {
        self.monthly_cost
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        match self.kind {
            NodeKind::Service { service_type } => Some(service_type),
            NodeKind::Group { .. } => None,
        }
    }

    pub fn group_type(&self) -> Option<GroupType> {
        match self.kind {
            NodeKind::Group { group_type, .. } => Some(group_type),
            NodeKind::Service { .. } => None,
        }
    }

    /// Stored group dimensions; `None` for services.
    pub fn size(&self) -> Option<Size> {
        match self.kind {
            NodeKind::Group { width, height, .. } => Some(Size::new(width, height)),
            NodeKind::Service { .. } => None,
        }
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Id>) {
        self.parent_id = parent;
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        if let NodeKind::Group { width, height, .. } = &mut self.kind {
            *width = size.width();
            *height = size.height();
        }
    }

    pub(crate) fn properties_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.properties
    }

    pub(crate) fn set_config(&mut self, config: Option<ServiceConfig>) {
        self.config = config;
    }

    pub(crate) fn set_pricing(&mut self, monthly_cost: Option<f64>, sku: Option<String>) {
        self.monthly_cost = monthly_cost;
        self.sku = sku;
    }
}

/// How an edge connects its endpoints on the network level.
///
/// Unrecognized values coerce to [`ConnectionType::Public`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionType {
    #[default]
    Public,
    PrivateEndpoint,
    VnetIntegration,
    ServiceEndpoint,
    Peering,
}

impl ConnectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::PrivateEndpoint => "private-endpoint",
            Self::VnetIntegration => "vnet-integration",
            Self::ServiceEndpoint => "service-endpoint",
            Self::Peering => "peering",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "private-endpoint" => Self::PrivateEndpoint,
            "vnet-integration" => Self::VnetIntegration,
            "service-endpoint" => Self::ServiceEndpoint,
            "peering" => Self::Peering,
            _ => Self::Public,
        })
    }
}

impl From<String> for ConnectionType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(connection) => connection,
            Err(never) => match never {},
        }
    }
}

impl From<ConnectionType> for String {
    fn from(value: ConnectionType) -> Self {
        value.as_str().to_string()
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: Id,
    source: Id,
    target: Id,
    #[serde(default)]
    connection_type: ConnectionType,
    #[serde(default)]
    encrypted: bool,
}

impl Edge {
    pub fn new(id: Id, source: Id, target: Id) -> Self {
        Self {
            id,
            source,
            target,
            connection_type: ConnectionType::default(),
            encrypted: false,
        }
    }

    pub fn with_connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    pub fn encrypted(&self) -> bool {
        self.encrypted
    }

    /// Returns `true` if `node` is either endpoint
    pub fn touches(&self, node: Id) -> bool {
        self.source == node || self.target == node
    }

    /// The opposite endpoint of `node`, if `node` is an endpoint
    pub fn other_end(&self, node: Id) -> Option<Id> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_rank_order() {
        assert!(GroupType::ResourceGroup.rank() < GroupType::VirtualNetwork.rank());
        assert!(GroupType::VirtualNetwork.rank() < GroupType::Subnet.rank());
    }

    #[test]
    fn test_unknown_status_coerces_to_planned() {
        let node: Node = serde_json::from_str(
            r#"{"id":"api","kind":"service","serviceType":"app-service","status":"running"}"#,
        )
        .unwrap();
        assert_eq!(node.status(), NodeStatus::Planned);

        let node: Node = serde_json::from_str(
            r#"{"id":"api","kind":"service","serviceType":"app-service","status":"Retired"}"#,
        )
        .unwrap();
        assert_eq!(node.status(), NodeStatus::Retired);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["status"], "retired");
    }

    #[test]
    fn test_unknown_group_type_coerces_to_resource_group() {
        let node: Node = serde_json::from_str(
            r#"{"id":"zone","kind":"group","groupType":"availability-zone"}"#,
        )
        .unwrap();
        assert_eq!(node.group_type(), Some(GroupType::ResourceGroup));

        let node: Node =
            serde_json::from_str(r#"{"id":"hub","kind":"group","groupType":"vnet"}"#).unwrap();
        assert_eq!(node.group_type(), Some(GroupType::VirtualNetwork));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["groupType"], "virtual-network");
    }

    #[test]
    fn test_connection_type_coercion() {
        let edge: Edge = serde_json::from_str(
            r#"{"id":"e1","source":"a","target":"b","connectionType":"carrier-pigeon"}"#,
        )
        .unwrap();
        assert_eq!(edge.connection_type(), ConnectionType::Public);

        let edge: Edge =
            serde_json::from_str(r#"{"id":"e2","source":"a","target":"b"}"#).unwrap();
        assert_eq!(edge.connection_type(), ConnectionType::Public);
        assert!(!edge.encrypted());
    }

    #[test]
    fn test_node_document_shape() {
        let json = r#"{
            "id": "subnet-app",
            "kind": "group",
            "groupType": "subnet",
            "width": 320,
            "height": 200,
            "parentId": "vnet",
            "position": {"x": 40, "y": 72}
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.group_type(), Some(GroupType::Subnet));
        assert_eq!(node.size(), Some(Size::new(320.0, 200.0)));
        assert_eq!(node.parent_id(), Some(Id::new("vnet")));
        assert_eq!(node.position(), Point::new(40.0, 72.0));
        assert_eq!(node.status(), NodeStatus::Planned);
    }

    #[test]
    fn test_service_node_document_shape() {
        let json = r#"{"id":"cache","kind":"service","serviceType":"redis-cache","name":"Cache"}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.service_type(), Some(ServiceType::RedisCache));
        assert!(node.size().is_none());
    }

    #[test]
    fn test_edge_other_end() {
        let edge = Edge::new(Id::new("e"), Id::new("a"), Id::new("b"));
        assert_eq!(edge.other_end(Id::new("a")), Some(Id::new("b")));
        assert_eq!(edge.other_end(Id::new("c")), None);
        assert!(edge.touches(Id::new("b")));
    }
}
