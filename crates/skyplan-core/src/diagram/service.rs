//! Service catalog: the closed set of service types a diagram can contain.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Functional category of a service.
///
/// Categories drive tier placement during layout and several lint rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Security,
    Identity,
    Networking,
    Compute,
    Integration,
    Data,
    Storage,
    Ai,
    Analytics,
    Management,
    Other,
}

/// A cloud service type.
///
/// Serialized as its kebab-case name. Names that are not part of the catalog
/// deserialize to [`ServiceType::Unknown`] rather than failing, so documents
/// written by newer collaborators still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    KeyVault,
    Firewall,
    EntraId,
    ManagedIdentity,
    ApplicationGateway,
    FrontDoor,
    LoadBalancer,
    VpnGateway,
    PrivateEndpoint,
    DnsZone,
    AppService,
    FunctionApp,
    VirtualMachine,
    KubernetesService,
    ContainerApps,
    ApiManagement,
    ServiceBus,
    EventHubs,
    LogicApps,
    SqlDatabase,
    CosmosDb,
    PostgreSql,
    RedisCache,
    StorageAccount,
    OpenAi,
    AiSearch,
    Databricks,
    Synapse,
    ApplicationInsights,
    LogAnalytics,
    Unknown,
}

impl ServiceType {
    /// Every catalog entry, in catalog order.
    pub const ALL: [ServiceType; 31] = [
        Self::KeyVault,
        Self::Firewall,
        Self::EntraId,
        Self::ManagedIdentity,
        Self::ApplicationGateway,
        Self::FrontDoor,
        Self::LoadBalancer,
        Self::VpnGateway,
        Self::PrivateEndpoint,
        Self::DnsZone,
        Self::AppService,
        Self::FunctionApp,
        Self::VirtualMachine,
        Self::KubernetesService,
        Self::ContainerApps,
        Self::ApiManagement,
        Self::ServiceBus,
        Self::EventHubs,
        Self::LogicApps,
        Self::SqlDatabase,
        Self::CosmosDb,
        Self::PostgreSql,
        Self::RedisCache,
        Self::StorageAccount,
        Self::OpenAi,
        Self::AiSearch,
        Self::Databricks,
        Self::Synapse,
        Self::ApplicationInsights,
        Self::LogAnalytics,
        Self::Unknown,
    ];

    /// Kebab-case name used in documents
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeyVault => "key-vault",
            Self::Firewall => "firewall",
            Self::EntraId => "entra-id",
            Self::ManagedIdentity => "managed-identity",
            Self::ApplicationGateway => "application-gateway",
            Self::FrontDoor => "front-door",
            Self::LoadBalancer => "load-balancer",
            Self::VpnGateway => "vpn-gateway",
            Self::PrivateEndpoint => "private-endpoint",
            Self::DnsZone => "dns-zone",
            Self::AppService => "app-service",
            Self::FunctionApp => "function-app",
            Self::VirtualMachine => "virtual-machine",
            Self::KubernetesService => "aks",
            Self::ContainerApps => "container-apps",
            Self::ApiManagement => "api-management",
            Self::ServiceBus => "service-bus",
            Self::EventHubs => "event-hubs",
            Self::LogicApps => "logic-apps",
            Self::SqlDatabase => "sql-database",
            Self::CosmosDb => "cosmos-db",
            Self::PostgreSql => "postgresql",
            Self::RedisCache => "redis-cache",
            Self::StorageAccount => "storage-account",
            Self::OpenAi => "openai",
            Self::AiSearch => "ai-search",
            Self::Databricks => "databricks",
            Self::Synapse => "synapse",
            Self::ApplicationInsights => "application-insights",
            Self::LogAnalytics => "log-analytics",
            Self::Unknown => "unknown",
        }
    }

    /// Human readable product name
    pub fn label(self) -> &'static str {
        match self {
            Self::KeyVault => "Key Vault",
            Self::Firewall => "Firewall",
            Self::EntraId => "Entra ID",
            Self::ManagedIdentity => "Managed Identity",
            Self::ApplicationGateway => "Application Gateway",
            Self::FrontDoor => "Front Door",
            Self::LoadBalancer => "Load Balancer",
            Self::VpnGateway => "VPN Gateway",
            Self::PrivateEndpoint => "Private Endpoint",
            Self::DnsZone => "DNS Zone",
            Self::AppService => "App Service",
            Self::FunctionApp => "Function App",
            Self::VirtualMachine => "Virtual Machine",
            Self::KubernetesService => "Kubernetes Service",
            Self::ContainerApps => "Container Apps",
            Self::ApiManagement => "API Management",
            Self::ServiceBus => "Service Bus",
            Self::EventHubs => "Event Hubs",
            Self::LogicApps => "Logic Apps",
            Self::SqlDatabase => "SQL Database",
            Self::CosmosDb => "Cosmos DB",
            Self::PostgreSql => "PostgreSQL",
            Self::RedisCache => "Cache for Redis",
            Self::StorageAccount => "Storage Account",
            Self::OpenAi => "OpenAI",
            Self::AiSearch => "AI Search",
            Self::Databricks => "Databricks",
            Self::Synapse => "Synapse Analytics",
            Self::ApplicationInsights => "Application Insights",
            Self::LogAnalytics => "Log Analytics",
            Self::Unknown => "Unknown Service",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::KeyVault | Self::Firewall => Category::Security,
            Self::EntraId | Self::ManagedIdentity => Category::Identity,
            Self::ApplicationGateway
            | Self::FrontDoor
            | Self::LoadBalancer
            | Self::VpnGateway
            | Self::PrivateEndpoint
            | Self::DnsZone => Category::Networking,
            Self::AppService
            | Self::FunctionApp
            | Self::VirtualMachine
            | Self::KubernetesService
            | Self::ContainerApps => Category::Compute,
            Self::ApiManagement | Self::ServiceBus | Self::EventHubs | Self::LogicApps => {
                Category::Integration
            }
            Self::SqlDatabase | Self::CosmosDb | Self::PostgreSql | Self::RedisCache => {
                Category::Data
            }
            Self::StorageAccount => Category::Storage,
            Self::OpenAi | Self::AiSearch => Category::Ai,
            Self::Databricks | Self::Synapse => Category::Analytics,
            Self::ApplicationInsights | Self::LogAnalytics => Category::Management,
            Self::Unknown => Category::Other,
        }
    }

    /// Services holding data or secrets that must never be reachable over a public connection
    pub fn is_sensitive(self) -> bool {
        matches!(
            self,
            Self::SqlDatabase
                | Self::CosmosDb
                | Self::PostgreSql
                | Self::RedisCache
                | Self::StorageAccount
                | Self::KeyVault
        )
    }

    pub fn is_compute(self) -> bool {
        self.category() == Category::Compute
    }

    pub fn is_secrets_store(self) -> bool {
        self == Self::KeyVault
    }

    pub fn is_identity(self) -> bool {
        self.category() == Category::Identity
    }

    pub fn is_observability(self) -> bool {
        matches!(self, Self::ApplicationInsights | Self::LogAnalytics)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = std::convert::Infallible;

    /// Parses a kebab-case service name. Unrecognized names map to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Ok(Self::ALL
            .into_iter()
            .find(|service| service.as_str() == name)
            .unwrap_or(Self::Unknown))
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(service) => service,
            Err(never) => match never {},
        }
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip_through_parse() {
        for service in ServiceType::ALL {
            let parsed: ServiceType = service.as_str().parse().unwrap();
            assert_eq!(parsed, service);
        }
    }

    #[test]
    fn test_unknown_name_coerces() {
        let parsed: ServiceType = "quantum-annealer".parse().unwrap();
        assert_eq!(parsed, ServiceType::Unknown);

        let json: ServiceType = serde_json::from_str("\"Redis-Cache\"").unwrap();
        assert_eq!(json, ServiceType::RedisCache);
    }

    #[test]
    fn test_categories() {
        assert_eq!(ServiceType::KeyVault.category(), Category::Security);
        assert_eq!(ServiceType::RedisCache.category(), Category::Data);
        assert_eq!(ServiceType::Unknown.category(), Category::Other);
        assert!(ServiceType::AppService.is_compute());
        assert!(ServiceType::StorageAccount.is_sensitive());
        assert!(!ServiceType::FrontDoor.is_sensitive());
    }
}
