use skyplan_core::diagram::ServiceType;

/// Flat monthly estimate for a typical small deployment of a service.
///
/// Used for service types without a descriptor.
pub fn flat_estimate(service: ServiceType) -> f64 {
    match service {
        ServiceType::KeyVault => 5.0,
        ServiceType::Firewall => 912.5,
        ServiceType::EntraId => 0.0,
        ServiceType::ManagedIdentity => 0.0,
        ServiceType::ApplicationGateway => 190.0,
        ServiceType::FrontDoor => 35.0,
        ServiceType::LoadBalancer => 18.25,
        ServiceType::VpnGateway => 138.7,
        ServiceType::PrivateEndpoint => 7.3,
        ServiceType::DnsZone => 0.5,
        ServiceType::AppService => 54.75,
        ServiceType::FunctionApp => 5.0,
        ServiceType::VirtualMachine => 70.08,
        ServiceType::KubernetesService => 420.48,
        ServiceType::ContainerApps => 50.0,
        ServiceType::ApiManagement => 48.04,
        ServiceType::ServiceBus => 10.0,
        ServiceType::EventHubs => 11.16,
        ServiceType::LogicApps => 10.0,
        ServiceType::SqlDatabase => 14.72,
        ServiceType::CosmosDb => 24.0,
        ServiceType::PostgreSql => 124.1,
        ServiceType::RedisCache => 101.47,
        ServiceType::StorageAccount => 20.0,
        ServiceType::OpenAi => 50.0,
        ServiceType::AiSearch => 73.73,
        ServiceType::Databricks => 400.0,
        ServiceType::Synapse => 800.0,
        ServiceType::ApplicationInsights => 10.0,
        ServiceType::LogAnalytics => 25.0,
        ServiceType::Unknown => 25.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimates_are_non_negative() {
        for service in ServiceType::ALL {
            assert!(flat_estimate(service) >= 0.0, "{service}");
        }
    }
}
