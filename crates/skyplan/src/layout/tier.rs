//! Architectural tiers.
//!
//! A tier is the lane a service is placed in. Lanes read from the outside of
//! a system inwards: security and identity first, then networking, compute
//! and integration, data, analytics, and finally management tooling.

use skyplan_core::diagram::{Category, ServiceType};

/// Zero-based lane index. Lower tiers come first in the layout direction.
pub type Tier = u8;

/// Tier used for categories with no natural lane.
pub const DEFAULT_TIER: Tier = 2;

/// Returns the tier of a service category.
pub fn tier_of_category(category: Category) -> Tier {
    match category {
        Category::Security | Category::Identity => 0,
        Category::Networking => 1,
        Category::Compute | Category::Integration => 2,
        Category::Data | Category::Storage => 3,
        Category::Ai | Category::Analytics => 4,
        Category::Management => 5,
        Category::Other => DEFAULT_TIER,
    }
}

/// Returns the tier of a service type.
pub fn tier_of(service_type: ServiceType) -> Tier {
    tier_of_category(service_type.category())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert_eq!(tier_of(ServiceType::KeyVault), 0);
        assert_eq!(tier_of(ServiceType::EntraId), 0);
        assert_eq!(tier_of(ServiceType::ApplicationGateway), 1);
        assert_eq!(tier_of(ServiceType::AppService), 2);
        assert_eq!(tier_of(ServiceType::ServiceBus), 2);
        assert_eq!(tier_of(ServiceType::SqlDatabase), 3);
        assert_eq!(tier_of(ServiceType::StorageAccount), 3);
        assert_eq!(tier_of(ServiceType::OpenAi), 4);
        assert_eq!(tier_of(ServiceType::LogAnalytics), 5);
    }

    #[test]
    fn test_unknown_service_falls_back_to_compute_lane() {
        assert_eq!(tier_of(ServiceType::Unknown), DEFAULT_TIER);
        assert_eq!(tier_of_category(Category::Other), DEFAULT_TIER);
    }

    #[test]
    fn test_every_service_type_has_a_tier() {
        for service_type in ServiceType::ALL {
            assert!(tier_of(service_type) <= 5);
        }
    }
}
