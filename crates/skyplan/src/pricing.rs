//! Descriptor-driven cost model.
//!
//! Each priced service type has a [`Descriptor`] in the built-in catalog.
//! Service types without one are priced with a flat per-type estimate, so
//! [`price_service`] is total: every service gets a breakdown.
//!
//! All figures are monthly and scaled by the multiplier of the requested
//! region (see [`region_multiplier`]).

pub mod descriptor;

mod catalog;
mod fallback;
mod region;
mod summary;

pub use catalog::DESCRIPTORS;
pub use descriptor::{CostBreakdown, Descriptor, Field, LineItem};
pub use fallback::flat_estimate;
pub use region::{REGIONS, region_multiplier};
pub use summary::{PricedDiagram, summarize};

use skyplan_core::diagram::{ServiceConfig, ServiceType};

/// Returns the descriptor of a service type, if one is registered.
pub fn descriptor(service: ServiceType) -> Option<&'static Descriptor> {
    catalog::descriptor(service)
}

/// Every registered descriptor.
pub fn descriptors() -> &'static [&'static Descriptor] {
    DESCRIPTORS
}

/// Default configuration of a service type.
///
/// Service types priced by the flat estimate have no fields and get an
/// empty configuration.
pub fn default_config(service: ServiceType) -> ServiceConfig {
    descriptor(service).map_or_else(ServiceConfig::new, Descriptor::default_config)
}

/// Prices one service in a region.
///
/// A missing configuration prices the descriptor defaults.
pub fn price_service(
    service: ServiceType,
    config: Option<&ServiceConfig>,
    region: &str,
) -> CostBreakdown {
    let multiplier = region_multiplier(region);
    match descriptor(service) {
        Some(descriptor) => {
            let empty = ServiceConfig::new();
            descriptor.calculate_cost(config.unwrap_or(&empty), multiplier)
        }
        None => CostBreakdown::from_items(vec![LineItem::new(
            format!("{} (estimate)", service.label()),
            flat_estimate(service) * multiplier,
        )]),
    }
}

/// SKU label of a configured service, for service types with a descriptor.
pub fn derive_sku(service: ServiceType, config: Option<&ServiceConfig>) -> Option<String> {
    let descriptor = descriptor(service)?;
    let empty = ServiceConfig::new();
    descriptor.derive_sku(config.unwrap_or(&empty))
}

/// Fields currently shown for a configuration, in declaration order.
pub fn visible_fields(service: ServiceType, config: &ServiceConfig) -> Vec<&'static Field> {
    descriptor(service).map_or_else(Vec::new, |descriptor| descriptor.visible_fields(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_standard_c1_in_reference_region() {
        let config = ServiceConfig::new()
            .with("tier", "standard-c1")
            .with("shards", 1u32);

        let breakdown = price_service(ServiceType::RedisCache, Some(&config), "eastus");

        assert_eq!(breakdown.line_items().len(), 1);
        assert_eq!(breakdown.total(), 101.47);
    }

    #[test]
    fn test_region_scales_every_item() {
        let config = ServiceConfig::new().with("tier", "s1").with("instances", 2u32);

        let reference = price_service(ServiceType::AppService, Some(&config), "eastus");
        let europe = price_service(ServiceType::AppService, Some(&config), "westeurope");

        assert_eq!(reference.line_items().len(), europe.line_items().len());
        for (base, scaled) in reference.line_items().iter().zip(europe.line_items()) {
            assert_eq!(scaled.monthly_cost(), base.monthly_cost() * 1.1);
        }
    }

    #[test]
    fn test_unregistered_service_uses_flat_estimate() {
        let breakdown = price_service(ServiceType::Firewall, None, "eastus");

        assert_eq!(breakdown.line_items().len(), 1);
        assert_eq!(breakdown.line_items()[0].label(), "Firewall (estimate)");
        assert_eq!(breakdown.total(), flat_estimate(ServiceType::Firewall));
        assert!(derive_sku(ServiceType::Firewall, None).is_none());
        assert!(default_config(ServiceType::Firewall).is_empty());
    }

    #[test]
    fn test_missing_config_prices_defaults() {
        let defaults = default_config(ServiceType::SqlDatabase);

        assert_eq!(
            price_service(ServiceType::SqlDatabase, None, "eastus"),
            price_service(ServiceType::SqlDatabase, Some(&defaults), "eastus"),
        );
    }

    #[test]
    fn test_visible_fields_for_unregistered_service() {
        assert!(visible_fields(ServiceType::DnsZone, &ServiceConfig::new()).is_empty());
    }
}
