use log::warn;

/// Regional price multipliers relative to the reference region.
pub const REGIONS: &[(&str, f64)] = &[
    ("eastus", 1.0),
    ("eastus2", 1.0),
    ("westus2", 1.0),
    ("centralus", 1.02),
    ("westus", 1.05),
    ("centralindia", 1.05),
    ("northeurope", 1.08),
    ("westeurope", 1.1),
    ("southeastasia", 1.1),
    ("uksouth", 1.12),
    ("japaneast", 1.15),
    ("australiaeast", 1.18),
    ("brazilsouth", 1.35),
];

/// Returns the price multiplier of a region. Unknown regions price like the
/// reference region.
pub fn region_multiplier(region: &str) -> f64 {
    let normalized = region.trim().to_ascii_lowercase().replace([' ', '-'], "");
    match REGIONS.iter().find(|(name, _)| *name == normalized) {
        Some((_, multiplier)) => *multiplier,
        None => {
            warn!(region; "Unknown pricing region, using reference prices");
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_regions() {
        assert_eq!(region_multiplier("eastus"), 1.0);
        assert_eq!(region_multiplier("westeurope"), 1.1);
        assert_eq!(region_multiplier("brazilsouth"), 1.35);
    }

    #[test]
    fn test_region_names_normalized() {
        assert_eq!(region_multiplier("West Europe"), 1.1);
        assert_eq!(region_multiplier("UK-South"), 1.12);
    }

    #[test]
    fn test_unknown_region_uses_reference() {
        assert_eq!(region_multiplier("moonbase-1"), 1.0);
    }
}
