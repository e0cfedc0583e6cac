//! Configuration types for the Skyplan engine.
//!
//! This module provides configuration structures that control layout, grid
//! snapping, edge routing, pricing and linting. All types implement
//! [`serde::Deserialize`] so they can be loaded from TOML; every field is
//! optional and falls back to the built-in default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Tier spacing, row height and group box sizing.
//! - [`GridConfig`] - View mode and lattice constants.
//! - [`RoutingConfig`] - Channel search and connector rounding.
//! - [`PricingConfig`] - Default billing region.
//! - [`LintConfig`] - Thresholds used by the architecture rules.
//!
//! # Example
//!
//! ```
//! # use skyplan::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.grid().cartesian_step(), 20.0);
//! assert_eq!(config.pricing().region(), "eastus");
//! ```

use serde::Deserialize;

use skyplan_core::{
    diagram::{LayoutDirection, ViewMode},
    geometry::{Point, Size},
};

/// Top-level configuration combining every section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    grid: GridConfig,

    #[serde(default)]
    routing: RoutingConfig,

    #[serde(default)]
    pricing: PricingConfig,

    #[serde(default)]
    lint: LintConfig,
}

impl AppConfig {
    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the grid configuration.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Returns the routing configuration.
    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Returns the pricing configuration.
    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Returns the lint configuration.
    pub fn lint(&self) -> &LintConfig {
        &self.lint
    }

    /// Overrides the layout direction.
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout = self.layout.with_direction(direction);
        self
    }

    /// Overrides the view mode.
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.grid.view_mode = Some(view_mode);
        self
    }

    /// Overrides the billing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.pricing.region = region.into();
        self
    }

    /// Overrides the monthly budget used by the cost rules.
    pub fn with_monthly_budget(mut self, budget: f64) -> Self {
        self.lint.monthly_budget = Some(budget);
        self
    }
}

/// Layered layout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Direction in which tiers are packed.
    direction: LayoutDirection,
    origin_x: f32,
    origin_y: f32,
    /// Distance between two consecutive tier lanes.
    tier_spacing: f32,
    /// Distance between two consecutive nodes of one tier.
    row_height: f32,
    service_width: f32,
    service_height: f32,
    /// Padding between a group border and its children.
    group_padding: f32,
    /// Extra room above the children for the group title.
    group_header: f32,
    empty_group_width: f32,
    empty_group_height: f32,
    /// Gap between boxes of empty groups.
    empty_group_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::LeftToRight,
            origin_x: 40.0,
            origin_y: 40.0,
            tier_spacing: 260.0,
            row_height: 140.0,
            service_width: 120.0,
            service_height: 80.0,
            group_padding: 40.0,
            group_header: 32.0,
            empty_group_width: 320.0,
            empty_group_height: 200.0,
            empty_group_gap: 80.0,
        }
    }
}

impl LayoutConfig {
    /// Overrides the direction in which tiers are packed.
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Top-left corner of the first tier lane
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    pub fn tier_spacing(&self) -> f32 {
        self.tier_spacing
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// Rectangle occupied by every service node
    pub fn service_size(&self) -> Size {
        Size::new(self.service_width, self.service_height)
    }

    pub fn group_padding(&self) -> f32 {
        self.group_padding
    }

    pub fn group_header(&self) -> f32 {
        self.group_header
    }

    /// Box given to groups without children
    pub fn empty_group_size(&self) -> Size {
        Size::new(self.empty_group_width, self.empty_group_height)
    }

    pub fn empty_group_gap(&self) -> f32 {
        self.empty_group_gap
    }
}

/// Lattice settings for both view modes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Forces a view mode; `None` keeps the mode stored in the diagram.
    view_mode: Option<ViewMode>,
    cartesian_step: f32,
    cartesian_group_step: f32,
    cartesian_min_group_width: f32,
    cartesian_min_group_height: f32,
    isometric_step: f32,
    isometric_group_step: f32,
    isometric_min_group_width: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            view_mode: None,
            cartesian_step: 20.0,
            cartesian_group_step: 40.0,
            cartesian_min_group_width: 160.0,
            cartesian_min_group_height: 120.0,
            isometric_step: 40.0,
            isometric_group_step: 80.0,
            isometric_min_group_width: 160.0,
        }
    }
}

impl GridConfig {
    pub fn view_mode(&self) -> Option<ViewMode> {
        self.view_mode
    }

    pub fn cartesian_step(&self) -> f32 {
        self.cartesian_step
    }

    pub fn cartesian_group_step(&self) -> f32 {
        self.cartesian_group_step
    }

    pub fn cartesian_min_group_size(&self) -> Size {
        Size::new(
            self.cartesian_min_group_width,
            self.cartesian_min_group_height,
        )
    }

    pub fn isometric_step(&self) -> f32 {
        self.isometric_step
    }

    pub fn isometric_group_step(&self) -> f32 {
        self.isometric_group_step
    }

    pub fn isometric_min_group_width(&self) -> f32 {
        self.isometric_min_group_width
    }
}

/// Edge routing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Vertical distance below which two nodes count as level.
    level_threshold: f32,
    /// Clearance margin around obstacles in sparse diagrams.
    clearance: f32,
    /// Lower bound for the clearance margin in dense diagrams.
    min_clearance: f32,
    collision_penalty: f32,
    clear_channel_bonus: f32,
    midpoint_bias: f32,
    /// Relative extra length tolerated to keep the direct midpoint channel.
    direct_tolerance: f32,
    min_corner_radius: f32,
    max_corner_radius: f32,
    /// Spacing between bundled parallel edges.
    bundle_step: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            level_threshold: 12.0,
            clearance: 16.0,
            min_clearance: 4.0,
            collision_penalty: 1000.0,
            clear_channel_bonus: 15.0,
            midpoint_bias: 0.1,
            direct_tolerance: 0.1,
            min_corner_radius: 4.0,
            max_corner_radius: 12.0,
            bundle_step: 4.0,
        }
    }
}

impl RoutingConfig {
    pub fn level_threshold(&self) -> f32 {
        self.level_threshold
    }

    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    pub fn min_clearance(&self) -> f32 {
        self.min_clearance
    }

    pub fn collision_penalty(&self) -> f32 {
        self.collision_penalty
    }

    pub fn clear_channel_bonus(&self) -> f32 {
        self.clear_channel_bonus
    }

    pub fn midpoint_bias(&self) -> f32 {
        self.midpoint_bias
    }

    pub fn direct_tolerance(&self) -> f32 {
        self.direct_tolerance
    }

    pub fn corner_radius_bounds(&self) -> (f32, f32) {
        (self.min_corner_radius, self.max_corner_radius)
    }

    pub fn bundle_step(&self) -> f32 {
        self.bundle_step
    }
}

/// Pricing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Billing region applied when none is given explicitly.
    region: String,
    /// Currency label shown next to figures. Rates are always in USD.
    currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            region: "eastus".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl PricingConfig {
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// Thresholds used by the architecture rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    min_description_length: usize,
    monthly_budget: Option<f64>,
    /// Share of the total above which a single service is reported.
    dominant_cost_share: f64,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            min_description_length: 20,
            monthly_budget: None,
            dominant_cost_share: 0.5,
        }
    }
}

impl LintConfig {
    pub fn min_description_length(&self) -> usize {
        self.min_description_length
    }

    pub fn monthly_budget(&self) -> Option<f64> {
        self.monthly_budget
    }

    pub fn dominant_cost_share(&self) -> f64 {
        self.dominant_cost_share
    }
}
