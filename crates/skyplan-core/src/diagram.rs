//! Diagram model types.
//!
//! # Organization
//!
//! - [`service`] - The service catalog: [`ServiceType`] and [`Category`]
//! - [`element`] - [`Node`], [`Edge`] and their enums
//! - [`service_config`] - Pricing configuration values carried by nodes
//! - [`report`] - Derived state: [`CostSummary`] and [`Finding`]
//! - [`view`] - [`ViewMode`] and [`LayoutDirection`]
//! - [`graph`] - The [`DiagramGraph`] aggregate

pub mod element;
pub mod graph;
pub mod report;
pub mod service;
pub mod service_config;
pub mod view;

pub use element::*;
pub use graph::*;
pub use report::*;
pub use service::*;
pub use service_config::*;
pub use view::*;
