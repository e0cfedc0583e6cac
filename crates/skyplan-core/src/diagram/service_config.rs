//! Pricing configuration attached to a service node.
//!
//! A [`ServiceConfig`] is a loose key/value bag as produced by the property
//! panel. Interpretation (defaults, ranges, visibility) belongs to the
//! pricing descriptors; this type only stores values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Toggle(bool),
    Number(f64),
    Choice(String),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Toggle(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Choice(value.to_string())
    }
}

/// Pricing configuration of one service node.
///
/// # Examples
///
/// ```
/// use skyplan_core::diagram::ServiceConfig;
///
/// let config = ServiceConfig::new()
///     .with("tier", "standard-c1")
///     .with("shards", 1u32);
///
/// assert_eq!(config.choice("tier"), Some("standard-c1"));
/// assert_eq!(config.number("shards"), Some(1.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfig(BTreeMap<String, ConfigValue>);

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Returns the value as a select option.
    pub fn choice(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            ConfigValue::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    /// Returns the value as a number; numeric strings are accepted.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            ConfigValue::Number(number) => Some(*number),
            ConfigValue::Choice(text) => text.trim().parse().ok(),
            ConfigValue::Toggle(_) => None,
        }
    }

    /// Returns the value as a toggle; `"true"`/`"false"` strings are accepted.
    pub fn toggle(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            ConfigValue::Toggle(flag) => Some(*flag),
            ConfigValue::Choice(text) => text.trim().parse().ok(),
            ConfigValue::Number(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
