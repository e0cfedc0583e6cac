//! Pricing descriptors.
//!
//! A [`Descriptor`] declares the configurable fields of one service type and
//! how a configuration turns into monthly line items. Configurations coming
//! from documents are never trusted: every read goes through [`Resolved`],
//! which falls back to field defaults, clamps numbers into range and treats
//! hidden fields as if they held their default.

use serde::Serialize;

use skyplan_core::diagram::{ConfigValue, ServiceConfig, ServiceType};

/// One option of a select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    value: &'static str,
    label: &'static str,
}

impl SelectOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }

    pub fn value(&self) -> &'static str {
        self.value
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Input widget and value domain of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldKind {
    Select {
        options: &'static [SelectOption],
        default: &'static str,
    },
    Number {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Toggle {
        default: bool,
    },
}

/// Visibility rule: the field is shown only while `field` holds one of
/// `any_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    field: &'static str,
    any_of: &'static [&'static str],
}

impl Condition {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn any_of(&self) -> &'static [&'static str] {
        self.any_of
    }
}

/// A configurable field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    depends_on: Option<Condition>,
}

impl Field {
    pub const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [SelectOption],
        default: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Select { options, default },
            depends_on: None,
        }
    }

    pub const fn number(
        key: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Number {
                min,
                max,
                step,
                default,
            },
            depends_on: None,
        }
    }

    pub const fn toggle(key: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Toggle { default },
            depends_on: None,
        }
    }

    /// Shows the field only while `field` holds one of `any_of`.
    pub const fn visible_when(self, field: &'static str, any_of: &'static [&'static str]) -> Self {
        Self {
            depends_on: Some(Condition { field, any_of }),
            ..self
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn depends_on(&self) -> Option<Condition> {
        self.depends_on
    }

    pub fn default_value(&self) -> ConfigValue {
        match self.kind {
            FieldKind::Select { default, .. } => ConfigValue::from(default),
            FieldKind::Number { default, .. } => ConfigValue::from(default),
            FieldKind::Toggle { default } => ConfigValue::from(default),
        }
    }
}

/// A monthly cost line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    label: String,
    monthly_cost: f64,
}

impl LineItem {
    pub fn new(label: impl Into<String>, monthly_cost: f64) -> Self {
        Self {
            label: label.into(),
            monthly_cost,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn monthly_cost(&self) -> f64 {
        self.monthly_cost
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            monthly_cost: self.monthly_cost * factor,
            ..self
        }
    }
}

/// Line items of one priced service and their sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    line_items: Vec<LineItem>,
    total: f64,
}

impl CostBreakdown {
    /// Builds a breakdown whose total is the sum of the items.
    pub fn from_items(line_items: Vec<LineItem>) -> Self {
        let total = line_items.iter().map(LineItem::monthly_cost).sum();
        Self { line_items, total }
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Naming rule for SKUs: the label of a select field (or a fixed label),
/// optionally followed by an instance count.
#[derive(Debug, Clone, Copy)]
pub struct SkuRule {
    primary: SkuLabel,
    count: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
enum SkuLabel {
    Field(&'static str),
    Fixed(&'static str),
}

impl SkuRule {
    /// Names the SKU after the selected option of a select field.
    pub const fn new(primary: &'static str) -> Self {
        Self {
            primary: SkuLabel::Field(primary),
            count: None,
        }
    }

    /// Names the SKU with a constant label.
    pub const fn fixed(label: &'static str) -> Self {
        Self {
            primary: SkuLabel::Fixed(label),
            count: None,
        }
    }

    pub const fn with_count(self, count: &'static str) -> Self {
        Self {
            count: Some(count),
            ..self
        }
    }
}

/// Pricing descriptor of one service type.
pub struct Descriptor {
    service: ServiceType,
    fields: &'static [Field],
    sku: SkuRule,
    calculate: fn(&Resolved<'_>) -> Vec<LineItem>,
}

impl Descriptor {
    pub const fn new(
        service: ServiceType,
        fields: &'static [Field],
        sku: SkuRule,
        calculate: fn(&Resolved<'_>) -> Vec<LineItem>,
    ) -> Self {
        Self {
            service,
            fields,
            sku,
            calculate,
        }
    }

    pub fn service(&self) -> ServiceType {
        self.service
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    pub fn field(&self, key: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Configuration holding every field's default.
    pub fn default_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::new();
        for field in self.fields {
            config.set(field.key, field.default_value());
        }
        config
    }

    /// Reads `config` through the field rules of this descriptor.
    pub fn resolve<'a>(&'a self, config: &'a ServiceConfig) -> Resolved<'a> {
        Resolved {
            descriptor: self,
            config,
        }
    }

    /// Fields whose visibility rule holds for `config`, in declaration order.
    pub fn visible_fields(&self, config: &ServiceConfig) -> Vec<&'static Field> {
        let resolved = self.resolve(config);
        self.fields
            .iter()
            .filter(|field| resolved.is_visible(field.key))
            .collect()
    }

    /// Monthly cost of `config`, with every line item scaled by the region
    /// multiplier.
    pub fn calculate_cost(&self, config: &ServiceConfig, region_multiplier: f64) -> CostBreakdown {
        let items = (self.calculate)(&self.resolve(config))
            .into_iter()
            .map(|item| item.scaled(region_multiplier))
            .collect();
        CostBreakdown::from_items(items)
    }

    /// Value of the count-like field named by the SKU rule, when that field
    /// is visible for `config`.
    pub fn instance_count(&self, config: &ServiceConfig) -> Option<f64> {
        let resolved = self.resolve(config);
        self.sku
            .count
            .filter(|key| resolved.is_visible(key))
            .map(|key| resolved.number(key))
    }

    /// Human readable SKU such as `"Standard S1"` or `"Standard S1 (3x)"`.
    ///
    /// The count suffix appears only when the count field is visible and
    /// above one.
    pub fn derive_sku(&self, config: &ServiceConfig) -> Option<String> {
        let resolved = self.resolve(config);
        let label = match self.sku.primary {
            SkuLabel::Field(key) => resolved.choice_label(key)?,
            SkuLabel::Fixed(label) => label,
        };

        let count = self.instance_count(config).filter(|count| *count > 1.0);

        Some(match count {
            Some(count) => format!("{label} ({count:.0}x)"),
            None => label.to_string(),
        })
    }
}

/// A configuration read through a descriptor's field rules.
pub struct Resolved<'a> {
    descriptor: &'a Descriptor,
    config: &'a ServiceConfig,
}

impl Resolved<'_> {
    /// Selected option value. Unknown, missing or hidden values resolve to
    /// the field default; non-select fields resolve to `""`.
    pub fn choice(&self, key: &str) -> &'static str {
        self.select_option(key).map_or("", |option| option.value)
    }

    /// Label of the selected option.
    pub fn choice_label(&self, key: &str) -> Option<&'static str> {
        self.select_option(key).map(|option| option.label)
    }

    /// Number clamped into range and aligned to the step. Missing, invalid
    /// or hidden values resolve to the field default.
    pub fn number(&self, key: &str) -> f64 {
        let Some(field) = self.descriptor.field(key) else {
            return 0.0;
        };
        let FieldKind::Number {
            min,
            max,
            step,
            default,
        } = field.kind
        else {
            return 0.0;
        };
        if !self.is_visible(key) {
            return default;
        }

        let Some(value) = self.config.number(key).filter(|value| value.is_finite()) else {
            return default;
        };
        let clamped = value.clamp(min, max);
        if step > 0.0 {
            (min + ((clamped - min) / step).round() * step).clamp(min, max)
        } else {
            clamped
        }
    }

    /// Toggle state. Missing, invalid or hidden values resolve to the field
    /// default.
    pub fn toggle(&self, key: &str) -> bool {
        let Some(field) = self.descriptor.field(key) else {
            return false;
        };
        let FieldKind::Toggle { default } = field.kind else {
            return false;
        };
        if !self.is_visible(key) {
            return default;
        }
        self.config.toggle(key).unwrap_or(default)
    }

    /// Returns `true` if the field exists and its visibility rule holds.
    pub fn is_visible(&self, key: &str) -> bool {
        let Some(field) = self.descriptor.field(key) else {
            return false;
        };
        match field.depends_on {
            None => true,
            Some(condition) => {
                let current = self.value_text(condition.field);
                condition.any_of.iter().any(|allowed| *allowed == current)
            }
        }
    }

    fn select_option(&self, key: &str) -> Option<&'static SelectOption> {
        let field = self.descriptor.field(key)?;
        let FieldKind::Select { options, default } = field.kind else {
            return None;
        };
        let by_value = |value: &str| options.iter().find(|option| option.value == value);

        let configured = if self.is_visible(key) {
            self.config.choice(key).and_then(by_value)
        } else {
            None
        };
        configured.or_else(|| by_value(default)).or(options.first())
    }

    /// Resolved value of a field as text, used by visibility rules.
    fn value_text(&self, key: &str) -> String {
        match self.descriptor.field(key).map(|field| field.kind) {
            Some(FieldKind::Select { .. }) => self.choice(key).to_string(),
            Some(FieldKind::Toggle { .. }) => self.toggle(key).to_string(),
            Some(FieldKind::Number { .. }) => self.number(key).to_string(),
            None => String::new(),
        }
    }
}
