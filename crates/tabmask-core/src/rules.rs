use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::FieldType;

/// Raw field-type identifier as supplied by the caller (ex.: `"Full Name"`).
///
/// Kept as text so that unknown identifiers surface as an engine error for
/// the column instead of failing the whole profile decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldTypeId(pub String);

impl FieldTypeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn resolve(&self) -> Option<FieldType> {
        FieldType::parse(&self.0)
    }
}

impl From<FieldType> for FieldTypeId {
    fn from(value: FieldType) -> Self {
        Self(value.as_str().to_string())
    }
}

impl From<&str> for FieldTypeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for FieldTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-column options for the selected field type.
///
/// The accepted keys depend on the field type; missing keys fall back to
/// documented defaults when the engine resolves the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldTypeConfig(pub BTreeMap<String, serde_json::Value>);

impl FieldTypeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Masking directive for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnRule {
    /// Whether the column is masked at all.
    #[serde(default)]
    pub selected: bool,
    /// Field type used to synthesize substitutes.
    pub field_type: FieldTypeId,
    /// Probability in `[0, 1]` that a substitution unit becomes blank.
    #[serde(default)]
    pub blank_percent: f64,
    /// Options for the field type.
    #[serde(default, skip_serializing_if = "FieldTypeConfig::is_empty")]
    pub config: FieldTypeConfig,
}

impl ColumnRule {
    /// A selected rule with no blanks and default configuration.
    pub fn masked(field_type: impl Into<FieldTypeId>) -> Self {
        Self {
            selected: true,
            field_type: field_type.into(),
            blank_percent: 0.0,
            config: FieldTypeConfig::default(),
        }
    }

    /// An unselected rule; the column passes through unchanged.
    pub fn skipped(field_type: impl Into<FieldTypeId>) -> Self {
        Self {
            selected: false,
            ..Self::masked(field_type)
        }
    }

    pub fn with_blank_percent(mut self, blank_percent: f64) -> Self {
        self.blank_percent = blank_percent;
        self
    }

    pub fn with_config(mut self, config: FieldTypeConfig) -> Self {
        self.config = config;
        self
    }
}

/// Rules keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RuleSet(pub BTreeMap<String, ColumnRule>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, rule: ColumnRule) -> Option<ColumnRule> {
        self.0.insert(column.into(), rule)
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, rule: ColumnRule) -> Self {
        self.insert(column, rule);
        self
    }

    pub fn get(&self, column: &str) -> Option<&ColumnRule> {
        self.0.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnRule)> {
        self.0.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
