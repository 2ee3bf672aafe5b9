use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single dataset cell.
///
/// Columns may hold heterogeneous values; `Null` represents a blank cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Infer a typed value from a raw text cell.
    ///
    /// Empty cells become `Null`; integers, floats and booleans are parsed;
    /// everything else stays text. Dates are left as text because delimited
    /// sources carry no reliable date format.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Value::Int(value);
        }
        if let Ok(value) = trimmed.parse::<f64>()
            && value.is_finite()
        {
            return Value::Float(value);
        }
        match trimmed {
            "true" | "TRUE" | "True" => Value::Bool(true),
            "false" | "FALSE" | "False" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Catalog of field types a column can be masked with.
///
/// The first thirteen variants are presets backed by the generator registry;
/// the remaining four are configured per column by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum FieldType {
    #[serde(rename = "Name")]
    Name,
    #[serde(rename = "Full Name")]
    FullName,
    #[serde(rename = "Address")]
    Address,
    #[serde(rename = "Phone")]
    Phone,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "UUID")]
    Uuid,
    #[serde(rename = "Company")]
    Company,
    #[serde(rename = "Department")]
    Department,
    #[serde(rename = "City")]
    City,
    #[serde(rename = "Country")]
    Country,
    #[serde(rename = "Zip Code")]
    ZipCode,
    #[serde(rename = "Product Name")]
    ProductName,
    #[serde(rename = "State or Province")]
    StateOrProvince,
    #[serde(rename = "Row Number")]
    RowNumber,
    #[serde(rename = "Custom List")]
    CustomList,
    #[serde(rename = "Number")]
    Number,
    #[serde(rename = "Date")]
    Date,
}

impl FieldType {
    pub const ALL: &'static [FieldType] = &[
        FieldType::Name,
        FieldType::FullName,
        FieldType::Address,
        FieldType::Phone,
        FieldType::Email,
        FieldType::Uuid,
        FieldType::Company,
        FieldType::Department,
        FieldType::City,
        FieldType::Country,
        FieldType::ZipCode,
        FieldType::ProductName,
        FieldType::StateOrProvince,
        FieldType::RowNumber,
        FieldType::CustomList,
        FieldType::Number,
        FieldType::Date,
    ];

    /// Preset field types served by the generator registry.
    pub const PRESETS: &'static [FieldType] = &[
        FieldType::Name,
        FieldType::FullName,
        FieldType::Address,
        FieldType::Phone,
        FieldType::Email,
        FieldType::Uuid,
        FieldType::Company,
        FieldType::Department,
        FieldType::City,
        FieldType::Country,
        FieldType::ZipCode,
        FieldType::ProductName,
        FieldType::StateOrProvince,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Name => "Name",
            FieldType::FullName => "Full Name",
            FieldType::Address => "Address",
            FieldType::Phone => "Phone",
            FieldType::Email => "Email",
            FieldType::Uuid => "UUID",
            FieldType::Company => "Company",
            FieldType::Department => "Department",
            FieldType::City => "City",
            FieldType::Country => "Country",
            FieldType::ZipCode => "Zip Code",
            FieldType::ProductName => "Product Name",
            FieldType::StateOrProvince => "State or Province",
            FieldType::RowNumber => "Row Number",
            FieldType::CustomList => "Custom List",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
        }
    }

    /// Parse a catalog identifier, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("State/Province") {
            return Some(FieldType::StateOrProvince);
        }
        FieldType::ALL
            .iter()
            .copied()
            .find(|field_type| field_type.as_str().eq_ignore_ascii_case(value))
    }

    pub fn is_preset(self) -> bool {
        FieldType::PRESETS.contains(&self)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
