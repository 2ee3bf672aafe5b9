use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use tracing::warn;

use tabmask_core::{FieldType, FieldTypeConfig, Value};

use crate::errors::ColumnErrorKind;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Number,
    String,
    Date,
    List,
}

#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn new(key: &'static str, kind: ParamKind) -> Self {
        Self { key, kind }
    }
}

/// Validated view over a column's field-type configuration.
pub struct ParamMap<'a> {
    config: &'a FieldTypeConfig,
    field_type: FieldType,
}

/// Check every known key against its declared kind.
///
/// Keys the field type does not declare are ignored with a warning so that a
/// configuration left over from another field type never fails the column.
pub fn validate_params<'a>(
    config: &'a FieldTypeConfig,
    specs: &[ParamSpec],
    field_type: FieldType,
) -> Result<ParamMap<'a>, ColumnErrorKind> {
    for (key, value) in &config.0 {
        let Some(spec) = specs.iter().find(|spec| spec.key == key.as_str()) else {
            warn!(field_type = %field_type, key = %key, "ignoring unknown config key");
            continue;
        };
        validate_kind(field_type, spec, value)?;
    }

    Ok(ParamMap { config, field_type })
}

impl<'a> ParamMap<'a> {
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.config.get(key).and_then(JsonValue::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.config.get(key).and_then(JsonValue::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).and_then(JsonValue::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.config.get(key).and_then(JsonValue::as_str)
    }

    /// Read a date key, falling back to `default` when absent.
    pub fn get_date(&self, key: &'static str, default: &str) -> Result<NaiveDate, ColumnErrorKind> {
        let raw = self.get_str(key).unwrap_or(default);
        parse_date_value(raw).ok_or_else(|| ColumnErrorKind::InvalidDateFormat {
            field_type: self.field_type,
            key,
            value: raw.to_string(),
        })
    }

    /// Read a list key as cell values.
    ///
    /// Accepts a JSON array of scalars or a comma-separated string.
    pub fn get_list(&self, key: &str) -> Vec<Value> {
        match self.config.get(key) {
            Some(JsonValue::Array(items)) => items.iter().filter_map(json_to_value).collect(),
            Some(JsonValue::String(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Value::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn invalid(&self, key: &str, reason: impl Into<String>) -> ColumnErrorKind {
        ColumnErrorKind::InvalidConfigValue {
            field_type: self.field_type,
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

fn validate_kind(
    field_type: FieldType,
    spec: &ParamSpec,
    value: &JsonValue,
) -> Result<(), ColumnErrorKind> {
    let valid = match spec.kind {
        ParamKind::Bool => value.is_boolean(),
        ParamKind::Int => value.as_i64().is_some(),
        ParamKind::Number => value.as_f64().is_some_and(f64::is_finite),
        ParamKind::String => value.is_string(),
        ParamKind::List => match value {
            JsonValue::Array(items) => items.iter().all(|item| json_to_value(item).is_some()),
            JsonValue::String(_) => true,
            _ => false,
        },
        ParamKind::Date => {
            let Some(raw) = value.as_str() else {
                return Err(ColumnErrorKind::InvalidDateFormat {
                    field_type,
                    key: spec.key,
                    value: value.to_string(),
                });
            };
            if parse_date_value(raw).is_none() {
                return Err(ColumnErrorKind::InvalidDateFormat {
                    field_type,
                    key: spec.key,
                    value: raw.to_string(),
                });
            }
            true
        }
    };

    if valid {
        Ok(())
    } else {
        Err(ColumnErrorKind::InvalidConfigValue {
            field_type,
            key: spec.key.to_string(),
            reason: format!("expected {}", kind_name(spec.kind)),
        })
    }
}

fn kind_name(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Bool => "a boolean",
        ParamKind::Int => "an integer",
        ParamKind::Number => "a finite number",
        ParamKind::String => "a string",
        ParamKind::Date => "a YYYY-MM-DD date",
        ParamKind::List => "a list of scalars or a comma-separated string",
    }
}

pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn json_to_value(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Null => Some(Value::Null),
        JsonValue::Bool(flag) => Some(Value::Bool(*flag)),
        JsonValue::Number(number) => number
            .as_i64()
            .map(Value::Int)
            .or_else(|| number.as_f64().map(Value::Float)),
        JsonValue::String(text) => Some(Value::Text(text.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::new("min", ParamKind::Number),
        ParamSpec::new("start_date", ParamKind::Date),
        ParamSpec::new("values", ParamKind::List),
    ];

    #[test]
    fn ignores_unknown_keys() {
        let config = FieldTypeConfig::new().with("prefix", "X-");
        assert!(validate_params(&config, SPECS, FieldType::Number).is_ok());
    }

    #[test]
    fn rejects_wrong_kind() {
        let config = FieldTypeConfig::new().with("min", "ten");
        let result = validate_params(&config, SPECS, FieldType::Number);
        assert!(matches!(
            result,
            Err(ColumnErrorKind::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn malformed_date_is_a_date_error() {
        let config = FieldTypeConfig::new().with("start_date", "01/02/2020");
        let result = validate_params(&config, SPECS, FieldType::Date);
        assert!(matches!(
            result,
            Err(ColumnErrorKind::InvalidDateFormat { key: "start_date", .. })
        ));
    }

    #[test]
    fn list_accepts_comma_separated_text() {
        let config = FieldTypeConfig::new().with("values", "red, green,,blue");
        let params = validate_params(&config, SPECS, FieldType::CustomList).expect("valid");
        assert_eq!(
            params.get_list("values"),
            vec![Value::from("red"), Value::from("green"), Value::from("blue")]
        );

        let config = FieldTypeConfig::new().with("values", json!(["a", 1, null]));
        let params = validate_params(&config, SPECS, FieldType::CustomList).expect("valid");
        assert_eq!(
            params.get_list("values"),
            vec![Value::from("a"), Value::Int(1), Value::Null]
        );
    }
}
