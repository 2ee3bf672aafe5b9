use tabmask_core::{DatasetError, FieldType};
use thiserror::Error;

/// Why a single column could not be masked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColumnErrorKind {
    #[error("unknown field type '{0}'")]
    UnknownFieldType(String),
    #[error("{field_type}: config 'values' must not be empty")]
    EmptyConfigList { field_type: FieldType },
    #[error("{field_type}: invalid range, {reason}")]
    InvalidRange {
        field_type: FieldType,
        reason: String,
    },
    #[error("{field_type}: invalid date '{value}' for '{key}', expected YYYY-MM-DD")]
    InvalidDateFormat {
        field_type: FieldType,
        key: &'static str,
        value: String,
    },
    #[error("{field_type}: invalid value for config '{key}': {reason}")]
    InvalidConfigValue {
        field_type: FieldType,
        key: String,
        reason: String,
    },
    #[error("blank_percent {0} must be between 0 and 1")]
    InvalidBlankPercent(f64),
}

/// Errors emitted by the masking engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaskError {
    #[error("column '{column}': {kind}")]
    Column {
        column: String,
        kind: ColumnErrorKind,
    },
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

impl MaskError {
    pub fn column(column: impl Into<String>, kind: ColumnErrorKind) -> Self {
        MaskError::Column {
            column: column.into(),
            kind,
        }
    }

    /// Name of the offending column, when the error is column-scoped.
    pub fn column_name(&self) -> Option<&str> {
        match self {
            MaskError::Column { column, .. } => Some(column.as_str()),
            MaskError::Dataset(_) => None,
        }
    }
}
