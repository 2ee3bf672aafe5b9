//! Core contracts shared across tabmask crates.
//!
//! This crate defines the in-memory dataset, the cell value model, the
//! field-type catalog and the per-column masking rules consumed by the engine.

pub mod error;
pub mod rules;
pub mod schema;
pub mod types;
pub mod validation;

pub use error::{DatasetError, Result};
pub use rules::{ColumnRule, FieldTypeConfig, FieldTypeId, RuleSet};
pub use schema::{Column, Dataset};
pub use types::{FieldType, Value};
pub use validation::validate_columns;
