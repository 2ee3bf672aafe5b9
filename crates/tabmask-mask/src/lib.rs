//! Masking engine for tabmask.
//!
//! This crate turns a [`Dataset`](tabmask_core::Dataset) and a
//! [`RuleSet`](tabmask_core::RuleSet) into a masked copy plus an operation log,
//! using locale-aware preset generators and configurable field types.

pub mod blanks;
pub mod engine;
pub mod errors;
pub mod faker;
pub mod generators;
pub mod mapping;
pub mod model;
pub mod params;

pub use blanks::BlankSampling;
pub use engine::{MaskingEngine, mask};
pub use errors::{ColumnErrorKind, MaskError};
pub use faker::Locale;
pub use generators::{Generator, GeneratorContext, GeneratorRegistry, MaskMode};
pub use model::{
    ColumnFailure, ColumnReport, ColumnStatus, MaskOptions, MaskOutput, MaskReport,
    OnColumnError, OperationLog,
};
