use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use tabmask_core::Dataset;

use crate::blanks::BlankSampling;
use crate::errors::ColumnErrorKind;
use crate::faker::Locale;

/// What happens when a selected column cannot be masked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OnColumnError {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Leave the column unchanged and record the failure.
    Skip,
}

impl OnColumnError {
    pub fn as_str(self) -> &'static str {
        match self {
            OnColumnError::Abort => "abort",
            OnColumnError::Skip => "skip",
        }
    }
}

/// Options for the masking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MaskOptions {
    /// Map equal originals to equal substitutes.
    pub keep_mapping: bool,
    /// Seed for a reproducible run; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
    pub locale: Locale,
    pub blank_sampling: BlankSampling,
    pub on_error: OnColumnError,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            keep_mapping: true,
            seed: None,
            locale: Locale::default(),
            blank_sampling: BlankSampling::default(),
            on_error: OnColumnError::default(),
        }
    }
}

/// Ordered, human-readable record of what a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationLog(Vec<String>);

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.0.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.iter().any(|existing| existing == entry)
    }
}

impl fmt::Display for OperationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.0 {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Outcome recorded for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnStatus {
    Masked,
    NotSelected,
    Failed,
}

/// Summary of one column in a masking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    pub status: ColumnStatus,
    pub rows: usize,
    /// Substitution units: distinct originals in mapped mode, rows otherwise.
    pub units: usize,
    pub blanks: usize,
}

/// Report for a masking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskReport {
    pub run_id: String,
    pub keep_mapping: bool,
    pub seed: u64,
    pub locale: Locale,
    pub blank_sampling: BlankSampling,
    pub columns: Vec<ColumnReport>,
    pub ignored_rules: Vec<String>,
}

impl MaskReport {
    pub fn new(run_id: String, options: &MaskOptions, seed: u64) -> Self {
        Self {
            run_id,
            keep_mapping: options.keep_mapping,
            seed,
            locale: options.locale,
            blank_sampling: options.blank_sampling,
            columns: Vec::new(),
            ignored_rules: Vec::new(),
        }
    }

    pub fn masked_columns(&self) -> usize {
        self.columns
            .iter()
            .filter(|column| column.status == ColumnStatus::Masked)
            .count()
    }
}

/// Column that was left unchanged because masking it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFailure {
    pub column: String,
    pub kind: ColumnErrorKind,
}

/// Result of a masking run.
#[derive(Debug, Clone)]
pub struct MaskOutput {
    pub dataset: Dataset,
    pub log: OperationLog,
    pub report: MaskReport,
    pub failures: Vec<ColumnFailure>,
}
