use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tabmask_core::Dataset;

use crate::errors::OutputError;
use crate::load::Delimiter;

pub mod csv;
pub mod xlsx;

pub use self::csv::CsvWriter;
pub use self::xlsx::XlsxWriter;

/// Serialized form of a masked dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }

    /// Writer for this format.
    pub fn writer(self, delimiter: Delimiter) -> Box<dyn DatasetWriter> {
        match self {
            OutputFormat::Xlsx => Box::new(XlsxWriter),
            OutputFormat::Csv => Box::new(CsvWriter::new(delimiter)),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("xlsx") {
            Ok(OutputFormat::Xlsx)
        } else if value.eq_ignore_ascii_case("csv") {
            Ok(OutputFormat::Csv)
        } else {
            Err(OutputError::UnsupportedFormat(value.to_string()))
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serializes a dataset to a file path, replacing any existing content.
pub trait DatasetWriter {
    fn format(&self) -> OutputFormat;

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), OutputError>;
}
