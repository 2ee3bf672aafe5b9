use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};
use crate::types::Value;
use crate::validation::validate_columns;

/// A named column holding one value per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered collection of equally sized, uniquely named columns.
///
/// Rows are aligned by position across columns. A `Dataset` is only built
/// through validating constructors, so the shape invariants always hold.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset from columns, rejecting ragged or ambiguous input.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        validate_columns(&columns)?;
        Ok(Self { columns })
    }

    /// Build a dataset from a header row and row-major cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(DatasetError::RowWidthMismatch {
                    row: row_index,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.values.push(value);
            }
        }

        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Borrow the cells of one row in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.row_count() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|column| &column.values[index])
                .collect(),
        )
    }

    /// Iterate rows in order, each as cells in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).map(move |index| {
            self.columns
                .iter()
                .map(|column| &column.values[index])
                .collect()
        })
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            columns: Vec<Column>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Dataset::new(raw.columns).map_err(serde::de::Error::custom)
    }
}
