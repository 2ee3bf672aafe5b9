use thiserror::Error;

/// Errors raised when a dataset violates its shape invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// A column does not have the same number of rows as the first column.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    /// Two columns share the same name.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    /// A column has an empty (or whitespace-only) name.
    #[error("column at position {0} has an empty name")]
    EmptyColumnName(usize),
    /// A row does not have one cell per column.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Convenience alias for results returned by tabmask-core.
pub type Result<T> = std::result::Result<T, DatasetError>;
