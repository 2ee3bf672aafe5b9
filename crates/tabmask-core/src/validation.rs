use std::collections::BTreeSet;

use crate::error::{DatasetError, Result};
use crate::schema::Column;

/// Validate the shape invariants of a set of columns.
///
/// This checks:
/// - every column has a non-empty name
/// - column names are unique
/// - every column has the same number of rows as the first one
pub fn validate_columns(columns: &[Column]) -> Result<()> {
    let mut names = BTreeSet::new();
    let expected = columns.first().map(Column::len).unwrap_or(0);

    for (position, column) in columns.iter().enumerate() {
        if column.name.trim().is_empty() {
            return Err(DatasetError::EmptyColumnName(position));
        }
        if !names.insert(column.name.as_str()) {
            return Err(DatasetError::DuplicateColumn(column.name.clone()));
        }
        if column.len() != expected {
            return Err(DatasetError::ColumnLengthMismatch {
                column: column.name.clone(),
                expected,
                actual: column.len(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn rejects_duplicate_names() {
        let columns = vec![
            Column::new("id", vec![Value::Int(1)]),
            Column::new("id", vec![Value::Int(2)]),
        ];
        assert_eq!(
            validate_columns(&columns),
            Err(DatasetError::DuplicateColumn("id".to_string()))
        );
    }

    #[test]
    fn rejects_ragged_columns() {
        let columns = vec![
            Column::new("id", vec![Value::Int(1), Value::Int(2)]),
            Column::new("name", vec![Value::from("Ana")]),
        ];
        assert!(matches!(
            validate_columns(&columns),
            Err(DatasetError::ColumnLengthMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn rejects_blank_names() {
        let columns = vec![Column::new(" ", vec![])];
        assert_eq!(
            validate_columns(&columns),
            Err(DatasetError::EmptyColumnName(0))
        );
    }
}
