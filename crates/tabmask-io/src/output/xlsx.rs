use std::path::Path;

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use tabmask_core::{Dataset, Value};

use crate::errors::OutputError;
use crate::output::{DatasetWriter, OutputFormat};

pub const SHEET_NAME: &str = "Masked Data";
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Single-sheet workbook writer; header row first, blanks as empty cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl DatasetWriter for XlsxWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), OutputError> {
        if dataset.row_count() + 1 > MAX_ROWS || dataset.width() > MAX_COLUMNS {
            return Err(OutputError::TooLarge {
                rows: dataset.row_count(),
                columns: dataset.width(),
            });
        }

        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col_index, column) in dataset.columns().iter().enumerate() {
            let col = col_index as u16;
            sheet.write_string(0, col, &column.name)?;
            for (row_index, value) in column.values.iter().enumerate() {
                let row = row_index as u32 + 1;
                match value {
                    Value::Null => {}
                    Value::Bool(flag) => {
                        sheet.write_boolean(row, col, *flag)?;
                    }
                    Value::Int(number) => {
                        sheet.write_number(row, col, *number as f64)?;
                    }
                    Value::Float(number) => {
                        sheet.write_number(row, col, *number)?;
                    }
                    Value::Date(date) => {
                        let datetime = ExcelDateTime::from_ymd(
                            date.year() as u16,
                            date.month() as u8,
                            date.day() as u8,
                        )?;
                        sheet.write_datetime_with_format(row, col, &datetime, &date_format)?;
                    }
                    Value::Text(text) => {
                        sheet.write_string(row, col, text)?;
                    }
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}
