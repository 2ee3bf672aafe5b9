use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tabmask_core::{Dataset, Value};

use crate::errors::LoadError;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Field separator for delimited text files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Pipe,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Pipe => b'|',
            Delimiter::Tab => b'\t',
        }
    }
}

impl FromStr for Delimiter {
    type Err = LoadError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "," | "comma" => Ok(Delimiter::Comma),
            ";" | "semicolon" => Ok(Delimiter::Semicolon),
            "|" | "pipe" => Ok(Delimiter::Pipe),
            "\t" | "\\t" | "tab" | "Tab" => Ok(Delimiter::Tab),
            other => Err(LoadError::UnsupportedDelimiter(other.to_string())),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => f.write_str("tab"),
            other => write!(f, "{}", other.as_byte() as char),
        }
    }
}

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Load a dataset, picking the reader from the file extension.
pub fn load_path(path: &Path, delimiter: Delimiter) -> Result<Dataset, LoadError> {
    let dataset = if is_spreadsheet(path) {
        load_spreadsheet(path)?
    } else {
        load_delimited(path, delimiter)?
    };
    info!(
        path = %path.display(),
        columns = dataset.width(),
        rows = dataset.row_count(),
        "dataset loaded"
    );
    Ok(dataset)
}

pub fn load_delimited(path: &Path, delimiter: Delimiter) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path)?;
    read_delimited(file, delimiter)
}

/// Read delimited text with a header row.
///
/// Records that fail to decode or whose width differs from the header are
/// skipped with a warning.
pub fn read_delimited<R: Read>(reader: R, delimiter: Delimiter) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(LoadError::MissingHeader);
    }

    let width = headers.len();
    let mut rows = Vec::new();
    let mut skipped = 0_usize;
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(row = index + 1, error = %err, "skipping undecodable row");
                skipped += 1;
                continue;
            }
        };
        if record.len() != width {
            warn!(
                row = index + 1,
                expected = width,
                actual = record.len(),
                "skipping malformed row"
            );
            skipped += 1;
            continue;
        }
        rows.push(record.iter().map(Value::infer).collect::<Vec<_>>());
    }

    if skipped > 0 {
        warn!(skipped, "rows skipped while reading delimited input");
    }

    Ok(Dataset::from_rows(headers, rows)?)
}

/// Read the first worksheet of a spreadsheet; the first row is the header.
pub fn load_spreadsheet(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet(path.to_path_buf()))??;

    let mut cells = range.rows();
    let headers = cells
        .next()
        .ok_or(LoadError::MissingHeader)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect::<Vec<_>>();

    let rows = cells
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    Ok(Dataset::from_rows(headers, rows)?)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Bool(flag) => Value::Bool(*flag),
        Data::Int(number) => Value::Int(*number),
        Data::Float(number) => {
            if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
                Value::Int(*number as i64)
            } else {
                Value::Float(*number)
            }
        }
        Data::String(text) if text.trim().is_empty() => Value::Null,
        Data::String(text) => Value::Text(text.clone()),
        Data::DateTime(datetime) => datetime
            .as_datetime()
            .map(|datetime| Value::Date(datetime.date()))
            .unwrap_or(Value::Null),
        Data::DateTimeIso(text) => text
            .get(..10)
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .map(Value::Date)
            .unwrap_or_else(|| Value::Text(text.clone())),
        Data::DurationIso(text) => Value::Text(text.clone()),
        Data::Error(err) => {
            warn!(error = ?err, "spreadsheet cell holds an error; treating as blank");
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_delimiters() {
        assert_eq!(",".parse::<Delimiter>().ok(), Some(Delimiter::Comma));
        assert_eq!(";".parse::<Delimiter>().ok(), Some(Delimiter::Semicolon));
        assert_eq!("|".parse::<Delimiter>().ok(), Some(Delimiter::Pipe));
        assert_eq!("tab".parse::<Delimiter>().ok(), Some(Delimiter::Tab));
        assert!(":".parse::<Delimiter>().is_err());
    }

    #[test]
    fn spreadsheet_detection_ignores_case() {
        assert!(is_spreadsheet(Path::new("people.XLSX")));
        assert!(is_spreadsheet(Path::new("people.ods")));
        assert!(!is_spreadsheet(Path::new("people.csv")));
        assert!(!is_spreadsheet(Path::new("people")));
    }
}
