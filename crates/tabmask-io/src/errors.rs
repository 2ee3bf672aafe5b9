use std::io;
use std::path::PathBuf;

use tabmask_core::DatasetError;
use thiserror::Error;

/// Errors raised while reading a source file into a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("'{}' contains no worksheet", .0.display())]
    NoWorksheet(PathBuf),
    #[error("missing header row")]
    MissingHeader,
    #[error("unsupported delimiter '{0}' (expected ',', ';', '|' or 'tab')")]
    UnsupportedDelimiter(String),
    #[error("invalid dataset: {0}")]
    Dataset(#[from] DatasetError),
}

/// Errors raised while serializing a dataset.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("dataset of {rows} rows x {columns} columns exceeds worksheet limits")]
    TooLarge { rows: usize, columns: usize },
    #[error("unsupported output format '{0}' (expected 'xlsx' or 'csv')")]
    UnsupportedFormat(String),
}

/// Errors raised while persisting a masked dataset.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("failed to create temporary file: {0}")]
    Staging(#[source] io::Error),
    #[error("failed to write '{}' after {attempts} attempts: {source}", path.display())]
    TransientWriteFailure {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{}': {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
