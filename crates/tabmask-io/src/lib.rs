//! File adapters for tabmask: loading source tables and persisting masked
//! datasets through a temporary file with retried publication.

pub mod errors;
pub mod load;
pub mod output;
pub mod save;

pub use errors::{LoadError, OutputError, SaveError};
pub use load::{Delimiter, load_path};
pub use output::{CsvWriter, DatasetWriter, OutputFormat, XlsxWriter};
pub use save::{
    AcceptSuggested, CancelPrompt, DestinationPrompt, FixedDestination, FsPublisher, Publisher,
    RetryPolicy, SaveOutcome, Saver, default_destination, record_save_outcome,
};
