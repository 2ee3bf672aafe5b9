use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tabmask_core::Dataset;

use crate::errors::OutputError;
use crate::load::Delimiter;
use crate::output::{DatasetWriter, OutputFormat};

/// Delimited text writer; header row first, blanks as empty fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter {
    delimiter: Delimiter,
}

impl CsvWriter {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    /// Write the dataset to any sink, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, dataset: &Dataset, sink: W) -> Result<u64, OutputError> {
        let counting = CountingWriter::new(sink);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter.as_byte())
            .from_writer(counting);

        writer.write_record(dataset.column_names())?;
        for row in dataset.rows() {
            writer.write_record(row.iter().map(|value| value.to_string()))?;
        }

        writer.flush()?;
        let counting = writer.into_inner().map_err(|err| err.into_error())?;
        Ok(counting.bytes_written())
    }
}

impl DatasetWriter for CsvWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), OutputError> {
        let file = BufWriter::new(File::create(path)?);
        self.write_to(dataset, file)?;
        Ok(())
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
