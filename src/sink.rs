//! Writing the combined master sheet.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::record::{CleanRecord, OUTPUT_HEADERS};

/// CSV writer for cleaned records. Every field is quoted and the header is
/// written once, on creation.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    path: PathBuf,
    rows: usize,
}

impl CsvSink<BufWriter<File>> {
    /// Creates (or truncates) the master file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Self::at(BufWriter::new(file), path)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps any writer.
    pub fn new(writer: W) -> Result<Self> {
        Self::at(writer, Path::new(""))
    }

    /// Wraps a writer whose rows end up at `path`; the path only labels errors.
    pub(crate) fn at(writer: W, path: &Path) -> Result<Self> {
        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);

        let mut sink = Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
        };
        sink.writer
            .write_record(OUTPUT_HEADERS)
            .map_err(|e| Error::csv_at(&sink.path, e))?;
        Ok(sink)
    }

    pub fn write(&mut self, record: &CleanRecord) -> Result<()> {
        self.writer
            .write_record(record.fields())
            .map_err(|e| Error::csv_at(&self.path, e))?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a CleanRecord>,
    ) -> Result<()> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Data rows written so far (the header is not counted).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}
