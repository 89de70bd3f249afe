//! Combining a directory of sheets into one master file.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::ingest::{discover_csv_files, read_sheet};
use crate::options::ProcessOptions;
use crate::sink::CsvSink;
use crate::Normalizer;

/// Counts from a combine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineSummary {
    /// Sheets read.
    pub files: usize,
    /// Data rows written to the master file.
    pub rows_written: usize,
    /// Malformed rows skipped in lenient mode.
    pub rows_skipped: usize,
}

/// Cleans every sheet in `src` and writes the rows, in file order, to a
/// single master CSV with one header row.
///
/// A master file that already exists inside `src` is not read back in.
///
/// Rows are staged in a temporary file next to `master`, which replaces the
/// master only once every sheet has been written. A failed run leaves any
/// previous master untouched.
///
/// # Example
///
/// ```no_run
/// use rbiclean::{combine_csvs, AbbreviationTable, Normalizer, ProcessOptions};
///
/// let normalizer = Normalizer::new(AbbreviationTable::builtin()?);
/// let summary = combine_csvs("sheets", "master.csv", &normalizer, &ProcessOptions::default())?;
/// println!("{} rows", summary.rows_written);
/// # Ok::<(), rbiclean::Error>(())
/// ```
pub fn combine_csvs(
    src: impl AsRef<Path>,
    master: impl AsRef<Path>,
    normalizer: &Normalizer,
    options: &ProcessOptions,
) -> Result<CombineSummary> {
    let src = src.as_ref();
    let master = master.as_ref();

    let mut files = discover_csv_files(src)?;
    if let Ok(master_path) = fs::canonicalize(master) {
        files.retain(|file| fs::canonicalize(file).map_or(true, |path| path != master_path));
        if files.is_empty() {
            return Err(Error::NoInputFiles(src.to_path_buf()));
        }
    }

    let staged = NamedTempFile::new_in(staging_dir(master))?;
    let mut sink = CsvSink::at(BufWriter::new(staged), master)?;
    let mut summary = CombineSummary::default();

    for path in &files {
        let sheet = read_sheet(path, options)?;
        let records =
            normalizer.clean_batch(&sheet.records, options.parallel, options.apply_filters);
        sink.write_all(&records)?;

        summary.files += 1;
        summary.rows_written += records.len();
        summary.rows_skipped += sheet.skipped;
    }

    let staged = sink
        .into_inner()?
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    staged.persist(master).map_err(|e| Error::Io(e.error))?;

    tracing::info!(
        files = summary.files,
        rows_written = summary.rows_written,
        rows_skipped = summary.rows_skipped,
        master = %master.display(),
        "Combined sheets"
    );

    Ok(summary)
}

/// Directory the master is staged in, so the final rename stays on one
/// filesystem.
fn staging_dir(master: &Path) -> &Path {
    match master.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
