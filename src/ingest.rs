//! Reading bank directory sheets from disk.
//!
//! A sheet is a CSV file whose first row is the nine-column header
//! (`BANK, IFSC, MICR, BRANCH, ADDRESS, CONTACT, CITY, DISTRICT, STATE`).

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ByteRecord;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::options::ProcessOptions;
use crate::record::{RawRecord, FIELD_COUNT, HEADERS};

/// The rows read from one sheet.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub path: PathBuf,
    pub records: Vec<RawRecord>,
    /// Malformed rows dropped in lenient mode.
    pub skipped: usize,
}

/// Lists the `.csv` files directly inside `dir`, sorted by path.
pub fn discover_csv_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_csv(&path) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoInputFiles(dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Reads a sheet from a file.
pub fn read_sheet(path: impl AsRef<Path>, options: &ProcessOptions) -> Result<Sheet> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_sheet_from(path, file, options)
}

/// Reads a sheet from any reader; `path` is used for errors and logs.
pub fn read_sheet_from<R: Read>(path: &Path, reader: R, options: &ProcessOptions) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut sheet = Sheet {
        path: path.to_path_buf(),
        ..Default::default()
    };

    let mut rows = reader.byte_records();

    match rows.next() {
        Some(header) => check_header(path, &header.map_err(|e| Error::csv_at(path, e))?)?,
        None => {
            tracing::warn!(path = %path.display(), "Sheet is empty");
            return Ok(sheet);
        }
    }

    for row in rows {
        let row = row.map_err(|e| Error::csv_at(path, e))?;
        let line = row.position().map_or(0, |pos| pos.line());
        let fields = row.iter().map(|cell| decode_cell(cell, options.ascii_only));

        match RawRecord::from_fields(fields, line) {
            Ok(record) => sheet.records.push(record),
            Err(err) if options.is_lenient() => {
                tracing::warn!(
                    path = %path.display(),
                    line,
                    error = %err,
                    "Skipping malformed row"
                );
                sheet.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        path = %path.display(),
        rows = sheet.records.len(),
        skipped = sheet.skipped,
        "Read sheet"
    );

    Ok(sheet)
}

fn check_header(path: &Path, header: &ByteRecord) -> Result<()> {
    if header.len() != FIELD_COUNT {
        return Err(Error::HeaderMismatch {
            path: path.to_path_buf(),
            found: header.len(),
        });
    }

    let names: Vec<String> = header
        .iter()
        .map(|cell| decode_cell(cell, true).trim().to_uppercase())
        .collect();

    if names.iter().zip(HEADERS).any(|(found, expected)| found != expected) {
        tracing::warn!(
            path = %path.display(),
            header = %names.join(","),
            "Unexpected column names; reading columns by position"
        );
    }

    Ok(())
}

/// Decodes a cell, replacing invalid UTF-8. With `ascii_only`, accents are
/// decomposed and every non-ASCII character dropped.
fn decode_cell(cell: &[u8], ascii_only: bool) -> String {
    let text = String::from_utf8_lossy(cell);
    if ascii_only {
        fold_ascii(&text)
    } else {
        text.into_owned()
    }
}

/// `"Bāngalore"` -> `"Bangalore"`
pub fn fold_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}
