//! Error types for rbiclean library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rbiclean operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rbiclean library.
///
/// The text transforms themselves never fail; these errors come from the
/// boundary (reading sheets, loading lookup tables, writing the master file)
/// and from building a record out of a row with the wrong shape.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV reading or writing error.
    #[error("CSV error in {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Lookup table could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row does not carry exactly the expected number of fields.
    #[error("expected {expected} fields, found {found} (line {line})")]
    FieldCount {
        expected: usize,
        found: usize,
        line: u64,
    },

    /// The header row of a sheet has the wrong number of columns.
    #[error("header of {path} has {found} columns, expected 9")]
    HeaderMismatch { path: PathBuf, found: usize },

    /// A substitution filter cannot be applied safely.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// The input path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No CSV sheets were found in the input directory.
    #[error("No CSV files found in {0}")]
    NoInputFiles(PathBuf),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Attaches a file path to a CSV error raised without one.
    pub(crate) fn csv_at(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
