//! # rbiclean
//!
//! Normalizes bank branch directory sheets (IFSC/MICR listings) into one
//! clean, consistently formatted dataset.
//!
//! ## Pipeline
//!
//! - **Lexical rules**: pattern rewrites for punctuation, spacing, address
//!   keywords and postal codes ([`lexical`])
//! - **Line normalizer**: casing and cleanup of one free-text field
//!   ([`normalize_line`])
//! - **Postal-code extractor**: pulls the PIN out of an address and puts it
//!   back at the end ([`extract_postal_code`])
//! - **Name canonicalizer**: re-cases bank names, keeping known
//!   abbreviations ([`canonicalize_name`])
//! - **Record normalizer**: applies all of the above to the nine columns of
//!   a row and adds the abbreviation column ([`normalize_record`])
//!
//! ## Quick Start
//!
//! ```
//! use rbiclean::{AbbreviationTable, Normalizer, RawRecord};
//!
//! let mut table = AbbreviationTable::new();
//! table.insert("STATE BANK OF INDIA", "SBI");
//!
//! let raw = RawRecord::from_fields(
//!     [
//!         "STATE BANK OF INDIA", "sbin0000001", "600002001", "anna salai",
//!         "No.5 Anna Salai Chennai 600002", "044-28512345", "CHENNAI", "CHENNAI", "TAMIL NADU",
//!     ],
//!     2,
//! )?;
//!
//! let clean = Normalizer::new(table).normalize(&raw);
//! assert_eq!(clean.bank, "State Bank of India");
//! assert_eq!(clean.address, "No 5 Anna Salai Chennai - 600002");
//! assert_eq!(clean.abbreviation, "SBI");
//! # Ok::<(), rbiclean::Error>(())
//! ```

pub mod combine;
pub mod error;
pub mod ingest;
pub mod lexical;
pub mod line;
pub mod name;
pub mod options;
pub mod postal;
pub mod record;
pub mod sink;
pub mod tables;

// Re-exports
pub use combine::{combine_csvs, CombineSummary};
pub use error::{Error, Result};
pub use ingest::{discover_csv_files, read_sheet, Sheet};
pub use line::normalize_line;
pub use name::{canonicalize_name, get_abbreviation};
pub use options::{ErrorMode, ProcessOptions, Thresholds};
pub use postal::{attach_postal_code, extract_postal_code};
pub use record::{
    normalize_record, normalize_record_with, CleanRecord, RawRecord, HEADERS, OUTPUT_HEADERS,
};
pub use sink::CsvSink;
pub use tables::{AbbreviationTable, FilterPattern, SubstitutionFilterSet, SubstitutionRule};

use rayon::prelude::*;

/// Record normalizer bound to its lookup tables.
///
/// The tables are read-only once built, so one `Normalizer` can be shared
/// across threads.
///
/// # Example
///
/// ```no_run
/// use rbiclean::{AbbreviationTable, Normalizer, SubstitutionFilterSet, Thresholds};
///
/// let normalizer = Normalizer::new(AbbreviationTable::from_path("banks.json")?)
///     .with_filters(SubstitutionFilterSet::from_path("filters.json")?)
///     .with_thresholds(Thresholds { min_contact_len: 8, ..Thresholds::default() });
/// # Ok::<(), rbiclean::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    table: AbbreviationTable,
    filters: Option<SubstitutionFilterSet>,
    thresholds: Thresholds,
}

impl Normalizer {
    /// Creates a normalizer without substitution filters.
    pub fn new(table: AbbreviationTable) -> Self {
        Self {
            table,
            filters: None,
            thresholds: Thresholds::default(),
        }
    }

    /// Applies `filters` to every cleaned record.
    pub fn with_filters(mut self, filters: SubstitutionFilterSet) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Overrides the record-level thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn table(&self) -> &AbbreviationTable {
        &self.table
    }

    pub fn filters(&self) -> Option<&SubstitutionFilterSet> {
        self.filters.as_ref()
    }

    /// Cleans one record.
    pub fn normalize(&self, raw: &RawRecord) -> CleanRecord {
        self.clean(raw, true)
    }

    /// Cleans a batch of records, optionally on the rayon thread pool.
    /// Output order always matches input order.
    pub fn normalize_batch(&self, records: &[RawRecord], parallel: bool) -> Vec<CleanRecord> {
        self.clean_batch(records, parallel, true)
    }

    pub(crate) fn clean_batch(
        &self,
        records: &[RawRecord],
        parallel: bool,
        use_filters: bool,
    ) -> Vec<CleanRecord> {
        if parallel {
            records.par_iter().map(|raw| self.clean(raw, use_filters)).collect()
        } else {
            records.iter().map(|raw| self.clean(raw, use_filters)).collect()
        }
    }

    fn clean(&self, raw: &RawRecord, use_filters: bool) -> CleanRecord {
        let filters = self.filters.as_ref().filter(|_| use_filters);
        normalize_record_with(raw, &self.table, filters, &self.thresholds)
    }
}
