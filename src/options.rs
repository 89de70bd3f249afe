//! Processing options and tunable thresholds.

/// Tokens whose alphanumeric length is below this are upper-cased as acronyms.
pub const MIN_TITLE_CASE_ALNUM: usize = 3;

/// Numeric (MICR) codes shorter than this are blanked.
pub const MIN_MICR_LEN: usize = 6;

/// Contact values shorter than this are blanked.
pub const MIN_CONTACT_LEN: usize = 6;

/// Districts with fewer alphanumeric characters fall back to the city.
pub const MIN_DISTRICT_ALNUM: usize = 4;

/// Record-level heuristics applied by the record normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Minimum length of a kept numeric code.
    pub min_micr_len: usize,
    /// Minimum length of a kept contact value.
    pub min_contact_len: usize,
    /// Minimum alphanumeric count of a kept district.
    pub min_district_alnum: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_micr_len: MIN_MICR_LEN,
            min_contact_len: MIN_CONTACT_LEN,
            min_district_alnum: MIN_DISTRICT_ALNUM,
        }
    }
}

/// Options for controlling a combine run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// How to handle malformed rows.
    pub error_mode: ErrorMode,

    /// Whether to normalize record batches in parallel.
    pub parallel: bool,

    /// Whether to fold input cells to ASCII before cleaning.
    pub ascii_only: bool,

    /// Whether the substitution filter set is applied.
    pub apply_filters: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            ascii_only: true,
            apply_filters: true,
        }
    }
}

impl ProcessOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets lenient error handling (skip malformed rows).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Sets strict error handling (fail on the first malformed row).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Keeps non-ASCII characters in input cells.
    pub fn keep_unicode(mut self) -> Self {
        self.ascii_only = false;
        self
    }

    /// Enables or disables the substitution filter pass.
    pub fn with_filters_enabled(mut self, enabled: bool) -> Self {
        self.apply_filters = enabled;
        self
    }

    /// Returns true if malformed rows should be skipped.
    pub fn is_lenient(&self) -> bool {
        matches!(self.error_mode, ErrorMode::Lenient)
    }
}

/// How to handle malformed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail immediately on any malformed row.
    #[default]
    Strict,
    /// Skip malformed rows and continue.
    Lenient,
}
