//! Bank directory records and the per-field cleaning pipeline.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::lexical::alnum_count;
use crate::line::normalize_line;
use crate::name::{canonicalize_name, get_abbreviation};
use crate::options::Thresholds;
use crate::postal::{attach_postal_code, extract_postal_code};
use crate::tables::{AbbreviationTable, SubstitutionFilterSet};

/// Number of columns in an input sheet.
pub const FIELD_COUNT: usize = 9;

/// Input column names, in order.
pub const HEADERS: [&str; FIELD_COUNT] = [
    "BANK", "IFSC", "MICR", "BRANCH", "ADDRESS", "CONTACT", "CITY", "DISTRICT", "STATE",
];

/// Output column names: the input columns plus the abbreviation.
pub const OUTPUT_HEADERS: [&str; FIELD_COUNT + 1] = [
    "BANK",
    "IFSC",
    "MICR",
    "BRANCH",
    "ADDRESS",
    "CONTACT",
    "CITY",
    "DISTRICT",
    "STATE",
    "ABBREVIATION",
];

/// One uncleaned row of a bank directory sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub bank: String,
    pub ifsc: String,
    pub micr: String,
    pub branch: String,
    pub address: String,
    pub contact: String,
    pub city: String,
    pub district: String,
    pub state: String,
}

impl RawRecord {
    /// Builds a record from positional fields.
    ///
    /// `line` is only used for the error when the row does not have exactly
    /// nine fields.
    pub fn from_fields<I, S>(fields: I, line: u64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let found = fields.len();

        let fields: [String; FIELD_COUNT] = fields.try_into().map_err(|_| Error::FieldCount {
            expected: FIELD_COUNT,
            found,
            line,
        })?;
        let [bank, ifsc, micr, branch, address, contact, city, district, state] = fields;

        Ok(Self {
            bank,
            ifsc,
            micr,
            branch,
            address,
            contact,
            city,
            district,
            state,
        })
    }

    /// Fields in column order.
    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            &self.bank,
            &self.ifsc,
            &self.micr,
            &self.branch,
            &self.address,
            &self.contact,
            &self.city,
            &self.district,
            &self.state,
        ]
    }
}

/// A cleaned row, ready for the master sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct CleanRecord {
    pub bank: String,
    pub ifsc: String,
    pub micr: String,
    pub branch: String,
    pub address: String,
    pub contact: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub abbreviation: String,
}

impl CleanRecord {
    /// Fields in output column order.
    pub fn fields(&self) -> [&str; FIELD_COUNT + 1] {
        [
            &self.bank,
            &self.ifsc,
            &self.micr,
            &self.branch,
            &self.address,
            &self.contact,
            &self.city,
            &self.district,
            &self.state,
            &self.abbreviation,
        ]
    }

    pub fn into_fields(self) -> [String; FIELD_COUNT + 1] {
        [
            self.bank,
            self.ifsc,
            self.micr,
            self.branch,
            self.address,
            self.contact,
            self.city,
            self.district,
            self.state,
            self.abbreviation,
        ]
    }

    fn from_fields(fields: [String; FIELD_COUNT + 1]) -> Self {
        let [bank, ifsc, micr, branch, address, contact, city, district, state, abbreviation] =
            fields;
        Self {
            bank,
            ifsc,
            micr,
            branch,
            address,
            contact,
            city,
            district,
            state,
            abbreviation,
        }
    }
}

/// Cleans one record with the default thresholds.
pub fn normalize_record(
    raw: &RawRecord,
    table: &AbbreviationTable,
    filters: Option<&SubstitutionFilterSet>,
) -> CleanRecord {
    normalize_record_with(raw, table, filters, &Thresholds::default())
}

/// Cleans one record.
///
/// Fields are processed in column order; the district falls back to the
/// cleaned city and the abbreviation is looked up from the cleaned name.
/// Nothing here fails: unusable values become empty strings.
pub fn normalize_record_with(
    raw: &RawRecord,
    table: &AbbreviationTable,
    filters: Option<&SubstitutionFilterSet>,
    thresholds: &Thresholds,
) -> CleanRecord {
    let [bank, ifsc, micr, branch, address, contact, city, district, state] =
        raw.fields().map(squash);

    let bank = canonicalize_name(&normalize_line(&bank, false), table);
    let ifsc = ifsc.to_uppercase();
    let micr = coerce_micr(&micr, thresholds.min_micr_len);
    let branch = normalize_line(&branch, true);

    let (remainder, code) = extract_postal_code(&address);
    let address = attach_postal_code(normalize_line(&remainder, true), &code);

    let contact = if contact.chars().count() < thresholds.min_contact_len {
        String::new()
    } else {
        contact
    };

    let city = normalize_line(&city, true);
    let mut district = normalize_line(&district, true);
    if alnum_count(&district) < thresholds.min_district_alnum {
        district = city.clone();
    }
    let state = normalize_line(&state, false);
    let abbreviation = get_abbreviation(&normalize_line(&bank, false), table);

    let record = CleanRecord {
        bank,
        ifsc,
        micr,
        branch,
        address,
        contact,
        city,
        district,
        state,
        abbreviation,
    };

    match filters {
        Some(filters) => apply_filters(record, filters),
        None => record,
    }
}

fn apply_filters(record: CleanRecord, filters: &SubstitutionFilterSet) -> CleanRecord {
    let fields = record.into_fields();
    match filters.apply(&fields).try_into() {
        Ok(filtered) => CleanRecord::from_fields(filtered),
        Err(filtered) => {
            tracing::warn!(
                fields = filtered.len(),
                ifsc = %fields[1],
                "Filters changed the field count; record left unfiltered"
            );
            CleanRecord::from_fields(fields)
        }
    }
}

/// Trims and collapses whitespace. Control characters count as whitespace.
fn squash(field: &str) -> String {
    field
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps a numeric code only when it is long enough and parses as a finite
/// number; spreadsheet exports often carry it as `400002001.0`.
fn coerce_micr(micr: &str, min_len: usize) -> String {
    if micr.chars().count() < min_len {
        return String::new();
    }

    match micr.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let value = value.trunc();
            if value == 0.0 {
                "0".to_string()
            } else {
                format!("{value:.0}")
            }
        }
        _ => String::new(),
    }
}
