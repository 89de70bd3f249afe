//! Read-only lookup tables loaded once per run.
//!
//! - [`AbbreviationTable`]: upper-cased bank name -> abbreviation
//!   (`{"STATE BANK OF INDIA": "SBI"}`)
//! - [`SubstitutionFilterSet`]: ordered `(pattern, from, to)` rules applied
//!   to a whole cleaned record (`{"replace": [["*", "from", "to"]]}`)
//!
//! Both are plain data once built and are shared by reference across worker
//! threads.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Joins record fields while filters run; never valid inside a filter.
pub const FIELD_SEPARATOR: char = '\u{1f}';

const BUILTIN_BANKS: &str = include_str!("../data/banks.json");

// ============================================================================
// Abbreviation table
// ============================================================================

/// Maps an upper-cased bank name to its abbreviation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationTable {
    entries: HashMap<String, String>,
}

impl AbbreviationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_BANKS)
    }

    /// Parses a `{"NAME": "ABBR"}` JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    /// Loads a JSON table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_json_str(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "Loaded abbreviation table");
        Ok(table)
    }

    /// Adds or replaces an entry. The name is upper-cased.
    pub fn insert(&mut self, name: &str, abbreviation: impl Into<String>) {
        self.entries.insert(name.to_uppercase(), abbreviation.into());
    }

    /// Looks up a name (case-insensitively).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for AbbreviationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, abbreviation)| (name.to_uppercase(), abbreviation))
                .collect(),
        }
    }
}

// ============================================================================
// Substitution filters
// ============================================================================

/// Which part of a record a rule targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPattern {
    /// `"*"`: the whole record.
    Wildcard,
    /// Any other pattern. Loaded, but not applied.
    Other(String),
}

impl FilterPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            FilterPattern::Wildcard
        } else {
            FilterPattern::Other(pattern.to_string())
        }
    }
}

/// One literal `from -> to` replacement. Built only through
/// [`SubstitutionRule::new`], so every rule is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRule {
    pattern: FilterPattern,
    source: String,
    replacement: String,
}

impl SubstitutionRule {
    /// Builds a rule, rejecting an empty source and any text containing the
    /// field separator.
    pub fn new(
        pattern: &str,
        source: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let source = source.into();
        let replacement = replacement.into();

        if source.is_empty() {
            return Err(Error::InvalidFilter("empty source text".to_string()));
        }
        if source.contains(FIELD_SEPARATOR) || replacement.contains(FIELD_SEPARATOR) {
            return Err(Error::InvalidFilter(format!(
                "{source:?} -> {replacement:?} contains the field separator"
            )));
        }

        Ok(Self {
            pattern: FilterPattern::parse(pattern),
            source,
            replacement,
        })
    }

    /// Shorthand for a `"*"` rule.
    pub fn wildcard(source: impl Into<String>, replacement: impl Into<String>) -> Result<Self> {
        Self::new("*", source, replacement)
    }

    pub fn pattern(&self) -> &FilterPattern {
        &self.pattern
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Only wildcard rules change records.
    pub fn is_active(&self) -> bool {
        self.pattern == FilterPattern::Wildcard
    }
}

#[derive(Deserialize)]
struct FilterFile {
    #[serde(default)]
    replace: Vec<(String, String, String)>,
}

/// Ordered substitution rules applied after per-field cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionFilterSet {
    rules: Vec<SubstitutionRule>,
}

impl SubstitutionFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule; rules run in insertion order.
    pub fn push(&mut self, rule: SubstitutionRule) {
        if let FilterPattern::Other(pattern) = &rule.pattern {
            tracing::debug!(
                pattern = %pattern,
                source = %rule.source,
                "Non-wildcard filter will not be applied"
            );
        }
        self.rules.push(rule);
    }

    /// Parses a `{"replace": [[pattern, from, to], ...]}` document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: FilterFile = serde_json::from_str(json)?;
        let mut set = Self::new();
        for (pattern, source, replacement) in file.replace {
            set.push(SubstitutionRule::new(&pattern, source, replacement)?);
        }
        Ok(set)
    }

    /// Loads a filter document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let set = Self::from_json_str(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), rules = set.len(), "Loaded substitution filters");
        Ok(set)
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every wildcard rule to the record as a whole.
    ///
    /// Fields are joined with [`FIELD_SEPARATOR`], each replacement runs over
    /// the joined text, the result is trimmed and split back. Rules cannot
    /// contain the separator, so the field count is preserved.
    pub fn apply(&self, fields: &[String]) -> Vec<String> {
        let mut joined = fields.join(&FIELD_SEPARATOR.to_string());

        for rule in self.rules.iter().filter(|rule| rule.is_active()) {
            joined = joined.replace(&rule.source, &rule.replacement);
        }

        joined
            .trim()
            .split(FIELD_SEPARATOR)
            .map(str::to_string)
            .collect()
    }
}

impl FromIterator<SubstitutionRule> for SubstitutionFilterSet {
    fn from_iter<I: IntoIterator<Item = SubstitutionRule>>(iter: I) -> Self {
        let mut set = Self::new();
        for rule in iter {
            set.push(rule);
        }
        set
    }
}
