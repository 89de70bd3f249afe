//! # Lexical Rules
//!
//! Pattern-based rewrites shared by the line normalizer, the postal-code
//! extractor and the record normalizer. Every rule is a pure function from a
//! string to a string (or, for the postal matchers, to a located match), so
//! each one can be exercised on its own.
//!
//! Rules in the order consumers apply them:
//!
//! 1. **Collapse repeats** - runs of one punctuation/space character
//! 2. **Collapse spaces** - whitespace runs to a single space
//! 3. **Bracket space** - `Road(West)` -> `Road (West)`
//! 4. **Dangling punctuation** - per token
//! 5. **Trailing punctuation** - per line
//! 6. **Address keywords** - No/Door No/Opp/Post Box/Post Office/Dist/RBO/Pin
//! 7. **Number suffixes** - `12Th` -> `12th`
//! 8. **Postal codes** - six digits (or 3+3), with a trailing-number fallback

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Words left exactly as written when title-casing (if long enough to be
/// title-cased at all).
pub const EXCLUDE_WORDS: &[&str] = &["to", "the", "at", "of", "by", "as", "for", "via"];

/// Counts alphanumeric characters, ignoring punctuation and spaces.
pub fn alnum_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}

/// Title-cases a token: a letter is upper-cased when it follows a non-letter
/// and lower-cased otherwise (`o'neil` -> `O'Neil`, `12TH` -> `12Th`).
pub fn title_case(token: &str) -> String {
    let mut result = String::with_capacity(token.len());
    let mut prev_cased = false;

    for c in token.chars() {
        if prev_cased {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        prev_cased = c.is_lowercase() || c.is_uppercase();
    }

    result
}

// ============================================================================
// Spacing and punctuation
// ============================================================================

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_BRACKETS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\S)\((.+?)\)").unwrap());

static RE_DANGLING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\)\]\.,]+$").unwrap());

static RE_TRAILING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\)\]]+$").unwrap());

/// Collapses any run of two or more identical punctuation or whitespace
/// characters into one (`"a,,b"` -> `"a,b"`, `"a  b"` -> `"a b"`).
///
/// Mixed runs such as `", ,"` are left alone.
pub fn collapse_repeats(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if prev == Some(c) && (c.is_ascii_punctuation() || c.is_whitespace()) {
            continue;
        }
        result.push(c);
        prev = Some(c);
    }

    result
}

/// Collapses every whitespace run into a single space.
pub fn collapse_spaces(text: &str) -> String {
    RE_SPACES.replace_all(text, " ").into_owned()
}

/// Inserts a space between a word and an attached parenthesised group.
pub fn bracket_space(text: &str) -> String {
    RE_BRACKETS.replace_all(text, "${1} (${2})").into_owned()
}

/// Cleans one space-separated token.
///
/// Tokens of one character or made only of punctuation are dropped (`None`);
/// otherwise a trailing punctuation run is stripped. Closing brackets,
/// periods and commas are not treated as dangling.
pub fn strip_dangling(token: &str) -> Option<String> {
    let token = token.trim();
    if token.chars().count() <= 1 {
        return None;
    }

    let stripped = RE_DANGLING.replace(token, "");
    if stripped.is_empty() {
        return None;
    }

    Some(stripped.into_owned())
}

/// Strips a trailing punctuation run (anything but letters, digits and
/// closing brackets) from the whole line.
pub fn strip_trailing(line: &str) -> String {
    RE_TRAILING.replace(line, "").into_owned()
}

// ============================================================================
// Address keywords
// ============================================================================

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^a-z0-9]|^)(?:No|Number)[,.\s:\-]").unwrap());

static RE_DOOR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^a-z]|^)D[o/,.\s:\-]+No:").unwrap());

static RE_OPPOSITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^a-z]|^)Opp[/,.\s:\-]").unwrap());

static RE_POST_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^a-z0-9]|^)(?:PB|Postbox)[\s.:]").unwrap());

static RE_POST_OFFICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^a-z0-9]|^)(PO|Post)[\s.:]").unwrap());

static RE_DISTRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^a-z]|^)Dist(?:rict|t)?[.\s:\-]+").unwrap());

static RE_RBO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bRBO\b").unwrap());

static RE_PIN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:Pin|Pincode|Pin code)(?:[^a-z0-9]+)?$").unwrap());

static RE_NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9](?:st|nd|rd|th)\b").unwrap());

/// `No.12`, `Number 12` -> `No: 12`
pub fn normalize_number_label(line: &str) -> String {
    RE_NUMBER.replace_all(line, "${1}No: ").into_owned()
}

/// `D.No:`, `D/No:` -> `Door No:` (runs after [`normalize_number_label`]).
pub fn normalize_door_number(line: &str) -> String {
    RE_DOOR_NUMBER.replace_all(line, "${1}Door No:").into_owned()
}

/// `Opp.`, `Opp ` -> `Opp: `
pub fn normalize_opposite(line: &str) -> String {
    RE_OPPOSITE.replace_all(line, "${1}Opp: ").into_owned()
}

/// `PB`, `Postbox` -> `Post Box `
pub fn expand_post_box(line: &str) -> String {
    RE_POST_BOX.replace_all(line, "${1}Post Box ").into_owned()
}

/// `PO`, `Post` -> `Post Office `
///
/// `Post` already followed by `Office` or `Box` is left as is.
pub fn expand_post_office(line: &str) -> String {
    RE_POST_OFFICE
        .replace_all(line, |caps: &Captures| {
            let end = caps.get(0).map_or(line.len(), |m| m.end());
            let rest = line[end..].to_lowercase();
            let expanded = rest.starts_with("office") || rest.starts_with("box");

            if expanded && caps[2].eq_ignore_ascii_case("post") {
                caps[0].to_string()
            } else {
                format!("{}Post Office ", &caps[1])
            }
        })
        .into_owned()
}

/// Removes a `Dist`/`Distt`/`District` prefix.
pub fn remove_district_prefix(line: &str) -> String {
    RE_DISTRICT.replace_all(line, "${1}").into_owned()
}

/// `RBO` -> `Regional Business Office`
pub fn expand_rbo(line: &str) -> String {
    RE_RBO
        .replace_all(line, "Regional Business Office")
        .into_owned()
}

/// Removes a trailing `Pin`/`Pincode` label left behind by postal-code
/// extraction.
pub fn remove_pin_label(line: &str) -> String {
    RE_PIN_LABEL.replace(line, "").into_owned()
}

/// Applies every address keyword rule in order.
pub fn apply_address_keywords(line: &str) -> String {
    let line = normalize_number_label(line);
    let line = normalize_door_number(&line);
    let line = normalize_opposite(&line);
    let line = expand_post_box(&line);
    let line = expand_post_office(&line);
    let line = remove_district_prefix(&line);
    let line = expand_rbo(&line);
    remove_pin_label(&line)
}

/// Forces ordinal suffixes to lower case (`21St` -> `21st`, `4TH` -> `4th`).
pub fn lowercase_number_suffixes(line: &str) -> String {
    RE_NUMBER_SUFFIX
        .replace_all(line, |caps: &Captures| caps[0].to_lowercase())
        .into_owned()
}

// ============================================================================
// Postal codes
// ============================================================================

static RE_PIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{6}|[0-9]{3}\s[0-9]{3}").unwrap());

static RE_PIN_FALLBACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-]?([0-9]+)$").unwrap());

/// Returns the first six-digit postal code (spaces removed), if any.
pub fn find_postal_code(text: &str) -> Option<String> {
    RE_PIN
        .find(text)
        .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
}

/// Removes every six-digit postal code from `text`.
pub fn remove_postal_codes(text: &str) -> String {
    RE_PIN.replace_all(text, "").into_owned()
}

/// Finds a trailing run of digits, optionally preceded by a space or hyphen.
///
/// Returns the digits and the byte offset where the match (separator
/// included) begins.
pub fn find_trailing_number(text: &str) -> Option<(&str, usize)> {
    let caps = RE_PIN_FALLBACK.captures(text)?;
    let whole = caps.get(0)?;
    let digits = caps.get(1)?;
    Some((digits.as_str(), whole.start()))
}
