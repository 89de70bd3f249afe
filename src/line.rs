//! Line normalization.
//!
//! A single pass applies, in order:
//!
//! 1. Trim and collapse repeated punctuation/space characters
//! 2. Per-token casing (short tokens upper, connector words kept, others
//!    title-cased)
//! 3. Address mode only: keyword rewrites, duplicate clause removal and
//!    ordinal suffix lower-casing
//! 4. Whitespace collapse
//! 5. Comma spacing (`a ,b` -> `a, b`)
//! 6. Bracket spacing
//! 7. Dangling punctuation per token
//! 8. Trailing punctuation on the whole line
//! 9. `" OF "` -> `" of "`
//!
//! Later steps can expose work for earlier ones (a comma split leaves a
//! two-letter token that should have been upper-cased), so the pass is
//! repeated until the line stops changing. The result is therefore a fixed
//! point: normalizing it again returns it unchanged.

use std::collections::HashSet;

use crate::lexical::{
    alnum_count, apply_address_keywords, bracket_space, collapse_repeats, collapse_spaces,
    lowercase_number_suffixes, strip_dangling, strip_trailing, title_case, EXCLUDE_WORDS,
};
use crate::options::MIN_TITLE_CASE_ALNUM;

/// Upper bound on repeated passes. Real lines settle in two or three.
const MAX_PASSES: usize = 8;

/// Normalizes one free-text field.
///
/// `address_mode` enables the address keyword rules, duplicate clause
/// removal and ordinal suffix fixing; use it for address, city and district
/// values.
///
/// # Example
///
/// ```
/// use rbiclean::normalize_line;
///
/// assert_eq!(normalize_line("  main   branch ", false), "Main Branch");
/// assert_eq!(normalize_line("12TH CROSS, dist. salem", true), "12th Cross, Salem");
/// ```
pub fn normalize_line(text: &str, address_mode: bool) -> String {
    let mut line = clean_pass(text, address_mode);

    for _ in 1..MAX_PASSES {
        let next = clean_pass(&line, address_mode);
        if next == line {
            break;
        }
        line = next;
    }

    line
}

/// Runs the ordered rule chain once.
fn clean_pass(text: &str, address_mode: bool) -> String {
    // 1.
    let line = collapse_repeats(text.trim());

    // 2.
    let mut line = case_tokens(&line);

    // 3.
    if address_mode {
        line = apply_address_keywords(&line);
        line = remove_duplicate_clauses(&line);
        line = lowercase_number_suffixes(&line);
    }

    // 4.
    let line = collapse_spaces(&line);

    // 5.
    let line = space_commas(&line);

    // 6.
    let line = bracket_space(&line);

    // 7.
    let tokens: Vec<String> = line.split_whitespace().filter_map(strip_dangling).collect();

    // 8.
    let line = strip_trailing(&tokens.join(" "));

    // 9.
    line.replace(" OF ", " of ")
}

/// Applies the casing rule to every space-separated token.
fn case_tokens(line: &str) -> String {
    line.split_whitespace()
        .map(case_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn case_token(token: &str) -> String {
    if alnum_count(token) < MIN_TITLE_CASE_ALNUM {
        token.to_uppercase()
    } else if EXCLUDE_WORDS.contains(&token) {
        token.to_string()
    } else {
        title_case(token)
    }
}

/// Drops comma-separated clauses already seen earlier in the line.
///
/// Clauses are compared after trimming, so `"A, B,A"` keeps one `A`.
fn remove_duplicate_clauses(line: &str) -> String {
    let mut seen = HashSet::new();
    line.split(',')
        .filter(|clause| seen.insert(clause.trim()))
        .collect::<Vec<_>>()
        .join(",")
}

fn space_commas(line: &str) -> String {
    line.split(',').map(str::trim).collect::<Vec<_>>().join(", ")
}
