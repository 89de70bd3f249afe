//! Bank name canonicalization.

use crate::tables::AbbreviationTable;

/// Re-cases a bank name, keeping its known abbreviation verbatim.
///
/// The name is upper-cased and looked up in `table`. Each space-separated
/// token then becomes: the abbreviation as is, `"of"` for `"OF"`, or the
/// token with its first character upper-cased and the rest lower-cased.
///
/// ```
/// use rbiclean::{canonicalize_name, AbbreviationTable};
///
/// let mut table = AbbreviationTable::new();
/// table.insert("HDFC BANK", "HDFC");
/// assert_eq!(canonicalize_name("hdfc bank", &table), "HDFC Bank");
/// ```
pub fn canonicalize_name(raw_name: &str, table: &AbbreviationTable) -> String {
    let name = raw_name.to_uppercase();
    let abbreviation = table.get(&name).unwrap_or("");

    name.split(' ')
        .map(|token| {
            if token == abbreviation {
                token.to_string()
            } else if token == "OF" {
                "of".to_string()
            } else {
                capitalize(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Returns the abbreviation for `name`, or an empty string when unknown.
pub fn get_abbreviation(name: &str, table: &AbbreviationTable) -> String {
    table.get(name).unwrap_or_default().to_string()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
