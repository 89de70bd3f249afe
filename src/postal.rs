//! Postal-code extraction for address fields.
//!
//! The code is pulled out before the address is normalized, so the line
//! rules never see (or mangle) it, and is reattached afterwards as
//! `"<address> - <code>"`.

use crate::lexical::{find_postal_code, find_trailing_number, remove_postal_codes};

/// Splits an address into `(remainder, code)`.
///
/// A six-digit code (or `NNN NNN`) wins; every such code is removed from the
/// remainder and the first one is returned without spaces. Failing that, a
/// trailing run of digits is taken as the code. With neither, the code is
/// empty and the address comes back unchanged.
pub fn extract_postal_code(address: &str) -> (String, String) {
    if let Some(code) = find_postal_code(address) {
        let remainder = remove_postal_codes(address).trim().to_string();
        return (remainder, code);
    }

    if let Some((digits, start)) = find_trailing_number(address) {
        return (address[..start].trim().to_string(), digits.to_string());
    }

    (address.to_string(), String::new())
}

/// Appends `" - <code>"` to a cleaned address when a code was extracted.
pub fn attach_postal_code(address: String, code: &str) -> String {
    if code.is_empty() {
        address
    } else {
        format!("{address} - {code}")
    }
}
