//! RUT checksum validation.
//!
//! A RUT is a numeric body of 1–8 digits, a hyphen and a check character
//! (`0`–`9` or `K`). The check character is the modulus-11 weighted sum of the
//! body, weights `2,3,4,5,6,7` cycling from the least-significant digit.

use once_cell::sync::Lazy;
use regex::Regex;

static RUT_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,8}-[0-9kK]$").expect("static RUT pattern"));

/// Returns `true` iff `rut` has the canonical shape and its check character
/// matches the computed one (case-insensitive).
///
/// Total over all inputs: malformed strings are simply invalid.
pub fn validate(rut: &str) -> bool {
    if !RUT_SHAPE.is_match(rut) {
        return false;
    }
    let Some((body, supplied)) = rut.split_once('-') else {
        return false;
    };
    let Some(expected) = check_digit(body) else {
        return false;
    };
    supplied.eq_ignore_ascii_case(&expected.to_string())
}

/// Computes the check character for a numeric body.
///
/// Returns `None` if `body` is empty or contains a non-digit.
pub fn check_digit(body: &str) -> Option<char> {
    if body.is_empty() {
        return None;
    }
    let mut sum: u32 = 0;
    let mut weight: u32 = 2;
    for ch in body.chars().rev() {
        sum += ch.to_digit(10)? * weight;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }
    match 11 - sum % 11 {
        11 => Some('0'),
        10 => Some('K'),
        n => char::from_digit(n, 10),
    }
}
