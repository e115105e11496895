//! # Order Patterns Module
//!
//! This module contains regex patterns and constants used for order-list line classification.

use lazy_static::lazy_static;
use regex::Regex;

// Product index code: three digits, dot, three digits, dot, two digits (e.g. "123.456.78").
// ASCII word boundaries, so a code glued to a letter like "ł" still matches.
pub const INDEX_PATTERN: &str = r"(?-u:\b)[0-9]{3}\.[0-9]{3}\.[0-9]{2}(?-u:\b)";

// A line holding nothing but a number, with an optional fractional part after "." or ","
pub const BARE_NUMBER_PATTERN: &str = r"^-?[0-9]+(?:[.,][0-9]+)?$";

/// Column-header and label words of the reference retailer export (Polish).
/// Matched as lowercase substrings anywhere in a line, not as whole words.
pub const DEFAULT_HEADER_BLACKLIST: &[&str] = &[
    "numer", "cdu", "indeks", "opis", "cena", "ilość", "ilosc", "wartość", "wartosc", "razem",
    "suma", "produkt", "nr", "pozycja", "kod",
];

// Lazy static regexes to avoid recompilation
lazy_static! {
    pub static ref INDEX_REGEX: Regex =
        Regex::new(INDEX_PATTERN).expect("Index code pattern should be valid");
    pub static ref BARE_NUMBER_REGEX: Regex =
        Regex::new(BARE_NUMBER_PATTERN).expect("Bare number pattern should be valid");
}
