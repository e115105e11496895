//! # Order Cards
//!
//! Extracts product records from copy-pasted order lists and renders each one
//! as a labeled barcode card, delivered through a Telegram bot.

pub mod barcode;
pub mod bot;
pub mod bot_config;
pub mod card_render;
pub mod db;
pub mod dialogue;
pub mod line_normalizer;
pub mod localization;
pub mod order_errors;
pub mod order_patterns;
pub mod order_session;
pub mod order_types;
pub mod record_extractor;

pub use order_types::{OrderRecord, ParseOutcome};

/// Parse pasted order-list text with the default extractor
///
/// Total over all inputs: text without index codes yields an empty outcome.
///
/// ```rust
/// let outcome = order_cards::parse("111.222.33\n444.555.66");
/// assert_eq!(outcome.records.len(), 2);
/// assert_eq!(outcome.total_occurrences, 2);
/// ```
pub fn parse(raw_text: &str) -> ParseOutcome {
    record_extractor::RecordExtractor::new().extract(raw_text)
}
