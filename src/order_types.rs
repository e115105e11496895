//! # Order Types Module
//!
//! This module defines the core types produced by order-list parsing.

use crate::order_patterns::DEFAULT_HEADER_BLACKLIST;
use serde::{Deserialize, Serialize};

/// One product entry per distinct index code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// The index code as found in the text (e.g., "123.456.78")
    pub index: String,
    /// First non-header, non-numeric line following the code
    pub description: Option<String>,
    /// First bare number following the code (may be fractional)
    pub quantity_primary: Option<f64>,
    /// Second bare number following the code, kept only when it is whole
    pub quantity_packs: Option<f64>,
    /// How many times the code occurred in the pasted text
    pub occurrence_count: u32,
}

impl OrderRecord {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            description: None,
            quantity_primary: None,
            quantity_packs: None,
            occurrence_count: 1,
        }
    }

    /// The index code with separators removed, as encoded in the barcode
    pub fn plain_index(&self) -> String {
        self.index.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Fill only the slots that are still empty; a set field is never overwritten
    pub fn merge_from(&mut self, other: OrderRecord) {
        self.occurrence_count += 1;
        if self.description.is_none() {
            self.description = other.description;
        }
        if self.quantity_primary.is_none() {
            self.quantity_primary = other.quantity_primary;
        }
        if self.quantity_packs.is_none() {
            self.quantity_packs = other.quantity_packs;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.description.is_some() && self.quantity_primary.is_some() && self.quantity_packs.is_some()
    }
}

/// Result of one parse pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    /// Records in first-discovery order
    pub records: Vec<OrderRecord>,
    /// Every raw index-code match, duplicates included
    pub total_occurrences: usize,
}

impl ParseOutcome {
    pub fn unique_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: &str) -> Option<&OrderRecord> {
        self.records.iter().find(|record| record.index == index)
    }
}

/// Configuration options for record extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Custom regex for index codes. If None, uses the default `DDD.DDD.DD` pattern
    pub custom_index_pattern: Option<String>,
    /// Lowercase substrings marking a line as a column header or label
    pub header_blacklist: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            custom_index_pattern: None,
            header_blacklist: DEFAULT_HEADER_BLACKLIST
                .iter()
                .map(|word| word.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_index() {
        let record = OrderRecord::new("123.456.78");
        assert_eq!(record.plain_index(), "12345678");
    }

    #[test]
    fn test_merge_fills_only_empty_slots() {
        let mut first = OrderRecord::new("123.456.78");
        first.description = Some("Krzesło".to_string());

        let mut second = OrderRecord::new("123.456.78");
        second.description = Some("Inny opis".to_string());
        second.quantity_primary = Some(4.0);

        first.merge_from(second);

        assert_eq!(first.description.as_deref(), Some("Krzesło"));
        assert_eq!(first.quantity_primary, Some(4.0));
        assert_eq!(first.quantity_packs, None);
        assert_eq!(first.occurrence_count, 2);
    }

    #[test]
    fn test_default_blacklist_is_lowercase() {
        let config = ExtractorConfig::default();
        assert!(!config.header_blacklist.is_empty());
        for word in &config.header_blacklist {
            assert_eq!(word, &word.to_lowercase());
        }
    }
}
