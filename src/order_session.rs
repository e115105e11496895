//! # Order Session
//!
//! The per-user view state around the parser: the raw pasted text, the records
//! derived from it, and whether cards are shown sorted. Records are always
//! recomputed from the raw text; nothing here survives a re-parse.

use crate::order_types::OrderRecord;
use crate::record_extractor::RecordExtractor;
use serde::{Deserialize, Serialize};

/// Summary counters shown above the cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Raw index-code matches in the pasted text, duplicates included
    pub found: usize,
    /// Records currently shown
    pub unique: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSession {
    pub raw_text: String,
    pub records: Vec<OrderRecord>,
    pub total_occurrences: usize,
    pub sorted: bool,
}

impl OrderSession {
    /// Parse `raw` with the default extractor
    pub fn from_raw(raw: &str) -> Self {
        let mut session = Self::default();
        session.reparse(&RecordExtractor::new(), raw);
        session
    }

    /// Replace the raw text and rebuild all records from it; the sort flag is kept
    pub fn reparse(&mut self, extractor: &RecordExtractor, raw: &str) {
        let outcome = extractor.extract(raw);
        self.raw_text = raw.to_string();
        self.records = outcome.records;
        self.total_occurrences = outcome.total_occurrences;
    }

    pub fn clear(&mut self) {
        self.raw_text.clear();
        self.records.clear();
        self.total_occurrences = 0;
    }

    /// Drop the record with the given index code; other records are untouched
    ///
    /// The found counter still reflects the raw text, so it is not reduced.
    pub fn remove(&mut self, index: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.index != index);
        self.records.len() != before
    }

    pub fn set_sorted(&mut self, sorted: bool) {
        self.sorted = sorted;
    }

    pub fn toggle_sorted(&mut self) -> bool {
        self.sorted = !self.sorted;
        self.sorted
    }

    pub fn find(&self, index: &str) -> Option<&OrderRecord> {
        self.records.iter().find(|record| record.index == index)
    }

    /// Records in display order: byte-wise by index when sorted, discovery order otherwise
    pub fn visible_records(&self) -> Vec<&OrderRecord> {
        let mut records: Vec<&OrderRecord> = self.records.iter().collect();
        if self.sorted {
            records.sort_by(|a, b| a.index.as_bytes().cmp(b.index.as_bytes()));
        }
        records
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            found: self.total_occurrences,
            unique: self.records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
