//! # Record Extractor
//!
//! Turns normalized order-list lines into one [`OrderRecord`] per distinct index code.
//!
//! ## Features
//!
//! - Header/label lines are skipped using a substring blacklist
//! - Each index code harvests a description and up to two quantities from the lines below it
//! - Repeated codes are merged without ever overwriting a field that is already set
//! - Malformed or non-finite numbers are dropped silently; parsing never fails

use crate::line_normalizer::normalize_lines;
use crate::order_patterns::{BARE_NUMBER_REGEX, INDEX_REGEX};
use crate::order_types::{ExtractorConfig, OrderRecord, ParseOutcome};
use log::{debug, info, trace};
use regex::Regex;
use std::collections::HashMap;

/// Line classifier and record builder for pasted order lists
pub struct RecordExtractor {
    /// Compiled regex for index codes
    index_pattern: Regex,
    /// Configuration options
    config: ExtractorConfig,
}

impl RecordExtractor {
    /// Create an extractor with the default index pattern and header blacklist
    ///
    /// # Examples
    ///
    /// ```rust
    /// use order_cards::record_extractor::RecordExtractor;
    ///
    /// let extractor = RecordExtractor::new();
    /// assert!(extractor.has_index_code("Art. 123.456.78"));
    /// ```
    pub fn new() -> Self {
        debug!("Creating RecordExtractor with default configuration");
        Self {
            index_pattern: INDEX_REGEX.clone(),
            config: ExtractorConfig::default(),
        }
    }

    /// Create an extractor with a custom index code pattern
    ///
    /// ```rust
    /// use order_cards::record_extractor::RecordExtractor;
    ///
    /// let extractor = RecordExtractor::with_pattern(r"\b[0-9]{4}-[0-9]{4}\b")?;
    /// assert!(extractor.has_index_code("1234-5678"));
    /// # Ok::<(), regex::Error>(())
    /// ```
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Self::with_config(ExtractorConfig {
            custom_index_pattern: Some(pattern.to_string()),
            ..Default::default()
        })
    }

    /// Create an extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Result<Self, regex::Error> {
        let index_pattern = if let Some(ref custom_pattern) = config.custom_index_pattern {
            debug!("Using custom index pattern: {}", custom_pattern);
            Regex::new(custom_pattern)?
        } else {
            INDEX_REGEX.clone()
        };

        let config = ExtractorConfig {
            header_blacklist: config
                .header_blacklist
                .iter()
                .map(|word| word.to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
            ..config
        };

        info!(
            "Creating RecordExtractor with custom config: {} header words",
            config.header_blacklist.len()
        );

        Ok(Self {
            index_pattern,
            config,
        })
    }

    pub fn pattern_str(&self) -> &str {
        self.index_pattern.as_str()
    }

    /// True when the lowercased line contains any blacklisted header word
    pub fn is_header_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.config
            .header_blacklist
            .iter()
            .any(|word| lower.contains(word.as_str()))
    }

    /// True when an index code occurs anywhere in the line
    pub fn has_index_code(&self, line: &str) -> bool {
        self.index_pattern.is_match(line)
    }

    /// First index code found in the line
    pub fn extract_index<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.index_pattern.find(line).map(|m| m.as_str())
    }

    /// True when the whole line is a single number such as `4`, `-1` or `2,5`
    pub fn is_bare_number(line: &str) -> bool {
        BARE_NUMBER_REGEX.is_match(line)
    }

    /// Parse a bare number, accepting `,` as the decimal separator
    ///
    /// Returns `None` for anything that does not parse to a finite value.
    pub fn parse_number(line: &str) -> Option<f64> {
        let value: f64 = line.replacen(',', ".", 1).parse().ok()?;
        if value.is_finite() {
            Some(value)
        } else {
            trace!("Dropping non-finite number '{}'", line);
            None
        }
    }

    /// Scan the lines following an index code and collect its fields
    fn harvest(&self, index: &str, following: &[String]) -> OrderRecord {
        let mut record = OrderRecord::new(index);

        for next in following {
            if self.has_index_code(next) {
                break;
            }

            let bare_number = Self::is_bare_number(next);

            if record.description.is_none() && !bare_number && !self.is_header_line(next) {
                trace!("Description for {}: '{}'", index, next);
                record.description = Some(next.clone());
                continue;
            }

            if bare_number {
                if let Some(value) = Self::parse_number(next) {
                    if record.quantity_primary.is_none() {
                        record.quantity_primary = Some(value);
                    } else if record.quantity_packs.is_none() && value.fract() == 0.0 {
                        record.quantity_packs = Some(value);
                    }
                }
            }

            if record.is_complete() {
                break;
            }
        }

        record
    }

    /// Extract all records from pasted order-list text
    ///
    /// # Examples
    ///
    /// ```rust
    /// use order_cards::record_extractor::RecordExtractor;
    ///
    /// let extractor = RecordExtractor::new();
    /// let outcome = extractor.extract("Opis Indeks\n123.456.78\nKrzesło\n4\n2\n123.456.78\nKrzesło\n4");
    ///
    /// assert_eq!(outcome.total_occurrences, 2);
    /// assert_eq!(outcome.records.len(), 1);
    /// assert_eq!(outcome.records[0].description.as_deref(), Some("Krzesło"));
    /// assert_eq!(outcome.records[0].quantity_primary, Some(4.0));
    /// assert_eq!(outcome.records[0].quantity_packs, Some(2.0));
    /// assert_eq!(outcome.records[0].occurrence_count, 2);
    /// ```
    pub fn extract(&self, raw: &str) -> ParseOutcome {
        let lines = normalize_lines(raw);
        let mut records: Vec<OrderRecord> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut total_occurrences = 0;

        for (i, line) in lines.iter().enumerate() {
            if self.is_header_line(line) {
                trace!("Skipping header line {}: '{}'", i, line);
                continue;
            }

            let Some(index) = self.extract_index(line) else {
                continue;
            };

            let found = self.harvest(index, &lines[i + 1..]);
            total_occurrences += 1;

            match positions.get(index) {
                Some(&position) => {
                    debug!("Merging duplicate index {} found at line {}", index, i);
                    records[position].merge_from(found);
                }
                None => {
                    debug!("New index {} found at line {}", index, i);
                    positions.insert(index.to_string(), records.len());
                    records.push(found);
                }
            }
        }

        info!(
            "Extracted {} unique records from {} index occurrences",
            records.len(),
            total_occurrences
        );

        ParseOutcome {
            records,
            total_occurrences,
        }
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_extractor() -> RecordExtractor {
        RecordExtractor::new()
    }

    #[test]
    fn test_header_detection() {
        let extractor = create_extractor();

        assert!(extractor.is_header_line("Opis Indeks"));
        assert!(extractor.is_header_line("ILOŚĆ"));
        assert!(extractor.is_header_line("Wartość razem"));
        // substring match, not whole word
        assert!(extractor.is_header_line("Kodeks"));
        assert!(!extractor.is_header_line("Krzesło"));
        assert!(!extractor.is_header_line("4"));
    }

    #[test]
    fn test_bare_number_detection() {
        let cases = vec![
            ("4", true),
            ("-1", true),
            ("2,5", true),
            ("2.50", true),
            ("2.", false),
            (",5", false),
            ("4 szt", false),
            ("1 234", false),
            ("123.456.78", false),
            ("", false),
        ];

        for (text, expected) in cases {
            assert_eq!(
                RecordExtractor::is_bare_number(text),
                expected,
                "Bare number check failed for: '{}'",
                text
            );
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(RecordExtractor::parse_number("2,5"), Some(2.5));
        assert_eq!(RecordExtractor::parse_number("-3"), Some(-3.0));
        assert_eq!(RecordExtractor::parse_number("abc"), None);
        let huge = "9".repeat(400);
        assert_eq!(RecordExtractor::parse_number(&huge), None);
    }

    #[test]
    fn test_index_inside_longer_line() {
        let extractor = create_extractor();
        assert_eq!(
            extractor.extract_index("Art. 123.456.78 (szary)"),
            Some("123.456.78")
        );
        assert_eq!(extractor.extract_index("1123.456.78"), None);
        assert_eq!(extractor.extract_index("123.456.789"), None);
    }

    #[test]
    fn test_fractional_second_number_discarded() {
        let extractor = create_extractor();
        let outcome = extractor.extract("123.456.78\nLampa\n1,5\n2,5\n3");

        let record = &outcome.records[0];
        assert_eq!(record.quantity_primary, Some(1.5));
        assert_eq!(record.quantity_packs, Some(3.0));
    }

    #[test]
    fn test_header_line_with_code_is_not_a_source() {
        let extractor = create_extractor();
        let outcome = extractor.extract("Nr 123.456.78\nKrzesło\n4");

        assert!(outcome.is_empty());
        assert_eq!(outcome.total_occurrences, 0);
    }

    #[test]
    fn test_custom_config_lowercases_blacklist() {
        let config = ExtractorConfig {
            header_blacklist: vec!["ARTICLE".to_string(), String::new()],
            ..Default::default()
        };
        let extractor = RecordExtractor::with_config(config).unwrap();

        assert!(extractor.is_header_line("Article number"));
        // default words are replaced, not extended
        assert!(!extractor.is_header_line("Opis"));
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(RecordExtractor::with_pattern("([0-9]").is_err());
    }
}
