//! # Barcode Module
//!
//! Code 128 encoding of index codes. An index such as `123.456.78` is encoded
//! without its separators (`12345678`), using Code Set C for even-length digit
//! payloads and Code Set B for anything else printable.

use crate::order_errors::CardError;
use log::debug;

/// Bar/space widths for symbol values 0..=105, bar first
const PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232",
];

const STOP_PATTERN: &str = "2331112";
const START_B: u8 = 104;
const START_C: u8 = 105;

/// Width of one symbol character in modules
pub const SYMBOL_MODULES: usize = 11;
/// Width of the stop pattern in modules
pub const STOP_MODULES: usize = 13;

/// Strip whitespace, control characters, the byte order mark and index separators
///
/// ```rust
/// use order_cards::barcode::normalize_payload;
///
/// assert_eq!(normalize_payload(" 123.456.78\u{FEFF}\n"), "12345678");
/// ```
pub fn normalize_payload(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !c.is_whitespace() && !c.is_control() && c != '\u{FEFF}' && c != '.')
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSet {
    B,
    C,
}

/// An encoded Code 128 symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code128 {
    payload: String,
    code_set: CodeSet,
    /// Start value, data values and checksum (stop excluded)
    values: Vec<u8>,
}

impl Code128 {
    pub fn encode(payload: &str) -> Result<Self, CardError> {
        if payload.is_empty() {
            return Err(CardError::Barcode("empty payload".to_string()));
        }

        let all_digits = payload.bytes().all(|b| b.is_ascii_digit());
        let (code_set, mut values) = if all_digits && payload.len() % 2 == 0 {
            let data = payload
                .as_bytes()
                .chunks(2)
                .map(|pair| (pair[0] - b'0') * 10 + (pair[1] - b'0'));
            (CodeSet::C, std::iter::once(START_C).chain(data).collect::<Vec<u8>>())
        } else {
            let mut values = vec![START_B];
            for c in payload.chars() {
                if !(' '..='~').contains(&c) {
                    return Err(CardError::Barcode(format!(
                        "character {c:?} is not encodable in Code Set B"
                    )));
                }
                values.push(c as u8 - b' ');
            }
            (CodeSet::B, values)
        };

        let checksum = values
            .iter()
            .enumerate()
            .map(|(position, &value)| position.max(1) as u32 * value as u32)
            .sum::<u32>()
            % 103;
        values.push(checksum as u8);

        debug!(
            "Encoded '{}' as Code 128 set {:?} with checksum {}",
            payload, code_set, checksum
        );

        Ok(Self {
            payload: payload.to_string(),
            code_set,
            values,
        })
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn code_set(&self) -> CodeSet {
        self.code_set
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn checksum(&self) -> u8 {
        self.values[self.values.len() - 1]
    }

    /// Alternating bar/space run widths in modules, starting with a bar
    pub fn modules(&self) -> Vec<u8> {
        self.values
            .iter()
            .map(|&value| PATTERNS[value as usize])
            .chain(std::iter::once(STOP_PATTERN))
            .flat_map(|pattern| pattern.bytes().map(|b| b - b'0'))
            .collect()
    }

    /// Total symbol width in modules, quiet zones excluded
    pub fn width_in_modules(&self) -> usize {
        self.values.len() * SYMBOL_MODULES + STOP_MODULES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_table_widths() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            let width: u32 = pattern.bytes().map(|b| (b - b'0') as u32).sum();
            assert_eq!(width, 11, "Pattern {} has wrong width", value);
        }
        let stop: u32 = STOP_PATTERN.bytes().map(|b| (b - b'0') as u32).sum();
        assert_eq!(stop, 13);
    }

    #[test]
    fn test_code_set_c_checksum() {
        let code = Code128::encode("12345678").unwrap();
        assert_eq!(code.code_set(), CodeSet::C);
        assert_eq!(code.values(), &[105, 12, 34, 56, 78, 47]);
        assert_eq!(code.checksum(), 47);
    }

    #[test]
    fn test_code_set_b_checksum() {
        let code = Code128::encode("AB").unwrap();
        assert_eq!(code.code_set(), CodeSet::B);
        assert_eq!(code.values(), &[104, 33, 34, 102]);
    }

    #[test]
    fn test_odd_digit_count_uses_set_b() {
        let code = Code128::encode("123").unwrap();
        assert_eq!(code.code_set(), CodeSet::B);
        assert_eq!(code.values()[1..4], [17, 18, 19]);
    }

    #[test]
    fn test_modules_sum_to_width() {
        let code = Code128::encode("12345678").unwrap();
        let modules = code.modules();
        let total: usize = modules.iter().map(|&m| m as usize).sum();
        assert_eq!(total, code.width_in_modules());
        assert_eq!(total, 79);
        // 6 runs per symbol plus 7 for the stop pattern
        assert_eq!(modules.len(), 6 * 6 + 7);
    }

    #[test]
    fn test_rejects_unencodable() {
        assert!(Code128::encode("").is_err());
        assert!(Code128::encode("Krzesło").is_err());
    }
}
