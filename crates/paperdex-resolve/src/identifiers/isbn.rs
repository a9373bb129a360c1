use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

// Candidate runs of digits with optional hyphen/space separators, optionally
// prefixed with ISBN / ISBN-10 / ISBN-13. Rust regex has no lookahead, so
// this over-matches; the checksum validation below filters the candidates.
static ISBN_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:ISBN(?:-1[03])?:?\s*)?((?:97[89][-\s]?)?\d{1,5}(?:[-\s]?\d+){2,4}[-\s]?[\dXx])")
        .expect("valid regex")
});

/// A validated ISBN, held in canonical ISBN-13 form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Isbn {
    pub raw: String,
    pub isbn13: String,
}

impl Isbn {
    /// Parse an ISBN-10 or ISBN-13 with arbitrary hyphen/space separators.
    /// ISBN-10 input is normalized to its ISBN-13 equivalent.
    pub fn parse(input: &str) -> Result<Self> {
        let stripped: String = input
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase();

        let digits = match stripped.len() {
            13 => digits_13(&stripped),
            10 => digits_10(&stripped),
            _ => None,
        };
        let Some(digits) = digits else {
            return Err(ResolveError::InvalidIsbn(input.to_string()));
        };

        let isbn13 = if digits.len() == 13 {
            if !checksum_13_ok(&digits) {
                return Err(ResolveError::InvalidIsbn(input.to_string()));
            }
            stripped
        } else {
            if !checksum_10_ok(&digits) {
                return Err(ResolveError::InvalidIsbn(input.to_string()));
            }
            to_isbn13(&digits)
        };

        Ok(Self {
            raw: input.to_string(),
            isbn13,
        })
    }

    /// Scan free text line by line and return the first valid ISBN.
    pub fn find_in_text(text: &str) -> Option<Self> {
        text.lines().find_map(scan_line)
    }
}

/// First checksum-valid candidate in a line. A failed candidate only
/// advances the scan by one byte: the greedy pattern can start on leading
/// digit noise (a year, a page range) and swallow the real ISBN behind it,
/// so the remainder of its span must be rescanned.
fn scan_line(line: &str) -> Option<Isbn> {
    let mut offset = 0;
    while let Some(captures) = ISBN_CANDIDATE.captures(&line[offset..]) {
        let Some(candidate) = captures.get(1) else {
            return None;
        };
        if let Ok(isbn) = Isbn::parse(candidate.as_str()) {
            return Some(isbn);
        }
        // The pattern starts on an ASCII character, so +1 stays on a char
        // boundary.
        offset += candidate.start() + 1;
    }
    None
}

fn digits_13(stripped: &str) -> Option<Vec<u8>> {
    stripped
        .chars()
        .map(|c| c.is_ascii_digit().then(|| c as u8 - b'0'))
        .collect()
}

fn digits_10(stripped: &str) -> Option<Vec<u8>> {
    stripped
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i == 9 && c == 'X' {
                Some(10)
            } else {
                c.is_ascii_digit().then(|| c as u8 - b'0')
            }
        })
        .collect()
}

fn checksum_10_ok(digits: &[u8]) -> bool {
    // digits[9] may be 10 (X)
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| (10 - i as u32) * d as u32)
        .sum();
    sum % 11 == 0
}

fn checksum_13_ok(digits: &[u8]) -> bool {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 } else { d as u32 * 3 })
        .sum();
    sum % 10 == 0
}

fn to_isbn13(digits10: &[u8]) -> String {
    let mut d13: Vec<u8> = vec![9, 7, 8];
    d13.extend_from_slice(&digits10[..9]);
    let sum: u32 = d13
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 } else { d as u32 * 3 })
        .sum();
    let check = (10 - (sum % 10)) % 10;
    d13.push(check as u8);
    d13.iter().map(|d| d.to_string()).collect()
}
