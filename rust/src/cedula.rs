//! Cédula (Dominican identity/electoral number) validation.
//!
//! Format: `<municipality:3><sequence:7><check:1>`, 11 ASCII digits.
//!
//! The generator implements `Iterator<Item = String>`.
//! Use `next_cedula()` for the explicit domain API.

use once_cell::sync::Lazy;
use rand::random_range;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Number of digits in a cédula, check digit included.
pub const CEDULA_LEN: usize = 11;
const BASE_LEN: usize = CEDULA_LEN - 1;
const MUNICIPALITY_LEN: usize = 3;

/// Errors that can occur during cédula operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CedulaError {
    #[error("Empty cédula")]
    Empty,
    #[error("Invalid length: expected 11 digits, got {0}")]
    InvalidLength(usize),
    #[error("Invalid character {found:?} at position {position}")]
    InvalidCharacter { position: usize, found: char },
    #[error("Checksum mismatch: expected check digit {expected}, found {found}")]
    ChecksumMismatch { expected: u8, found: u8 },
    #[error("Invalid municipality prefix: {0}")]
    InvalidMunicipality(String),
}

/// Parsed cédula components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cedula {
    pub raw: String,
    pub municipality: String,
    pub sequence: String,
    pub check_digit: u8,
}

impl fmt::Display for Cedula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.municipality, self.sequence, self.check_digit
        )
    }
}

static MUNICIPALITY_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3}$").unwrap());

/// Sum of the weighted base digits. Odd positions are doubled and any
/// two-digit product is folded into the sum of its digits.
fn weighted_sum(base: &[u8]) -> u32 {
    base.iter()
        .enumerate()
        .map(|(i, &d)| {
            let product = u32::from(d) * if i % 2 == 1 { 2 } else { 1 };
            if product > 9 {
                product / 10 + product % 10
            } else {
                product
            }
        })
        .sum()
}

/// Distance from `sum` to the next multiple of ten strictly above it (1..=10).
fn validator_for(base: &[u8]) -> u8 {
    let sum = weighted_sum(base);
    let top_ten = (sum / 10 + 1) * 10;
    (top_ten - sum) as u8
}

fn digits_of(s: &str) -> Result<Vec<u8>, CedulaError> {
    s.chars()
        .enumerate()
        .map(|(position, c)| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or(CedulaError::InvalidCharacter { position, found: c })
        })
        .collect()
}

/// Compute the check digit for a 10-digit base. A validator of 10 is
/// reported as 0.
pub fn check_digit(base: &str) -> Option<u8> {
    if base.chars().count() != BASE_LEN {
        return None;
    }
    let digits = digits_of(base).ok()?;
    Some(validator_for(&digits) % 10)
}

/// Parse a cédula into its components.
pub fn parse_cedula(identifier: &str) -> Result<Cedula, CedulaError> {
    if identifier.is_empty() {
        return Err(CedulaError::Empty);
    }

    let len = identifier.chars().count();
    if len != CEDULA_LEN {
        return Err(CedulaError::InvalidLength(len));
    }

    let digits = digits_of(identifier)?;
    let (base, check) = digits.split_at(BASE_LEN);
    let found = check[0];
    let validator = validator_for(base);

    if found != validator && !(found == 0 && validator == 10) {
        log::debug!("checksum rejected {identifier}: validator {validator}, found {found}");
        return Err(CedulaError::ChecksumMismatch {
            expected: validator % 10,
            found,
        });
    }

    // All 11 characters are ASCII digits past this point.
    Ok(Cedula {
        raw: identifier.to_string(),
        municipality: identifier[..MUNICIPALITY_LEN].to_string(),
        sequence: identifier[MUNICIPALITY_LEN..BASE_LEN].to_string(),
        check_digit: found,
    })
}

/// Validate a cédula. Never fails; structurally invalid input is `false`.
pub fn is_valid(identifier: &str) -> bool {
    parse_cedula(identifier).is_ok()
}

/// Strip every non-alphanumeric character, undoing a template format.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Random generator of valid cédulas.
#[derive(Debug, Clone, Default)]
pub struct CedulaGen {
    municipality: Option<String>,
}

impl CedulaGen {
    /// Generator over any municipality prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator pinned to a 3-digit municipality prefix.
    pub fn with_municipality(municipality: &str) -> Result<Self, CedulaError> {
        if !MUNICIPALITY_PATTERN.is_match(municipality) {
            return Err(CedulaError::InvalidMunicipality(municipality.to_string()));
        }
        Ok(Self {
            municipality: Some(municipality.to_string()),
        })
    }

    /// Active municipality prefix, if pinned.
    pub fn municipality(&self) -> Option<&str> {
        self.municipality.as_deref()
    }

    /// Generate the next cédula (domain API).
    pub fn next_cedula(&mut self) -> String {
        let mut base = match &self.municipality {
            Some(prefix) => prefix.clone(),
            None => format!("{:03}", random_range(0..1000u32)),
        };
        base.push_str(&format!("{:07}", random_range(0..10_000_000u32)));

        let digits: Vec<u8> = base.bytes().map(|b| b - b'0').collect();
        let check = validator_for(&digits) % 10;
        base.push(char::from(b'0' + check));
        base
    }

    /// Generate n cédulas.
    pub fn next_n(&mut self, n: usize) -> Vec<String> {
        self.take(n).collect()
    }
}

impl Iterator for CedulaGen {
    type Item = String;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_cedula())
    }
}
