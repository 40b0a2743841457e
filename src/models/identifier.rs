//! NRIC/FIN patient identifiers.
//!
//! An identifier is a prefix letter (`S`, `T`, `F` or `G`), seven digits and a
//! checksum letter. `Nric::parse` is the only way to build one, so every
//! `Nric` in the program has already passed the checksum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Total length of an identifier, prefix and checksum letter included.
pub const NRIC_LENGTH: usize = 9;

/// Weights applied to the seven digits, in order.
const DIGIT_WEIGHTS: [u32; 7] = [2, 7, 6, 5, 4, 3, 2];

/// Added to the weighted sum for identifiers issued from 2000 onwards (`T`, `G`).
const POST_2000_OFFSET: u32 = 4;

const CHECKSUM_MOD: u32 = 11;

/// Checksum letters for citizens and permanent residents (`S`, `T`).
const ST_LETTERS: [char; 11] = ['J', 'Z', 'I', 'H', 'G', 'F', 'E', 'D', 'C', 'B', 'A'];

/// Checksum letters for foreigners (`F`, `G`).
const FG_LETTERS: [char; 11] = ['X', 'W', 'U', 'T', 'R', 'Q', 'P', 'N', 'M', 'L', 'K'];

/// The identifier failed the shape or checksum rule. Which rule is not reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid NRIC/FIN: {0}")]
pub struct InvalidFormat(pub String);

/// A validated, uppercase NRIC/FIN.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nric(String);

impl Nric {
    /// Uppercase and validate a raw identifier. Surrounding whitespace is not
    /// stripped, so padded input fails the length rule.
    pub fn parse(raw: &str) -> Result<Self, InvalidFormat> {
        let id = raw.to_uppercase();
        if is_valid(&id) {
            Ok(Self(id))
        } else {
            Err(InvalidFormat(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid(id: &str) -> bool {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != NRIC_LENGTH {
        return false;
    }

    let prefix = chars[0];
    if !matches!(prefix, 'S' | 'T' | 'F' | 'G') {
        return false;
    }

    let mut checksum = 0u32;
    for (c, weight) in chars[1..NRIC_LENGTH - 1].iter().zip(DIGIT_WEIGHTS) {
        match c.to_digit(10) {
            Some(digit) if c.is_ascii_digit() => checksum += digit * weight,
            _ => return false,
        }
    }

    let last = chars[NRIC_LENGTH - 1];
    if !last.is_ascii_alphabetic() {
        return false;
    }

    last == expected_letter(prefix, checksum)
}

/// Checksum letter for a prefix and weighted digit sum.
fn expected_letter(prefix: char, weighted_sum: u32) -> char {
    let mut checksum = weighted_sum;
    if matches!(prefix, 'T' | 'G') {
        checksum += POST_2000_OFFSET;
    }
    let index = (checksum % CHECKSUM_MOD) as usize;
    match prefix {
        'S' | 'T' => ST_LETTERS[index],
        _ => FG_LETTERS[index],
    }
}

impl FromStr for Nric {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Nric {
    type Error = InvalidFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Nric> for String {
    fn from(nric: Nric) -> Self {
        nric.0
    }
}

impl fmt::Display for Nric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
