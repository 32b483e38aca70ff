//! ISBN normalization, validation and conversion
//!
//! See https://isbn-information.com/ for the checksum rules.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Registrant prefixes allowed at the start of an ISBN-13
const ISBN13_PREFIXES: [&str; 2] = ["978", "979"];

/// The only ISBN-13 prefix with an ISBN-10 equivalent
const ISBN10_COMPATIBLE_PREFIX: &str = "978";

/// The two ISBN encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsbnKind {
    /// 10 characters, check value may be `X`
    Isbn10,
    /// 13 digits, 978/979 prefix
    Isbn13,
}

impl IsbnKind {
    /// Number of characters in an identifier of this kind
    pub fn digits(self) -> usize {
        match self {
            IsbnKind::Isbn10 => 10,
            IsbnKind::Isbn13 => 13,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            IsbnKind::Isbn10 => "ISBN-10",
            IsbnKind::Isbn13 => "ISBN-13",
        }
    }
}

impl fmt::Display for IsbnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Why an identifier failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Not 10 or 13 characters after normalization
    Length,
    /// Contains something other than digits (and a final `X` on ISBN-10)
    Charset,
    /// ISBN-13 ending in `X`
    TrailingX,
    /// ISBN-13 not starting with 978 or 979
    BadPrefix,
    /// Weighted sum is not a multiple of the modulus
    Checksum,
}

impl InvalidReason {
    /// Stable machine-readable name
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidReason::Length => "length",
            InvalidReason::Charset => "charset",
            InvalidReason::TrailingX => "trailing_x",
            InvalidReason::BadPrefix => "bad_prefix",
            InvalidReason::Checksum => "checksum",
        }
    }

    /// Human-readable explanation suitable for showing to the person who typed the ISBN
    pub fn message(self) -> &'static str {
        match self {
            InvalidReason::Length => "Input is not of the correct length.",
            InvalidReason::Charset => "Input has invalid characters.",
            InvalidReason::TrailingX => "ISBN 13 has invalid 'X' character.",
            InvalidReason::BadPrefix => "ISBN 13 must start with 978 or 979.",
            InvalidReason::Checksum => "Check digit does not match.",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsbnError {
    #[error("Invalid identifier {input:?} ({reason}): {}", .reason.message())]
    Invalid { input: String, reason: InvalidReason },
}

impl IsbnError {
    fn new(input: &str, reason: InvalidReason) -> Self {
        IsbnError::Invalid {
            input: input.to_string(),
            reason,
        }
    }

    pub fn reason(&self) -> InvalidReason {
        match self {
            IsbnError::Invalid { reason, .. } => *reason,
        }
    }

    pub fn input(&self) -> &str {
        match self {
            IsbnError::Invalid { input, .. } => input,
        }
    }
}

/// A validated, separator-free ISBN tagged with its kind
///
/// Can only be built through [`validate_isbn`] (or the conversions), so an
/// `Isbn` always satisfies its checksum and an ISBN-13 always carries a
/// 978/979 prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isbn {
    kind: IsbnKind,
    value: String,
}

impl Isbn {
    /// Normalize then validate raw user or provider input
    pub fn parse(raw: &str) -> Result<Self, IsbnError> {
        validate_isbn(&normalize_isbn(raw))
    }

    pub fn kind(&self) -> IsbnKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_isbn13(&self) -> bool {
        self.kind == IsbnKind::Isbn13
    }

    pub fn is_isbn10(&self) -> bool {
        self.kind == IsbnKind::Isbn10
    }

    /// Registrant prefix ("978" or "979") of an ISBN-13
    pub fn prefix(&self) -> Option<&str> {
        match self.kind {
            IsbnKind::Isbn13 => Some(&self.value[..3]),
            IsbnKind::Isbn10 => None,
        }
    }

    /// Convert to ISBN-13
    ///
    /// An ISBN-10 gains the 978 prefix and a recomputed check digit. An ISBN-13
    /// is returned unchanged.
    pub fn to_isbn13(&self) -> Isbn {
        match self.kind {
            IsbnKind::Isbn13 => self.clone(),
            IsbnKind::Isbn10 => {
                let mut value = format!("{}{}", ISBN10_COMPATIBLE_PREFIX, &self.value[..9]);
                value.push(isbn13_check_digit(&value));
                Isbn {
                    kind: IsbnKind::Isbn13,
                    value,
                }
            }
        }
    }

    /// Convert to ISBN-10
    ///
    /// Returns `None` for 979-prefixed ISBN-13s, which have no ISBN-10 form.
    /// An ISBN-10 is returned unchanged.
    pub fn to_isbn10(&self) -> Option<Isbn> {
        match self.kind {
            IsbnKind::Isbn10 => Some(self.clone()),
            IsbnKind::Isbn13 => {
                if !self.value.starts_with(ISBN10_COMPATIBLE_PREFIX) {
                    return None;
                }
                let mut value = self.value[3..12].to_string();
                value.push(isbn10_check_char(&value));
                Some(Isbn {
                    kind: IsbnKind::Isbn10,
                    value,
                })
            }
        }
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl FromStr for Isbn {
    type Err = IsbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Isbn::parse(s)
    }
}

impl Serialize for Isbn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Isbn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Isbn::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Strip separators and upper-case a trailing check letter
///
/// Never fails. Anything other than spaces and hyphens is left for
/// [`validate_isbn`] to reject.
pub fn normalize_isbn(raw: &str) -> String {
    let mut normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if normalized.ends_with('x') {
        normalized.pop();
        normalized.push('X');
    }

    normalized
}

/// Validate a normalized identifier
///
/// Checks run in order: length, character set, ISBN-13 trailing `X`,
/// ISBN-13 prefix, checksum. The first failing check is reported.
pub fn validate_isbn(normalized: &str) -> Result<Isbn, IsbnError> {
    let chars: Vec<char> = normalized.chars().collect();

    let kind = match chars.len() {
        10 => IsbnKind::Isbn10,
        13 => IsbnKind::Isbn13,
        _ => return Err(IsbnError::new(normalized, InvalidReason::Length)),
    };

    // A final X is let through here so ISBN-13s get the more specific reason below
    let last = chars.len() - 1;
    let charset_ok = chars
        .iter()
        .enumerate()
        .all(|(i, &c)| c.is_ascii_digit() || (i == last && c == 'X'));
    if !charset_ok {
        return Err(IsbnError::new(normalized, InvalidReason::Charset));
    }

    let checksum_ok = match kind {
        IsbnKind::Isbn13 => {
            if chars[last] == 'X' {
                return Err(IsbnError::new(normalized, InvalidReason::TrailingX));
            }
            if !ISBN13_PREFIXES.contains(&&normalized[..3]) {
                return Err(IsbnError::new(normalized, InvalidReason::BadPrefix));
            }
            isbn13_weighted_sum(normalized) % 10 == 0
        }
        IsbnKind::Isbn10 => {
            (isbn10_weighted_sum(&normalized[..9]) + check_value(chars[last])) % 11 == 0
        }
    };

    if !checksum_ok {
        return Err(IsbnError::new(normalized, InvalidReason::Checksum));
    }

    Ok(Isbn {
        kind,
        value: normalized.to_string(),
    })
}

/// Check whether raw input is a valid ISBN-10 or ISBN-13
pub fn is_valid_isbn(raw: &str) -> bool {
    Isbn::parse(raw).is_ok()
}

/// Value of an ISBN-10 check character (`X` is ten)
fn check_value(c: char) -> u32 {
    if c == 'X' {
        10
    } else {
        c.to_digit(10).unwrap_or(0)
    }
}

/// Sum of digits weighted 1, 3, 1, 3, ... from the left
fn isbn13_weighted_sum(digits: &str) -> u32 {
    digits
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let value = c.to_digit(10).unwrap_or(0);
            if i % 2 == 0 {
                value
            } else {
                value * 3
            }
        })
        .sum()
}

/// Sum of the first nine digits weighted 10 down to 2
fn isbn10_weighted_sum(digits: &str) -> u32 {
    digits
        .chars()
        .take(9)
        .zip((2..=10).rev())
        .map(|(c, weight)| c.to_digit(10).unwrap_or(0) * weight)
        .sum()
}

/// Check digit completing a 12-digit ISBN-13 body
fn isbn13_check_digit(body: &str) -> char {
    let check = (10 - isbn13_weighted_sum(body) % 10) % 10;
    char::from(b'0' + check as u8)
}

/// Check character completing a 9-digit ISBN-10 body
fn isbn10_check_char(body: &str) -> char {
    match (11 - isbn10_weighted_sum(body) % 11) % 11 {
        10 => 'X',
        check => char::from(b'0' + check as u8),
    }
}
