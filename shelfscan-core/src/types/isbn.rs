//! ISBN validation and normalization

use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A checksum-validated ISBN, normalized to its 13-digit form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Parse an ISBN-10 or ISBN-13, ignoring hyphens and spaces
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let cleaned: String = input
            .chars()
            .filter(|c| !matches!(c, '-' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match cleaned.len() {
            13 if is_valid_isbn13(&cleaned) => Ok(Self(cleaned)),
            10 if is_valid_isbn10(&cleaned) => Ok(Self(isbn10_to_13(&cleaned))),
            _ => Err(LookupError::InvalidIsbn(input.trim().to_string())),
        }
    }

    /// The 13-digit form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 10-digit form, when this ISBN has one (978 prefix only)
    pub fn to_isbn10(&self) -> Option<String> {
        let body = self.0.strip_prefix("978")?;
        let core = &body[..9];
        let sum: u32 = core
            .chars()
            .zip((2..=10).rev())
            .map(|(c, w)| c.to_digit(10).unwrap_or(0) * w)
            .sum();
        let check = (11 - sum % 11) % 11;
        let check = if check == 10 {
            'X'
        } else {
            char::from_digit(check, 10).unwrap_or('0')
        };
        Some(format!("{}{}", core, check))
    }
}

/// ISBN-13 (Bookland EAN): 978/979 prefix, alternating 1/3 weights
fn is_valid_isbn13(s: &str) -> bool {
    if !(s.starts_with("978") || s.starts_with("979")) {
        return false;
    }
    let digits: Option<Vec<u32>> = s.chars().map(|c| c.to_digit(10)).collect();
    match digits {
        Some(d) => {
            let sum: u32 = d
                .iter()
                .enumerate()
                .map(|(i, v)| if i % 2 == 0 { *v } else { v * 3 })
                .sum();
            sum % 10 == 0
        }
        None => false,
    }
}

/// ISBN-10: weights 10..1, `X` allowed as the check digit only
fn is_valid_isbn10(s: &str) -> bool {
    let mut sum = 0;
    for (i, c) in s.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            _ => match c.to_digit(10) {
                Some(v) => v,
                None => return false,
            },
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn isbn10_to_13(s: &str) -> String {
    let body = format!("978{}", &s[..9]);
    let sum: u32 = body
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let v = c.to_digit(10).unwrap_or(0);
            if i % 2 == 0 {
                v
            } else {
                v * 3
            }
        })
        .sum();
    format!("{}{}", body, (10 - sum % 10) % 10)
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isbn {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Isbn {
    type Error = LookupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}
