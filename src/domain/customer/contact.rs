//! Customer contact value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Display name of a customer, normalized on construction.
///
/// Runs of whitespace collapse to one space, the ends are trimmed, and every
/// word gets an upper-case first letter. The rest of each word is left as
/// typed, so "mcDonald" stays "McDonald" rather than becoming "Mcdonald".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerName(String);

impl CustomerName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw
            .split_whitespace()
            .map(capitalize_first)
            .collect::<Vec<_>>()
            .join(" ");
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if normalized.chars().count() > 200 {
            return Err(ValidationError::invalid_format("name", "longer than 200 characters"));
        }
        Ok(Self(normalized))
    }

    /// Wraps an already-normalized name read back from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-case initials, e.g. "Ana María López" → "AML".
    pub fn initials(&self) -> String {
        self.0
            .split(' ')
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trimmed email address with a minimal shape check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(ValidationError::invalid_format("email", "expected name@domain")),
        }
    }

    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
