//! Field-level payload validation.
//!
//! Validators accumulate every violation instead of stopping at the first,
//! so a client gets the full list of bad fields in one response.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::enums::ParseEnumError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", joined(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|v| v.field)
    }
}

fn joined(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Default)]
pub struct Violations {
    found: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.found.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    /// Trimmed, non-empty text. Records a violation with `message` otherwise.
    pub fn required_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        message: &str,
    ) -> String {
        match optional_text(value) {
            Some(text) => text,
            None => {
                self.push(field, message);
                String::new()
            }
        }
    }

    pub fn optional_enum<T>(&mut self, field: &'static str, value: Option<String>) -> Option<T>
    where
        T: FromStr<Err = ParseEnumError>,
    {
        let raw = optional_text(value)?;
        match raw.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.push(field, e.to_string());
                None
            }
        }
    }

    /// Like [`optional_enum`](Self::optional_enum), but a missing value is a
    /// violation. `fallback` fills the slot so validation can keep going.
    pub fn required_enum<T>(
        &mut self,
        field: &'static str,
        value: Option<String>,
        message: &str,
        fallback: T,
    ) -> T
    where
        T: FromStr<Err = ParseEnumError>,
    {
        let present = value.as_deref().is_some_and(|v| !v.trim().is_empty());
        if !present {
            self.push(field, message);
            return fallback;
        }
        self.optional_enum(field, value).unwrap_or(fallback)
    }

    /// A positive integer that fits in `u32`. `message` covers values
    /// below 1; values past `u32::MAX` get their own.
    pub fn positive(&mut self, field: &'static str, value: Option<i64>, message: &str) -> Option<u32> {
        let n = value?;
        match u32::try_from(n) {
            Ok(n) if n >= 1 => Some(n),
            Err(_) if n > 0 => {
                self.push(field, format!("must be at most {}", u32::MAX));
                None
            }
            _ => {
                self.push(field, message);
                None
            }
        }
    }

    pub fn optional_date(&mut self, field: &'static str, value: Option<String>) -> Option<DateTime<Utc>> {
        let raw = optional_text(value)?;
        match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                self.push(field, format!("`{raw}` is not a valid date"));
                None
            }
        }
    }

    /// Finish validation: `Ok(value())` when nothing was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.found.is_empty() {
            Ok(value())
        } else {
            Err(ValidationError {
                violations: self.found,
            })
        }
    }
}

/// Trims, and maps empty strings to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
