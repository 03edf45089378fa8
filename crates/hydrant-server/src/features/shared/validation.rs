//! Shared validation utilities
//!
//! Request bodies are checked field by field and every problem is collected
//! into a single [`ValidationErrors`], so a client sees all offending fields
//! in one 400 response instead of fixing them one at a time.
//!
//! # Examples
//!
//! ```rust,ignore
//! use hydrant_server::features::shared::validation::{required_text, ValidationErrors};
//!
//! let mut errors = ValidationErrors::new();
//! let name = required_text(&mut errors, "hydrant", Some("H-12".to_string()), 255);
//! errors.into_result()?;
//! ```

use chrono::NaiveDate;
use serde::Serialize;

/// Maximum length of short text fields (names, locations, inspectors).
pub const MAX_SHORT_TEXT_LEN: usize = 255;

/// Maximum length of the free-text defects field.
pub const MAX_DEFECTS_LEN: usize = 4000;

/// Wire format of inspection dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All fields rejected while validating one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a collection holding exactly one error.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validates a field that must be present, non-null and non-blank.
///
/// Returns the trimmed value, or `None` after recording an error.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_length: usize,
) -> Option<String> {
    let Some(value) = value else {
        errors.add(field, "is required");
        return None;
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "cannot be empty");
        return None;
    }
    if trimmed.chars().count() > max_length {
        errors.add(field, format!("must be at most {max_length} characters"));
        return None;
    }

    Some(trimmed.to_string())
}

/// Validates an optional text field. Absent, null and blank all become `None`.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_length: usize,
) -> Option<String> {
    let trimmed = value.as_deref().map(str::trim).filter(|s| !s.is_empty())?;

    if trimmed.chars().count() > max_length {
        errors.add(field, format!("must be at most {max_length} characters"));
        return None;
    }

    Some(trimmed.to_string())
}

/// Parses an optional `YYYY-MM-DD` date. Absent, null and blank become `None`.
pub fn optional_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
) -> Option<NaiveDate> {
    let trimmed = value.as_deref().map(str::trim).filter(|s| !s.is_empty())?;

    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "must be a date in YYYY-MM-DD format");
            None
        },
    }
}

/// Parses a path identifier; only positive integers are accepted.
pub fn parse_id(raw: &str) -> Result<i64, ValidationErrors> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationErrors::single("id", "must be a positive integer")),
    }
}
