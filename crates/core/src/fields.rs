//! Field-level validation helpers shared by every input struct.
//!
//! Validators trim incoming text, record one message per failed rule under
//! the field name, and hand back the cleaned value so callers never touch
//! the raw input again.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NOT_INTEGER: &str = "A valid integer is required.";

/// Per-field validation messages, keyed by field name.
///
/// Serializes as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty if the field passed.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(value)` when nothing was recorded, `InvalidFields` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, CoreError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(CoreError::InvalidFields(self))
        }
    }
}

/// Trim a required text field and enforce a maximum length in characters.
///
/// Returns the trimmed value; on failure records a message and returns an
/// empty string so validation can keep collecting errors for other fields.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max_chars: Option<usize>,
) -> String {
    let Some(raw) = value else {
        errors.add(field, MSG_REQUIRED);
        return String::new();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, MSG_BLANK);
        return String::new();
    }
    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            errors.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
    }
    trimmed.to_string()
}

/// Parse an integer submitted as text (HTML forms send everything as strings).
pub fn parse_integer(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<i64> {
    match value.map(str::trim) {
        None | Some("") => {
            errors.add(field, MSG_REQUIRED);
            None
        }
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                errors.add(field, MSG_NOT_INTEGER);
                None
            }
        },
    }
}

/// An integer field as it arrived in a JSON body.
///
/// Numbers and numeric strings are both accepted; anything else is reported
/// as not an integer rather than rejecting the whole body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerInput<'a> {
    Missing,
    Number(i64),
    Text(&'a str),
    Invalid,
}

/// Resolve an [`IntegerInput`], recording a message when it is unusable.
pub fn integer_input(errors: &mut FieldErrors, field: &str, input: IntegerInput<'_>) -> Option<i64> {
    match input {
        IntegerInput::Missing => {
            errors.add(field, MSG_REQUIRED);
            None
        }
        IntegerInput::Number(n) => Some(n),
        IntegerInput::Text(raw) => parse_integer(errors, field, Some(raw)),
        IntegerInput::Invalid => {
            errors.add(field, MSG_NOT_INTEGER);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_whitespace() {
        let mut errors = FieldErrors::new();
        let value = required_text(&mut errors, "make", Some("  Volvo "), Some(100));
        assert_eq!(value, "Volvo");
        assert!(errors.is_empty());
    }

    #[test]
    fn required_text_missing_and_blank() {
        let mut errors = FieldErrors::new();
        required_text(&mut errors, "a", None, None);
        required_text(&mut errors, "b", Some("   "), None);
        assert_eq!(errors.get("a"), [MSG_REQUIRED]);
        assert_eq!(errors.get("b"), [MSG_BLANK]);
    }

    #[test]
    fn required_text_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        // 3 chars, 6 bytes.
        required_text(&mut errors, "make", Some("ЗИЛ"), Some(3));
        assert!(errors.is_empty());

        required_text(&mut errors, "make", Some("ЗИЛ-1"), Some(3));
        assert_eq!(
            errors.get("make"),
            ["Ensure this field has no more than 3 characters."]
        );
    }

    #[test]
    fn parse_integer_reports_non_numeric() {
        let mut errors = FieldErrors::new();
        assert_eq!(parse_integer(&mut errors, "year", Some(" 1999 ")), Some(1999));
        assert_eq!(parse_integer(&mut errors, "year", Some("soon")), None);
        assert_eq!(errors.get("year"), [MSG_NOT_INTEGER]);
    }

    #[test]
    fn integer_input_accepts_numbers_and_numeric_text() {
        let mut errors = FieldErrors::new();
        assert_eq!(integer_input(&mut errors, "year", IntegerInput::Number(1988)), Some(1988));
        assert_eq!(integer_input(&mut errors, "year", IntegerInput::Text("2005")), Some(2005));
        assert!(errors.is_empty());

        assert_eq!(integer_input(&mut errors, "a", IntegerInput::Missing), None);
        assert_eq!(integer_input(&mut errors, "b", IntegerInput::Text("soon")), None);
        assert_eq!(integer_input(&mut errors, "c", IntegerInput::Invalid), None);
        assert_eq!(errors.get("a"), [MSG_REQUIRED]);
        assert_eq!(errors.get("b"), [MSG_NOT_INTEGER]);
        assert_eq!(errors.get("c"), [MSG_NOT_INTEGER]);
    }
}
