//! Field rule checks shared by the slices.

use chrono::{NaiveDate, Utc};
use club_domain::constants::DATE_FORMAT;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use validator::{ValidationError, ValidationErrors};

/// Rule violations grouped by field, in field order.
///
/// Rendered next to the inputs on HTML forms; the JSON API joins the
/// messages into a single error string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn extend(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    /// Returns `self` when at least one rule failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.0.values().flatten() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid."), ToString::to_string);
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Parses a record id from a path segment. Only positive integers are ids.
#[must_use]
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Today's date (UTC) in ISO format.
#[must_use]
pub fn today() -> String {
    Utc::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Parses an ISO `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// `validator` custom rule for ISO dates.
///
/// # Errors
/// A `date` validation error for anything but `YYYY-MM-DD`.
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if parse_date(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("date").with_message("Enter a valid date (YYYY-MM-DD).".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required."))]
        name: String,
        #[validate(custom(function = "validate_date"))]
        date: String,
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
    }

    #[test]
    fn dates_must_be_iso() {
        assert!(validate_date("2024-06-30").is_ok());
        assert!(validate_date("2024-02-30").is_err());
        assert!(validate_date("30/06/2024").is_err());
        assert!(parse_date(&today()).is_some());
    }

    #[test]
    fn validator_failures_become_field_errors() {
        let sample = Sample { name: String::new(), date: "soon".to_owned() };
        let errors = FieldErrors::from(sample.validate().unwrap_err());

        assert_eq!(errors.get("name"), ["Name is required."]);
        assert_eq!(errors.get("date"), ["Enter a valid date (YYYY-MM-DD)."]);
        assert_eq!(errors.to_string(), "Enter a valid date (YYYY-MM-DD). Name is required.");
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = FieldErrors::single("email", "This email is already in use.");
        assert_eq!(errors.to_string(), "This email is already in use.");

        errors.add("phone", "Phone is too long.");
        assert!(errors.clone().into_result().is_err());
        assert_eq!(errors.to_string(), "This email is already in use. Phone is too long.");
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
