//! Synchronous field rules plugged into `#[validate(custom(...))]`.

use std::borrow::Cow;
use std::collections::HashSet;

use validator::ValidationError;

use crate::types::{Date, DbId};

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn parse_id(value: &str) -> Option<DbId> {
    DbId::parse_str(value.trim()).ok()
}

pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    match parse_date(value) {
        Some(_) => Ok(()),
        None => Err(rule_error(
            "date",
            "The date must be a valid calendar date in YYYY-MM-DD format.",
        )),
    }
}

pub fn validate_id(value: &str) -> Result<(), ValidationError> {
    match parse_id(value) {
        Some(_) => Ok(()),
        None => Err(rule_error("uuid", "The identifier must be a valid UUID.")),
    }
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule_error("blank", "The field must not be blank."))
    } else {
        Ok(())
    }
}

/// At least eight characters with upper and lower case letters, a digit and
/// a symbol.
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    let long_enough = value.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = value.chars().any(char::is_uppercase);
    let has_lower = value.chars().any(char::is_lowercase);
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_symbol = value
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_upper && has_lower && has_digit && has_symbol {
        Ok(())
    } else {
        Err(rule_error(
            "password",
            "The password must be at least 8 characters and contain an uppercase letter, a lowercase letter, a number and a symbol.",
        ))
    }
}

/// Shape failures of an identifier set, checked before any lookup runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetShapeError {
    Empty,
    Duplicates,
}

impl SetShapeError {
    pub fn message(self, field: &str) -> String {
        match self {
            SetShapeError::Empty => format!("The {field} field must contain at least one identifier."),
            SetShapeError::Duplicates => {
                format!("The {field} field must not contain duplicate identifiers.")
            }
        }
    }
}

/// Reject empty sets and sets naming the same identifier twice.
///
/// Identifiers are compared after parsing, so two spellings of one UUID
/// count as duplicates. Unparseable entries are left for the resolver to
/// report as malformed.
pub fn check_set_shape(raw: &[String]) -> Result<(), SetShapeError> {
    if raw.is_empty() {
        return Err(SetShapeError::Empty);
    }
    let mut seen_ids = HashSet::with_capacity(raw.len());
    let mut seen_raw = HashSet::new();
    for value in raw {
        let fresh = match parse_id(value) {
            Some(id) => seen_ids.insert(id),
            None => seen_raw.insert(value.trim()),
        };
        if !fresh {
            return Err(SetShapeError::Duplicates);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_must_be_iso_calendar_days() {
        assert!(validate_date("1995-12-15").is_ok());
        assert!(validate_date("2024-02-29").is_ok());
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("15/12/1995").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn password_needs_every_character_class() {
        assert!(validate_password("Sup3r$ecret").is_ok());
        assert!(validate_password("Sh0rt!").is_err());
        assert!(validate_password("nouppercase1!").is_err());
        assert!(validate_password("ALLUPPER1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSymbol123").is_err());
    }

    #[test]
    fn blank_means_whitespace_only() {
        assert!(validate_not_blank("Heat").is_ok());
        assert!(validate_not_blank("  Heat ").is_ok());
        assert_eq!(validate_not_blank("").unwrap_err().code, "blank");
        assert_eq!(validate_not_blank(" \t\n ").unwrap_err().code, "blank");
    }

    #[test]
    fn set_shape_rejects_empty() {
        assert_eq!(check_set_shape(&[]), Err(SetShapeError::Empty));
    }

    #[test]
    fn set_shape_compares_parsed_ids() {
        let id = DbId::new_v4();
        let raw = vec![id.to_string(), id.to_string().to_uppercase()];
        assert_eq!(check_set_shape(&raw), Err(SetShapeError::Duplicates));
    }

    #[test]
    fn set_shape_leaves_malformed_entries_alone() {
        let raw = vec!["nope".to_string(), DbId::new_v4().to_string()];
        assert_eq!(check_set_shape(&raw), Ok(()));
    }
}
