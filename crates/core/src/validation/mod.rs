//! Field validation.
//!
//! Structural rules run through the `validator` derive on request DTOs; the
//! relationship-aware rules (admin creator, actor sets) need storage and run
//! through [`gateway::ValidationGateway`]. Both report into [`FieldErrors`]
//! so a request is rejected once, with every failing field listed.

pub mod gateway;
pub mod rules;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Per-field validation messages keyed by the camelCase JSON field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the `validator` derive for `input` and collect its failures.
    pub fn from_validate<T: Validate>(input: &T) -> Self {
        let mut errors = Self::new();
        if let Err(e) = input.validate() {
            errors.merge_validator(&e);
        }
        errors
    }

    pub fn add(&mut self, field: impl AsRef<str>, message: impl Into<String>) {
        self.0
            .entry(camel_case(field.as_ref()))
            .or_default()
            .push(message.into());
    }

    /// Fold `validator` errors in, using each error's message or a generic one.
    pub fn merge_validator(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let field: &str = &field;
            for err in field_errors {
                let message = match &err.message {
                    Some(m) => m.to_string(),
                    None => format!("The {} field is invalid.", camel_case(field)),
                };
                self.add(field, message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when no field failed, otherwise [`CoreError::Validation`].
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// `release_date` -> `releaseDate`. Already camelCase input is unchanged.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
