//! Field-level validation of freelancer drafts.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;
use shared::domain::{FreelancerFields, RecordField};

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));
static PHONE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"));

/// Field → message. A field without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<RecordField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: RecordField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn clear(&mut self, field: RecordField) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: RecordField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (_, message)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

pub fn validate(fields: &FreelancerFields) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    for field in RecordField::ALL {
        let value = fields.get(field);
        if value.trim().is_empty() {
            errors.insert(field, format!("{} is required", field.label()));
            continue;
        }
        match field {
            RecordField::Email if !EMAIL_SHAPE.is_match(value) => {
                errors.insert(field, "Email is invalid");
            }
            // Checked untrimmed: surrounding whitespace is a format error.
            RecordField::PhoneNumber if !PHONE_DIGITS.is_match(value) => {
                errors.insert(field, "Phone Number must be 10 digits");
            }
            _ => {}
        }
    }

    errors
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
