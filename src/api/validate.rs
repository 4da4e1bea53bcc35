use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;

/// Collects per-field problems so a payload reports all of them at once
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, problem: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| problem.into());
    }

    /// Non-blank value of a required field, or records it as missing
    pub fn required(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            Some(_) => {
                self.add(field, "This field must not be blank");
                String::new()
            }
            None => {
                self.add(field, "This field is required");
                String::new()
            }
        }
    }

    /// A value supplied on update must still be non-blank
    pub fn not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field must not be blank");
        }
    }

    /// Ids are assigned by the store. A body may only echo back the id of
    /// the entry it updates, as found in a fetched entry.
    pub fn echoed_id(&mut self, supplied: Option<&str>, target: Option<Uuid>) {
        let Some(raw) = supplied else {
            return;
        };
        match target {
            None => self.add("id", "The id is assigned by the store"),
            Some(id) if Uuid::parse_str(raw).ok() != Some(id) => {
                self.add("id", format!("'{}' does not match the entry being updated", raw))
            }
            Some(_) => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ApiError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::validation_error(
                "Payload validation failed",
                Some(self.errors),
            ))
        }
    }
}
