//! Input rules for users, messages and friend pairs.
//!
//! Every rule of a record is checked; violations are collected per field
//! rather than stopping at the first one.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;

pub const NAME_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 500;

/// Field name -> messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            tracing::warn!(fields = ?self.fields.keys().collect::<Vec<_>>(), "validation failed");
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "One or more validation errors occurred")?;
        for (field, messages) in &self.fields {
            write!(f, "; {field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

fn check_text(errors: &mut ValidationErrors, field: &str, value: &str, label: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required."));
    } else if value.chars().count() > max {
        errors.add(field, format!("{label} must not exceed {max} characters."));
    }
}

pub fn validate_user_name(name: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "name", name, "Name", NAME_MAX_CHARS);
    errors
}

pub fn validate_message(sender_id: Uuid, receiver_id: Uuid, content: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "content", content, "Message content", CONTENT_MAX_CHARS);
    if sender_id.is_nil() {
        errors.add("senderId", "SenderId is invalid.");
    }
    if receiver_id.is_nil() {
        errors.add("receiverId", "ReceiverId is invalid.");
    }
    errors
}

pub fn validate_friend_pair(user_id: Uuid, friend_id: Uuid) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if user_id == friend_id {
        errors.add("friendId", "A user cannot befriend themselves.");
    }
    errors
}
