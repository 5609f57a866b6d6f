//! Client-side validation for guest and accompany forms.
//!
//! Mirrors the rules the admin API enforces so the console can reject bad
//! input before a round trip.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{AccompanyEntry, GuestInput};

const NAME_MAX: usize = 150;
const MOBILE_MIN: usize = 10;
const MOBILE_MAX: usize = 15;
const QUOTA_MAX: u32 = 100;
const DESCRIPTION_MAX: usize = 10_000;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears on the wire.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Whether `email` looks like a deliverable address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a guest create/update form.
pub fn validate_guest(input: &GuestInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let name_len = input.name.chars().count();
    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required."));
    } else if name_len > NAME_MAX {
        errors.push(FieldError::new("name", "Name cannot exceed 150 characters."));
    }

    if input.email.is_empty() {
        errors.push(FieldError::new("email", "Email is required."));
    } else if !is_valid_email(&input.email) {
        errors.push(FieldError::new("email", "Please enter a valid email address."));
    }

    let mobile_len = input.mobile.chars().count();
    if mobile_len < MOBILE_MIN {
        errors.push(FieldError::new(
            "mobile",
            "Mobile number must be at least 10 digits.",
        ));
    } else if mobile_len > MOBILE_MAX {
        errors.push(FieldError::new(
            "mobile",
            "Mobile number cannot exceed 15 digits.",
        ));
    } else if !all_digits(&input.mobile) {
        errors.push(FieldError::new(
            "mobile",
            "Mobile number must contain only digits.",
        ));
    }

    if input.accompany_quota > QUOTA_MAX {
        errors.push(FieldError::new(
            "accompanyQuota",
            "Accompany quota cannot exceed 100.",
        ));
    }

    if input.description.chars().count() > DESCRIPTION_MAX {
        errors.push(FieldError::new(
            "description",
            "Description cannot exceed 10000 characters.",
        ));
    }

    errors
}

/// Validate one accompanying guest entered on the public registration form.
///
/// `index` is zero-based; field names are reported as `accompanies.N.field`.
pub fn validate_accompany(index: usize, entry: &AccompanyEntry) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let field = |name: &str| format!("accompanies.{index}.{name}");

    if entry.name.trim().is_empty() {
        errors.push(FieldError::new(field("name"), "Name is required"));
    }
    if !is_valid_email(&entry.email) {
        errors.push(FieldError::new(field("email"), "Valid email required"));
    }
    if entry.mobile.len() != 10 || !all_digits(&entry.mobile) {
        errors.push(FieldError::new(field("mobile"), "Mobile must be 10 digits"));
    }

    errors
}

/// Validate a full registration: exactly `quota` entries, each valid.
pub fn validate_registration(quota: u32, entries: &[AccompanyEntry]) -> Vec<FieldError> {
    if entries.len() != quota as usize {
        return vec![FieldError::new(
            "accompanies",
            "Please fill all accompany details",
        )];
    }

    entries
        .iter()
        .enumerate()
        .flat_map(|(i, entry)| validate_accompany(i, entry))
        .collect()
}
