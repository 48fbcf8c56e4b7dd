//! Core customer types for crm.
//!
//! This module defines the customer record stored in the data file and the
//! partial update applied to it.

use serde::{Deserialize, Serialize};

/// A single customer record.
///
/// Every field is free text and may be empty. The email address is the
/// lookup key used by update and delete, compared case-insensitively, but
/// nothing enforces its uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

impl Customer {
    /// Create a new customer record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// Check whether this customer's email equals `email`, ignoring case.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// Check whether the name or email contains `term`, ignoring case.
    ///
    /// The term is expected to be lowercased already.
    #[must_use]
    pub fn matches_lowercase(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term) || self.email.to_lowercase().contains(term)
    }

    /// Apply a partial update, returning `true` if any field changed value.
    pub fn apply(&mut self, update: &CustomerUpdate) -> bool {
        let mut changed = false;
        for (slot, value) in [
            (&mut self.name, &update.name),
            (&mut self.phone, &update.phone),
            (&mut self.address, &update.address),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                if slot.as_str() != value {
                    *slot = value.to_string();
                    changed = true;
                }
            }
        }
        changed
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Name: {}, Email: {}, Phone: {}, Address: {}",
            self.name, self.email, self.phone, self.address
        )
    }
}

/// Replacement values for an update.
///
/// `None` and empty strings both leave the stored value as it was. The email
/// cannot be changed since it identifies the record being updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
    /// New name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New postal address.
    pub address: Option<String>,
}

impl CustomerUpdate {
    /// Build an update from raw prompt answers, where a blank answer means
    /// "keep the current value".
    #[must_use]
    pub fn from_answers(name: String, phone: String, address: String) -> Self {
        let keep_blank = |s: String| if s.is_empty() { None } else { Some(s) };
        Self {
            name: keep_blank(name),
            phone: keep_blank(phone),
            address: keep_blank(address),
        }
    }

    /// Set the new name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the new phone number.
    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the new postal address.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Check whether this update would leave every field untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.phone, &self.address]
            .iter()
            .all(|v| v.as_deref().map_or(true, str::is_empty))
    }
}
