//! Domain records exchanged with the backend.
//!
//! Records are sent and received verbatim. Inputs are checked with
//! `validate()` before they leave the client; a failure never reaches the
//! wire. Dates travel as calendar dates (`YYYY-MM-DD`).

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::ApiError;

/// Days before expiry at which an item counts as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 7;

const MIN_PASSWORD_LEN: usize = 6;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// =============================================================================
// FOOD ITEMS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: u64,
    pub title: String,
    pub quantity: i64,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl FoodItem {
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty title or a quantity
    /// below 1.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_entry("title", &self.title, self.quantity)
    }

    #[must_use]
    pub fn expiry_status(&self, today: Date) -> ExpiryStatus {
        ExpiryStatus::classify(self.expiry_date, today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFoodItem {
    pub title: String,
    pub quantity: i64,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
}

impl NewFoodItem {
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty title or a quantity
    /// below 1.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_entry("title", &self.title, self.quantity)
    }
}

// =============================================================================
// PANTRY ITEMS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: u64,
    pub name: String,
    pub quantity: i64,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
}

impl PantryItem {
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty name or a quantity
    /// below 1.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_entry("name", &self.name, self.quantity)
    }

    #[must_use]
    pub fn expiry_status(&self, today: Date) -> ExpiryStatus {
        ExpiryStatus::classify(self.expiry_date, today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPantryItem {
    pub name: String,
    pub quantity: i64,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
}

impl NewPantryItem {
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty name or a quantity
    /// below 1.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_entry("name", &self.name, self.quantity)
    }
}

fn validate_entry(field: &str, label: &str, quantity: i64) -> Result<(), ApiError> {
    if label.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    if quantity < 1 {
        return Err(ApiError::Validation("quantity must be at least 1".into()));
    }
    Ok(())
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if the email is empty or has no `@`,
    /// or the password is shorter than six characters.
    pub fn validate(&self) -> Result<(), ApiError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ApiError::Validation("email is required".into()));
        }
        if !email.contains('@') {
            return Err(ApiError::Validation("email must contain '@'".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// =============================================================================
// RECIPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub recipe: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRecipeRequest {
    pub ingredients: Vec<String>,
}

// =============================================================================
// EXPIRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Fresh,
}

impl ExpiryStatus {
    #[must_use]
    pub fn classify(expiry: Date, today: Date) -> Self {
        match days_until(expiry, today) {
            d if d < 0 => Self::Expired,
            d if d <= EXPIRING_SOON_DAYS => Self::ExpiringSoon,
            _ => Self::Fresh,
        }
    }
}

/// Whole days from `today` to `expiry`; negative once expired.
#[must_use]
pub fn days_until(expiry: Date, today: Date) -> i64 {
    (expiry - today).whole_days()
}

/// Current UTC calendar date.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

// =============================================================================
// DATES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date {0:?}; expected YYYY-MM-DD")]
pub struct InvalidDate(pub String);

/// Parse `YYYY-MM-DD`. A full RFC 3339 timestamp is accepted and truncated
/// to its date part.
///
/// # Errors
///
/// Returns [`InvalidDate`] if the input is not a real calendar date.
pub fn parse_iso_date(raw: &str) -> Result<Date, InvalidDate> {
    let raw = raw.trim();
    Date::parse(raw, ISO_DATE)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339).map(OffsetDateTime::date))
        .map_err(|_| InvalidDate(raw.to_owned()))
}

/// Render `date` as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`time::error::Format`] for a year outside `0..=9999`.
pub fn format_iso_date(date: Date) -> Result<String, time::error::Format> {
    date.format(ISO_DATE)
}

/// Serde adapter for `YYYY-MM-DD` date fields.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = super::format_iso_date(*date).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    /// # Errors
    ///
    /// Fails if the value is not a string holding a valid date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
