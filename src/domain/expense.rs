//! Expense entries
//!
//! Parsing of submitted form fields and the persisted entry shape.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// Flat string-keyed field set as delivered by the form transport
pub type FormFields = HashMap<String, String>;

pub const FIELD_TEXT: &str = "text";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_DATE: &str = "date";

/// Hour of day (UTC) every entry date is anchored to
const ANCHOR_HOUR: u32 = 12;

// =========================================================================
// ExpenseForm
// =========================================================================

/// A validated expense submission, not yet tied to a user
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub occurred_on: DateTime<Utc>,
}

impl ExpenseForm {
    /// Validate and parse raw form fields.
    ///
    /// All four fields are checked for presence before any of them is
    /// parsed, so a blank date beats a malformed amount.
    pub fn parse(fields: &FormFields) -> Result<Self, DomainError> {
        let text = required(fields, FIELD_TEXT)?;
        let amount = required(fields, FIELD_AMOUNT)?;
        let category = required(fields, FIELD_CATEGORY)?;
        let date = required(fields, FIELD_DATE)?;

        Ok(Self {
            description: text.to_string(),
            amount: parse_amount(amount)?,
            category: category.to_string(),
            occurred_on: normalize_date(date)?,
        })
    }

    /// Bind this submission to its owner
    pub fn into_new_entry(self, user_external_id: impl Into<String>) -> NewExpenseEntry {
        NewExpenseEntry {
            description: self.description,
            amount: self.amount,
            category: self.category,
            occurred_on: self.occurred_on,
            user_external_id: user_external_id.into(),
        }
    }
}

/// Fetch a field, trimmed; blank counts as missing
fn required<'a>(fields: &'a FormFields, name: &'static str) -> Result<&'a str, DomainError> {
    fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or(DomainError::MissingField(name))
}

/// Parse an amount. Zero and negative values are allowed (refunds,
/// corrections); NaN and infinities are not.
pub fn parse_amount(raw: &str) -> Result<f64, DomainError> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| DomainError::InvalidAmount(raw.to_string()))
}

/// Turn `YYYY-MM-DD` into 12:00:00 UTC on that calendar date.
///
/// Anchoring at midday keeps the calendar date stable when the instant is
/// rendered in any timezone between UTC-12 and UTC+11.
pub fn normalize_date(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    let invalid = || DomainError::InvalidDate(raw.to_string());

    let parts: Vec<&str> = raw.trim().split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };

    let year: i32 = numeric(year, 4, 4).ok_or_else(invalid)?;
    let month: u32 = numeric(month, 1, 2).ok_or_else(invalid)?;
    let day: u32 = numeric(day, 1, 2).ok_or_else(invalid)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(ANCHOR_HOUR, 0, 0))
        .ok_or_else(invalid)?;

    Ok(Utc.from_utc_datetime(&naive))
}

fn numeric<T: std::str::FromStr>(part: &str, min_len: usize, max_len: usize) -> Option<T> {
    let len_ok = (min_len..=max_len).contains(&part.len());
    if !len_ok || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// ISO-8601 instant with millisecond precision and a `Z` suffix
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =========================================================================
// Persisted entries
// =========================================================================

/// Fields needed to insert an expense entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpenseEntry {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub occurred_on: DateTime<Utc>,
    pub user_external_id: String,
}

/// A stored expense entry
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseEntry {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub occurred_on: DateTime<Utc>,
    pub user_external_id: String,
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordData {
    pub text: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

impl From<&ExpenseEntry> for RecordData {
    fn from(entry: &ExpenseEntry) -> Self {
        Self {
            text: entry.description.clone(),
            amount: entry.amount,
            category: entry.category.clone(),
            date: format_instant(&entry.occurred_on),
        }
    }
}
