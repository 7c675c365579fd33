//! Caller-supplied inputs to the account and event services.

use chrono::{NaiveDate, NaiveTime};
use secrecy::SecretString;

use crate::error::ValidationError;

/// Registration request. `secret` is plaintext and never stored as such.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub secret: SecretString,
}

/// Event creation request with date and times still in textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub created_by: String,
    pub total_slots: i32,
}

/// Widths, in characters, of the bounded text columns.
pub mod limits {
    pub const FIRST_NAME: usize = 100;
    pub const LAST_NAME: usize = 100;
    pub const USERNAME: usize = 100;
    pub const EMAIL: usize = 255;
    pub const PHONE: usize = 32;
    pub const EVENT_TITLE: usize = 255;
    pub const EVENT_LOCATION: usize = 255;
    pub const CREATED_BY: usize = 100;
}

/// Reject a value longer than `max` characters.
pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::invalid(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_event_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::format(field, "YYYY-MM-DD"))
}

/// Parse `HH:MM:SS`, or `HH:MM` as sent by browser time inputs.
pub fn parse_event_time(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ValidationError::format(field, "HH:MM:SS"))
}
