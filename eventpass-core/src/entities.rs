//! Stored records and their read projections.

use chrono::{NaiveDate, NaiveTime};

use crate::credential::CredentialVerifier;
use crate::identity::{EntityId, Timestamp};

/// Fixed textual form for event dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed textual form for event times.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A registered account as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password_verifier: CredentialVerifier,
    /// Assigned by the store at insert time.
    pub created_at: Timestamp,
}

impl User {
    /// Drop the verifier for anything leaving the service layer.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            created_at: self.created_at,
        }
    }
}

/// Insert payload for a user. `created_at` is left to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub user_id: EntityId,
    pub email: String,
    pub password_verifier: CredentialVerifier,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone: String,
}

/// Externally visible view of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub created_at: Timestamp,
}

/// An event as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_id: EntityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Identifier of the creating user. Not a foreign key.
    pub created_by: String,
    pub total_slots: i32,
    pub created_at: Timestamp,
}

impl Event {
    /// Render with locale-independent date and time strings.
    pub fn details(&self) -> EventDetails {
        EventDetails {
            event_id: self.event_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            date: self.date.format(DATE_FORMAT).to_string(),
            start_time: self.start_time.format(TIME_FORMAT).to_string(),
            end_time: self.end_time.format(TIME_FORMAT).to_string(),
            created_by: self.created_by.clone(),
            total_slots: self.total_slots,
        }
    }
}

/// Insert payload for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub event_id: EntityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_by: String,
    pub total_slots: i32,
}

/// Event as returned to callers: date is `YYYY-MM-DD`, times are `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub event_id: EntityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub created_by: String,
    pub total_slots: i32,
}
