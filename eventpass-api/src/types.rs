//! API Request and Response Types
//!
//! JSON bodies for the HTTP gateway. Field names follow the gRPC messages so
//! a client can switch transports without renaming anything.

use std::fmt;

use eventpass_core::{EventDetails, EventDraft, Registration, SecretString, UserProfile};
use serde::{Deserialize, Serialize};

// ============================================================================
// USER TYPES
// ============================================================================

/// Request to register a new account.
#[derive(Clone, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
}

impl fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl From<RegisterUserRequest> for Registration {
    fn from(req: RegisterUserRequest) -> Self {
        Registration {
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            email: req.email,
            phone: req.phone,
            secret: SecretString::from(req.password),
        }
    }
}

/// Response to a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub id: String,
    pub message: String,
}

/// Request to log in.
#[derive(Clone, Deserialize)]
pub struct LoginUserRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginUserRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response to a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUserResponse {
    pub message: String,
    pub user_id: String,
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    /// RFC 3339 creation time
    pub created_at: String,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            username: profile.username,
            email: profile.email,
            phone: profile.phone,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// EVENT TYPES
// ============================================================================

/// Request to create an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub event_title: String,
    #[serde(default)]
    pub event_description: String,
    #[serde(default)]
    pub event_location: String,
    /// YYYY-MM-DD
    pub event_date: String,
    /// HH:MM or HH:MM:SS
    pub event_start_time: String,
    pub event_end_time: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub total_slots: i32,
}

impl From<CreateEventRequest> for EventDraft {
    fn from(req: CreateEventRequest) -> Self {
        EventDraft {
            title: req.event_title,
            description: req.event_description,
            location: req.event_location,
            date: req.event_date,
            start_time: req.event_start_time,
            end_time: req.event_end_time,
            created_by: req.created_by,
            total_slots: req.total_slots,
        }
    }
}

/// Response to a successful event creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub event_id: String,
    pub message: String,
}

/// Event details with textual date and times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetailsResponse {
    pub event_id: String,
    pub event_title: String,
    pub event_description: String,
    pub event_location: String,
    pub event_date: String,
    pub event_start_time: String,
    pub event_end_time: String,
    pub created_by: String,
    pub total_slots: i32,
}

impl From<EventDetails> for EventDetailsResponse {
    fn from(details: EventDetails) -> Self {
        Self {
            event_id: details.event_id,
            event_title: details.title,
            event_description: details.description,
            event_location: details.location,
            event_date: details.date,
            event_start_time: details.start_time,
            event_end_time: details.end_time,
            created_by: details.created_by,
            total_slots: details.total_slots,
        }
    }
}
