//! EventPass Core - Domain Types
//!
//! Entities, caller commands, identity allocation, the credential codec and
//! the error taxonomy shared by the storage and API crates.

pub mod commands;
pub mod credential;
pub mod entities;
pub mod error;
pub mod identity;

pub use commands::{
    check_length, limits, parse_event_date, parse_event_time, EventDraft, Registration,
};
pub use credential::{CodecConfig, CredentialCodec, CredentialVerifier};
pub use entities::{
    Event, EventDetails, NewEvent, NewUser, User, UserProfile, DATE_FORMAT, TIME_FORMAT,
};
pub use error::{
    CodecError, CodecResult, EntityType, ServiceError, ServiceResult, StoreError, StoreResult,
    UniqueField, ValidationError,
};
pub use identity::{new_entity_id, EntityId, Timestamp};

// Re-exported so downstream crates name one secret type.
pub use secrecy::{ExposeSecret, SecretString};
