//! Error types for EventPass operations

use thiserror::Error;

/// Record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    User,
    Event,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::User => write!(f, "user"),
            EntityType::Event => write!(f, "event"),
        }
    }
}

/// Unique field that a conflicting insert collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Id,
    Username,
    Email,
    /// The backend reported a uniqueness violation it could not attribute.
    Unknown,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Id => write!(f, "id"),
            UniqueField::Username => write!(f, "username"),
            UniqueField::Email => write!(f, "email"),
            UniqueField::Unknown => write!(f, "identity"),
        }
    }
}

/// Credential codec errors.
///
/// A verification mismatch is never one of these; it is a plain `false`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Secret must not be empty")]
    EmptySecret,

    #[error("Secret is {len} bytes, maximum is {max}")]
    SecretTooLong { len: usize, max: usize },

    #[error("Stored verifier is malformed: {reason}")]
    MalformedVerifier { reason: String },

    #[error("Invalid codec parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("Hashing failed: {reason}")]
    Hashing { reason: String },
}

/// Record store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} already exists with the same {field}")]
    Conflict { entity: EntityType, field: UniqueField },

    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityType, key: String },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Store operation '{operation}' timed out")]
    Timeout { operation: String },

    #[error("Store backend failure: {reason}")]
    Backend { reason: String },
}

impl StoreError {
    /// Whether the failure came from reaching the store rather than from the data.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. } | StoreError::Timeout { .. })
    }
}

/// Validation errors for caller-supplied values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid format for {field}, expected {expected}")]
    InvalidFormat { field: String, expected: String },
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn format(field: &str, expected: &str) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Outcome categories surfaced by the account and event services.
///
/// Messages here may be logged but are not meant to cross the RPC boundary
/// verbatim; the API layer maps each variant to a fixed, short message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("An account with this {field} already exists")]
    DuplicateIdentity { field: UniqueField },

    #[error("Credential could not be processed: {0}")]
    InvalidCredential(#[from] CodecError),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Event not found: {id}")]
    EventNotFound { id: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl ServiceError {
    pub fn internal(reason: impl Into<String>) -> Self {
        ServiceError::Internal {
            reason: reason.into(),
        }
    }
}

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_conflict() {
        let err = StoreError::Conflict {
            entity: EntityType::User,
            field: UniqueField::Username,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("user"));
        assert!(msg.contains("username"));
    }

    #[test]
    fn test_store_error_display_not_found() {
        let err = StoreError::NotFound {
            entity: EntityType::Event,
            key: "abc".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("event not found"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_store_error_connectivity_classification() {
        assert!(StoreError::Unavailable {
            reason: "pool closed".to_string()
        }
        .is_connectivity());
        assert!(StoreError::Timeout {
            operation: "get_user".to_string()
        }
        .is_connectivity());
        assert!(!StoreError::Backend {
            reason: "bad row".to_string()
        }
        .is_connectivity());
    }

    #[test]
    fn test_codec_error_converts_to_invalid_credential() {
        let err: ServiceError = CodecError::EmptySecret.into();
        assert_eq!(err, ServiceError::InvalidCredential(CodecError::EmptySecret));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::format("event_date", "YYYY-MM-DD");
        let msg = format!("{}", err);
        assert!(msg.contains("event_date"));
        assert!(msg.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_authentication_failed_message_is_generic() {
        let msg = ServiceError::AuthenticationFailed.to_string();
        assert_eq!(msg, "Authentication failed");
    }
}
