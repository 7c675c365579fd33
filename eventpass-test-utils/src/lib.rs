//! EventPass Test Utilities
//!
//! Shared test infrastructure for the EventPass workspace:
//! - Proptest generators for registrations and event drafts
//! - Fixtures with a cheap credential codec
//! - Assertions over service outcomes

// Re-export mock storage from its source crate
pub use eventpass_storage::{MockStorage, MockTransaction};

// Re-export core types for convenience
pub use eventpass_core::{
    CodecConfig, CredentialCodec, EntityType, EventDraft, Registration, SecretString,
    ServiceError, ServiceResult, StoreError, UniqueField, ValidationError,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for EventPass inputs.

    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Lowercase username, 3 to 16 characters.
    pub fn arb_username() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{2,15}"
    }

    /// Plausible email address.
    pub fn arb_email() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9]{0,11}", "[a-z]{2,10}", prop_oneof!["com", "org", "net"])
            .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld))
    }

    /// Non-empty printable secret that fits the fixture codec's limit.
    pub fn arb_secret() -> impl Strategy<Value = String> {
        "[ -~]{1,48}"
    }

    /// Whole registration with independent username, email and secret.
    pub fn arb_registration() -> impl Strategy<Value = Registration> {
        (
            "[A-Z][a-z]{1,10}",
            "[A-Z][a-z]{1,12}",
            arb_username(),
            arb_email(),
            "[0-9]{7,12}",
            arb_secret(),
        )
            .prop_map(|(first_name, last_name, username, email, phone, secret)| {
                Registration {
                    first_name,
                    last_name,
                    username,
                    email,
                    phone,
                    secret: SecretString::from(secret),
                }
            })
    }

    /// Calendar date between 2020 and 2035.
    pub fn arb_event_date() -> impl Strategy<Value = NaiveDate> {
        (2020i32..2035, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| {
                NaiveDate::from_ymd_opt(y, m, d).expect("day 1-28 exists in every month")
            })
    }

    /// Event draft whose textual date and times always parse.
    pub fn arb_event_draft() -> impl Strategy<Value = EventDraft> {
        (
            "[A-Za-z ]{1,40}",
            "[A-Za-z .,]{0,120}",
            "[A-Za-z0-9 ]{1,40}",
            arb_event_date(),
            0u32..12,
            0u32..60,
            1u32..12,
            "[a-f0-9-]{36}",
            0i32..10_000,
        )
            .prop_map(
                |(title, description, location, date, start_h, minute, span_h, created_by, slots)| {
                    EventDraft {
                        title,
                        description,
                        location,
                        date: date.format("%Y-%m-%d").to_string(),
                        start_time: format!("{:02}:{:02}:00", start_h, minute),
                        end_time: format!("{:02}:{:02}:00", start_h + span_h, minute),
                        created_by,
                        total_slots: slots,
                    }
                },
            )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// Codec parameters small enough for tight test loops.
    pub fn test_codec_config() -> CodecConfig {
        CodecConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            max_secret_bytes: 128,
        }
    }

    /// Codec built from [`test_codec_config`].
    pub fn test_codec() -> CredentialCodec {
        CredentialCodec::new(test_codec_config()).expect("test codec parameters are valid")
    }

    /// Registration with fixed names and the given identity.
    pub fn sample_registration(username: &str, email: &str, secret: &str) -> Registration {
        Registration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            phone: "555-0101".to_string(),
            secret: SecretString::from(secret.to_string()),
        }
    }

    /// Well-formed event draft created by `created_by`.
    pub fn sample_event_draft(created_by: &str) -> EventDraft {
        EventDraft {
            title: "RustConf Meetup".to_string(),
            description: "Talks and pizza".to_string(),
            location: "Room 101".to_string(),
            date: "2025-09-12".to_string(),
            start_time: "18:00:00".to_string(),
            end_time: "21:30:00".to_string(),
            created_by: created_by.to_string(),
            total_slots: 50,
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over service outcomes.

    use super::*;

    /// Assert that a ServiceResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &ServiceResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a ServiceResult is a DuplicateIdentity on `field`.
    #[track_caller]
    pub fn assert_duplicate<T: std::fmt::Debug>(result: &ServiceResult<T>, field: UniqueField) {
        match result {
            Err(ServiceError::DuplicateIdentity { field: f }) => {
                assert_eq!(*f, field, "Wrong field in DuplicateIdentity");
            }
            other => panic!("Expected DuplicateIdentity({}), got: {:?}", field, other),
        }
    }

    /// Assert that a ServiceResult is AuthenticationFailed.
    #[track_caller]
    pub fn assert_auth_failed<T: std::fmt::Debug>(result: &ServiceResult<T>) {
        match result {
            Err(ServiceError::AuthenticationFailed) => {}
            other => panic!("Expected AuthenticationFailed, got: {:?}", other),
        }
    }

    /// Assert that a ServiceResult is InvalidArgument.
    #[track_caller]
    pub fn assert_invalid_argument<T: std::fmt::Debug>(result: &ServiceResult<T>) {
        match result {
            Err(ServiceError::InvalidArgument(_)) => {}
            other => panic!("Expected InvalidArgument, got: {:?}", other),
        }
    }

    /// Assert that a ServiceResult is EventNotFound.
    #[track_caller]
    pub fn assert_event_not_found<T: std::fmt::Debug>(result: &ServiceResult<T>) {
        match result {
            Err(ServiceError::EventNotFound { .. }) => {}
            other => panic!("Expected EventNotFound, got: {:?}", other),
        }
    }

    /// Assert that a ServiceResult is Internal.
    #[track_caller]
    pub fn assert_internal<T: std::fmt::Debug>(result: &ServiceResult<T>) {
        match result {
            Err(ServiceError::Internal { .. }) => {}
            other => panic!("Expected Internal, got: {:?}", other),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
