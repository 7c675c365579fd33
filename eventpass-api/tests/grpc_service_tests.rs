//! gRPC Service Tests
//!
//! Calls the tonic service implementations directly and checks response
//! bodies and status codes.

use eventpass_api::grpc::proto::event_service_server::EventService as _;
use eventpass_api::grpc::proto::user_service_server::UserService as _;
use eventpass_api::grpc::proto::{
    CreateEventRequest, GetEventDetailsRequest, GetUserProfileRequest, LoginUserRequest,
    RegisterUserRequest,
};
use eventpass_api::grpc::{EventServiceImpl, UserServiceImpl};
use tonic::{Code, Request};

#[path = "support/services.rs"]
mod test_service_support;
use test_service_support::{test_services, TestServices};

fn user_service(services: &TestServices) -> UserServiceImpl {
    UserServiceImpl::new(services.accounts.clone())
}

fn event_service(services: &TestServices) -> EventServiceImpl {
    EventServiceImpl::new(services.events.clone())
}

fn register_request(username: &str, email: &str, password: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        username: username.to_string(),
        email: email.to_string(),
        phone: "555-0101".to_string(),
        password: password.to_string(),
    }
}

fn create_event_request(total_slots: i32) -> CreateEventRequest {
    CreateEventRequest {
        event_title: "Launch party".to_string(),
        event_description: "Cake".to_string(),
        event_location: "Roof".to_string(),
        event_date: "2025-06-01".to_string(),
        event_start_time: "19:00".to_string(),
        event_end_time: "23:00".to_string(),
        created_by: "user-1".to_string(),
        total_slots,
    }
}

#[tokio::test]
async fn register_login_and_profile() {
    let services = test_services();
    let users = user_service(&services);

    let registered = users
        .register_user(Request::new(register_request("ada", "ada@example.com", "pw")))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(registered.message, "User registered successfully");
    assert!(!registered.id.is_empty());

    let login = users
        .login_user(Request::new(LoginUserRequest {
            username: "ada".to_string(),
            password: "pw".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(login.message, "Login successful");
    assert_eq!(login.user_id, registered.id);

    let profile = users
        .get_user_profile(Request::new(GetUserProfileRequest {
            user_id: registered.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(profile.username, "ada");
    assert!(profile.created_at > 0);
}

#[tokio::test]
async fn duplicate_registration_is_already_exists() {
    let services = test_services();
    let users = user_service(&services);

    users
        .register_user(Request::new(register_request("ada", "ada@example.com", "pw")))
        .await
        .unwrap();
    let status = users
        .register_user(Request::new(register_request("ada", "new@example.com", "pw")))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::AlreadyExists);
}

#[tokio::test]
async fn login_failures_are_unauthenticated_with_one_message() {
    let services = test_services();
    let users = user_service(&services);
    users
        .register_user(Request::new(register_request("ada", "ada@example.com", "pw")))
        .await
        .unwrap();

    let wrong = users
        .login_user(Request::new(LoginUserRequest {
            username: "ada".to_string(),
            password: "nope".to_string(),
        }))
        .await
        .unwrap_err();
    let unknown = users
        .login_user(Request::new(LoginUserRequest {
            username: "nobody".to_string(),
            password: "pw".to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(wrong.code(), Code::Unauthenticated);
    assert_eq!(unknown.code(), Code::Unauthenticated);
    assert_eq!(wrong.message(), unknown.message());
}

#[tokio::test]
async fn blank_username_is_invalid_argument() {
    let services = test_services();
    let status = user_service(&services)
        .register_user(Request::new(register_request(" ", "ada@example.com", "pw")))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn create_and_fetch_event() {
    let services = test_services();
    let events = event_service(&services);

    let created = events
        .create_event(Request::new(create_event_request(25)))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(created.message, "Event created successfully");

    let details = events
        .get_event_details(Request::new(GetEventDetailsRequest {
            event_id: created.event_id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(details.event_title, "Launch party");
    assert_eq!(details.event_date, "2025-06-01");
    assert_eq!(details.event_start_time, "19:00:00");
    assert_eq!(details.event_end_time, "23:00:00");
    assert_eq!(details.total_slots, 25);
}

#[tokio::test]
async fn negative_slots_is_invalid_argument() {
    let services = test_services();
    let status = event_service(&services)
        .create_event(Request::new(create_event_request(-1)))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(services.store.write_count(), 0);
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let services = test_services();
    let status = event_service(&services)
        .get_event_details(Request::new(GetEventDetailsRequest {
            event_id: "missing".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn store_outage_is_internal() {
    let services = test_services();
    services.store.set_unavailable(true);
    let status = event_service(&services)
        .create_event(Request::new(create_event_request(5)))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Internal);
}

#[tokio::test]
async fn over_wide_fields_are_invalid_argument() {
    let services = test_services();
    let users = user_service(&services);
    let events = event_service(&services);

    let status = users
        .register_user(Request::new(RegisterUserRequest {
            phone: "1".repeat(40),
            ..register_request("ada", "ada@example.com", "pw")
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = events
        .create_event(Request::new(CreateEventRequest {
            event_title: "t".repeat(256),
            ..create_event_request(10)
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    assert_eq!(services.store.write_count(), 0);
}
