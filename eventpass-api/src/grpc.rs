//! gRPC Service Implementation
//!
//! Implements the services defined in proto/eventpass.proto on top of
//! [`AccountService`] and [`EventService`]. The HTTP gateway in `routes`
//! calls the same services, so both transports share one behavior.

use std::sync::Arc;
use std::time::Instant;

use eventpass_core::{EventDetails, EventDraft, Registration, SecretString, UserProfile};
use tonic::{Request, Response, Status};

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::services::{AccountService, EventService};
use crate::telemetry::metrics::observe_rpc;

// Include the generated protobuf code
pub mod proto {
    tonic::include_proto!("eventpass");
}

use proto::*;

pub const REGISTERED_MESSAGE: &str = "User registered successfully";
pub const LOGIN_MESSAGE: &str = "Login successful";
pub const EVENT_CREATED_MESSAGE: &str = "Event created successfully";

// ============================================================================
// ERROR CONVERSION
// ============================================================================

impl From<ApiError> for Status {
    fn from(err: ApiError) -> Self {
        match err.code {
            ErrorCode::Unauthorized => Status::unauthenticated(err.message),
            ErrorCode::InvalidInput | ErrorCode::MissingField | ErrorCode::InvalidFormat => {
                Status::invalid_argument(err.message)
            }
            ErrorCode::UserNotFound | ErrorCode::EventNotFound => Status::not_found(err.message),
            ErrorCode::EntityAlreadyExists => Status::already_exists(err.message),
            ErrorCode::ConnectionPoolExhausted => Status::resource_exhausted(err.message),
            ErrorCode::ServiceUnavailable => Status::unavailable(err.message),
            ErrorCode::Timeout => Status::deadline_exceeded(err.message),
            ErrorCode::InternalError | ErrorCode::DatabaseError => Status::internal(err.message),
        }
    }
}

/// Wrap an outcome in a tonic response and record the call.
fn respond<T>(
    service: &str,
    method: &str,
    start: Instant,
    result: ApiResult<T>,
) -> Result<Response<T>, Status> {
    let result = result.map(Response::new).map_err(Status::from);
    let code = match &result {
        Ok(_) => tonic::Code::Ok,
        Err(status) => status.code(),
    };
    observe_rpc(service, method, code, start.elapsed());
    result
}

fn profile_to_proto(profile: UserProfile) -> UserProfileResponse {
    UserProfileResponse {
        user_id: profile.user_id,
        first_name: profile.first_name,
        last_name: profile.last_name,
        username: profile.username,
        email: profile.email,
        phone: profile.phone,
        created_at: profile.created_at.timestamp_millis(),
    }
}

fn details_to_proto(details: EventDetails) -> EventDetailsResponse {
    EventDetailsResponse {
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

// ============================================================================
// USER SERVICE IMPLEMENTATION
// ============================================================================

pub struct UserServiceImpl {
    accounts: Arc<AccountService>,
}

impl UserServiceImpl {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }
}

#[tonic::async_trait]
impl user_service_server::UserService for UserServiceImpl {
    async fn register_user(
        &self,
        request: Request<RegisterUserRequest>,
    ) -> Result<Response<RegisterUserResponse>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let registration = Registration {
            first_name: req.first_name,
            last_name: req.last_name,
            username: req.username,
            email: req.email,
            phone: req.phone,
            secret: SecretString::from(req.password),
        };

        let result = self
            .accounts
            .register(registration)
            .await
            .map(|id| RegisterUserResponse {
                id,
                message: REGISTERED_MESSAGE.to_string(),
            })
            .map_err(ApiError::from);
        respond("UserService", "RegisterUser", start, result)
    }

    async fn login_user(
        &self,
        request: Request<LoginUserRequest>,
    ) -> Result<Response<LoginUserResponse>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let result = self
            .accounts
            .login(&req.username, SecretString::from(req.password))
            .await
            .map(|user_id| LoginUserResponse {
                message: LOGIN_MESSAGE.to_string(),
                user_id,
            })
            .map_err(ApiError::from);
        respond("UserService", "LoginUser", start, result)
    }

    async fn get_user_profile(
        &self,
        request: Request<GetUserProfileRequest>,
    ) -> Result<Response<UserProfileResponse>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let result = self
            .accounts
            .get_profile(&req.user_id)
            .await
            .map(profile_to_proto)
            .map_err(ApiError::from);
        respond("UserService", "GetUserProfile", start, result)
    }
}

// ============================================================================
// EVENT SERVICE IMPLEMENTATION
// ============================================================================

pub struct EventServiceImpl {
    events: Arc<EventService>,
}

impl EventServiceImpl {
    pub fn new(events: Arc<EventService>) -> Self {
        Self { events }
    }
}

#[tonic::async_trait]
impl event_service_server::EventService for EventServiceImpl {
    async fn create_event(
        &self,
        request: Request<CreateEventRequest>,
    ) -> Result<Response<CreateEventResponse>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let draft = EventDraft {
            title: req.event_title,
            description: req.event_description,
            location: req.event_location,
            date: req.event_date,
            start_time: req.event_start_time,
            end_time: req.event_end_time,
            created_by: req.created_by,
            total_slots: req.total_slots,
        };

        let result = self
            .events
            .create_event(draft)
            .await
            .map(|event_id| CreateEventResponse {
                event_id,
                message: EVENT_CREATED_MESSAGE.to_string(),
            })
            .map_err(ApiError::from);
        respond("EventService", "CreateEvent", start, result)
    }

    async fn get_event_details(
        &self,
        request: Request<GetEventDetailsRequest>,
    ) -> Result<Response<EventDetailsResponse>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let result = self
            .events
            .get_event_details(&req.event_id)
            .await
            .map(details_to_proto)
            .map_err(ApiError::from);
        respond("EventService", "GetEventDetails", start, result)
    }
}

// ============================================================================
// PUBLIC API - Service Constructors
// ============================================================================

/// Both gRPC service servers, ready for registration.
pub type GrpcServices = (
    user_service_server::UserServiceServer<UserServiceImpl>,
    event_service_server::EventServiceServer<EventServiceImpl>,
);

/// Create the gRPC service implementations over shared services.
pub fn create_services(accounts: Arc<AccountService>, events: Arc<EventService>) -> GrpcServices {
    (
        user_service_server::UserServiceServer::new(UserServiceImpl::new(accounts)),
        event_service_server::EventServiceServer::new(EventServiceImpl::new(events)),
    )
}
