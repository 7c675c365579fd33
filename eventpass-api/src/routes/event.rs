//! Event REST API Routes
//!
//! Event creation and lookup. Mounted under `/v1`; creation answers on both
//! `/v1/event/create` and `/v1/events`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::{
    error::ApiResult,
    grpc::EVENT_CREATED_MESSAGE,
    services::EventService,
    types::{CreateEventRequest, CreateEventResponse, EventDetailsResponse},
};

/// POST /v1/event/create - Create an event
pub async fn create_event(
    State(events): State<Arc<EventService>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let event_id = events.create_event(req.into()).await?;
    let response = CreateEventResponse {
        event_id,
        message: EVENT_CREATED_MESSAGE.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/events/:event_id - Event details
pub async fn get_event_details(
    State(events): State<Arc<EventService>>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<EventDetailsResponse>> {
    let details = events.get_event_details(&event_id).await?;
    Ok(Json(details.into()))
}

/// Create the event routes router.
pub fn create_router(events: Arc<EventService>) -> Router {
    Router::new()
        .route("/event/create", post(create_event))
        .route("/events", post(create_event))
        .route("/events/:event_id", get(get_event_details))
        .with_state(events)
}
