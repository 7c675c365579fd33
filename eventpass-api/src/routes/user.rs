//! User REST API Routes
//!
//! Registration, login and profile lookup. Mounted under `/v1/users`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use eventpass_core::SecretString;
use std::sync::Arc;

use crate::{
    error::ApiResult,
    grpc::{LOGIN_MESSAGE, REGISTERED_MESSAGE},
    services::AccountService,
    types::{
        LoginUserRequest, LoginUserResponse, RegisterUserRequest, RegisterUserResponse,
        UserProfileResponse,
    },
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /v1/users/register - Create an account
pub async fn register_user(
    State(accounts): State<Arc<AccountService>>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let id = accounts.register(req.into()).await?;
    let response = RegisterUserResponse {
        id,
        message: REGISTERED_MESSAGE.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /v1/users/login - Check credentials
pub async fn login_user(
    State(accounts): State<Arc<AccountService>>,
    payload: Result<Json<LoginUserRequest>, JsonRejection>,
) -> ApiResult<Json<LoginUserResponse>> {
    let Json(req) = payload?;
    let LoginUserRequest { username, password } = req;
    let user_id = accounts
        .login(&username, SecretString::from(password))
        .await?;
    Ok(Json(LoginUserResponse {
        message: LOGIN_MESSAGE.to_string(),
        user_id,
    }))
}

/// GET /v1/users/:user_id - Public profile
pub async fn get_user_profile(
    State(accounts): State<Arc<AccountService>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserProfileResponse>> {
    let profile = accounts.get_profile(&user_id).await?;
    Ok(Json(profile.into()))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the user routes router.
pub fn create_router(accounts: Arc<AccountService>) -> Router {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/:user_id", get(get_user_profile))
        .with_state(accounts)
}
