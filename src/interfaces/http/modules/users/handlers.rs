//! User directory API handlers
//!
//! Handlers check request shape, delegate to [`UserService`] and map the
//! service outcome to a status code.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use crate::application::users::{
    is_valid_email, CountUsersQuery, CountsResponse, ListUsersQuery, SetRolesInput, UserInput,
    UserResponse,
};
use crate::application::{messages, ResultType, ServiceResult, UserService};
use crate::domain::DomainResult;
use crate::infrastructure::database::repositories::UserRepository;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};

/// User handler state - concrete over `UserRepository` for Axum compatibility.
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService<UserRepository>>,
}

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

fn invalid_data() -> ApiError {
    api_error(StatusCode::BAD_REQUEST, messages::INVALID_DATA)
}

/// Path ids must be positive integers.
fn parse_user_id(raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid_data()),
    }
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(api_error(StatusCode::BAD_REQUEST, messages::INVALID_EMAIL))
    }
}

/// Maps a service outcome to a response. `created` is the status used for
/// `ResultType::Created`.
fn respond<T>(result: DomainResult<ServiceResult<T>>, created: StatusCode) -> ApiResult<T> {
    let outcome = result.map_err(|e| {
        error!(error = %e, "User operation failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?;

    let status = match outcome.status_code {
        ResultType::Success => StatusCode::OK,
        ResultType::Created => created,
        ResultType::NotFound => StatusCode::NOT_FOUND,
        ResultType::Conflict => StatusCode::CONFLICT,
        ResultType::BadRequest => StatusCode::BAD_REQUEST,
    };

    match outcome.payload {
        Some(payload) if outcome.is_ok() => Ok((status, Json(ApiResponse::success(payload)))),
        _ => Err(api_error(status, outcome.error.unwrap_or_default())),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users/all",
    tag = "Users",
    request_body = ListUsersQuery,
    responses(
        (status = 200, description = "Page of users", body = ApiResponse<Vec<UserResponse>>),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    ValidatedJson(query): ValidatedJson<ListUsersQuery>,
) -> ApiResult<Vec<UserResponse>> {
    respond(state.user_service.list(query).await, StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/v1/users/count",
    tag = "Users",
    request_body = CountUsersQuery,
    responses(
        (status = 200, description = "User and page counts", body = ApiResponse<CountsResponse>),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn count_users(
    State(state): State<UserHandlerState>,
    ValidatedJson(query): ValidatedJson<CountUsersQuery>,
) -> ApiResult<CountsResponse> {
    respond(state.user_service.count(query).await, StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<String>,
) -> ApiResult<UserResponse> {
    let user_id = parse_user_id(&user_id)?;
    respond(state.user_service.get_by_id(user_id).await, StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/roles",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = SetRolesInput,
    responses(
        (status = 200, description = "Roles replaced", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_user_roles(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<String>,
    ValidatedJson(input): ValidatedJson<SetRolesInput>,
) -> ApiResult<UserResponse> {
    let user_id = parse_user_id(&user_id)?;
    respond(
        state.user_service.set_roles(user_id, input).await,
        StatusCode::OK,
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = UserInput,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid data or email"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> ApiResult<UserResponse> {
    check_email(&input.email)?;
    respond(state.user_service.create(input).await, StatusCode::CREATED)
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body = UserInput,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid data or email"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<String>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> ApiResult<UserResponse> {
    let user_id = parse_user_id(&user_id)?;
    check_email(&input.email)?;
    respond(
        state.user_service.update(user_id, input).await,
        StatusCode::OK,
    )
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<bool>),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(user_id): Path<String>,
) -> ApiResult<bool> {
    let user_id = parse_user_id(&user_id)?;
    respond(state.user_service.delete(user_id).await, StatusCode::OK)
}
