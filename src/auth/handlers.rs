use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    api_response::{ListResponse, MessageResponse},
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        repo_types::User,
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users))
        .route("/adduser", post(add_user))
        .route("/login", post(login))
        .route("/deleteuser/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<ListResponse<User>>> {
    let users = services::list_users(state.store.users()).await?;
    Ok(Json(ListResponse::ok(users)))
}

#[instrument(skip(state, payload))]
pub async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse<bool>>)> {
    let Json(req) = payload?;
    services::register(state.store.users(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data("User registered successfully", true)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(req) = payload?;
    let user = services::authenticate(state.store.users(), req).await?;
    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse<User>>> {
    let user = services::delete_user(state.store.users(), caller, &id).await?;
    Ok(Json(MessageResponse::with_data("User deleted successfully", user)))
}
