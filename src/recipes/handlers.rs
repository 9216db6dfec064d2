use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use super::{dto::CreateRecipeRequest, repo_types::Recipe, services};
use crate::{
    api_response::{ListResponse, MessageResponse},
    auth::jwt::AuthUser,
    error::AppResult,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/getrecipe", get(list_recipes))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/addrecipes", post(add_recipe))
        .route("/deleterecipe/:id", delete(delete_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(State(state): State<AppState>) -> AppResult<Json<ListResponse<Recipe>>> {
    let recipes = services::list_recipes(state.store.recipes()).await?;
    Ok(Json(ListResponse::ok(recipes)))
}

#[instrument(skip(state, payload))]
pub async fn add_recipe(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse<Recipe>>)> {
    let Json(req) = payload?;
    let recipe = services::create_recipe(state.store.recipes(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data("Recipe added successfully", recipe)),
    ))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse<()>>> {
    services::delete_recipe(state.store.recipes(), &id).await?;
    tracing::debug!(%caller, "recipe removed by caller");
    Ok(Json(MessageResponse::message("Recipe deleted successfully")))
}
