use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use oipet_domain::auth::AuthenticatedUser;
use oipet_domain::entities::{CreatePetRequest, Pet};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::{ApiResponse, PaginatedResponse, PaginationParams};

/// Register a pet owned by the caller
#[instrument(skip(state, payload, user), fields(user_id = %user.user_id))]
pub async fn create_pet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreatePetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Pet>>), ApiError> {
    let Json(request) = payload?;
    let pet = state.pets.create_pet(&user.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(pet).with_message("Pet created successfully")),
    ))
}

#[instrument(skip(state, params, user), fields(user_id = %user.user_id))]
pub async fn list_pets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginatedResponse<Pet>>>, ApiError> {
    let Query(params) = params?;
    let page = state.pets.list_pets(&user.user_id, params.limit, params.offset).await?;

    Ok(Json(ApiResponse::ok(PaginatedResponse::new(
        page.pets,
        page.total,
        page.limit,
        page.offset,
    ))))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_pet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pet_id): Path<String>,
) -> Result<Json<ApiResponse<Pet>>, ApiError> {
    let pet = state.pets.get_pet(&pet_id, &user.user_id).await?;
    Ok(Json(ApiResponse::ok(pet)))
}
