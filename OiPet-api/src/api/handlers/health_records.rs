use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use oipet_domain::auth::AuthenticatedUser;
use oipet_domain::entities::{
    CreateHealthRecordRequest, HealthRecord, HealthStats, RecordRange, UpdateHealthRecordRequest,
    WeightEntry,
};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::entities::{ApiResponse, DaysQuery};

/// Create a health record for one of the caller's pets
#[instrument(skip(state, payload, user), fields(user_id = %user.user_id))]
pub async fn create_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pet_id): Path<String>,
    payload: Result<Json<CreateHealthRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<HealthRecord>>), ApiError> {
    let Json(request) = payload?;

    let record = state
        .health_records
        .create_record(&pet_id, &user.user_id, request)
        .await?;

    info!("Health record {} created", record.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record).with_message("Health record created successfully")),
    ))
}

/// The pet's latest records, newest first, optionally between `startDate` and `endDate`
#[instrument(skip(state, range, user), fields(user_id = %user.user_id))]
pub async fn list_records(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pet_id): Path<String>,
    range: Result<Query<RecordRange>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<HealthRecord>>>, ApiError> {
    let Query(range) = range?;
    let records = state.health_records.list_records(&pet_id, &user.user_id, range).await?;
    Ok(Json(ApiResponse::ok(records)))
}

#[instrument(skip(state, query, user), fields(user_id = %user.user_id))]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pet_id): Path<String>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<HealthStats>>, ApiError> {
    let Query(query) = query?;
    let stats = state.health_records.get_stats(&pet_id, &user.user_id, query.days).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

#[instrument(skip(state, query, user), fields(user_id = %user.user_id))]
pub async fn get_weight_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pet_id): Path<String>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<WeightEntry>>>, ApiError> {
    let Query(query) = query?;
    let history = state
        .health_records
        .get_weight_history(&pet_id, &user.user_id, query.days)
        .await?;
    Ok(Json(ApiResponse::ok(history)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(record_id): Path<String>,
) -> Result<Json<ApiResponse<HealthRecord>>, ApiError> {
    let record = state.health_records.get_record(&record_id, &user.user_id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// Partially update a record. Unknown fields are rejected with 400.
#[instrument(skip(state, payload, user), fields(user_id = %user.user_id))]
pub async fn update_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(record_id): Path<String>,
    payload: Result<Json<UpdateHealthRecordRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<HealthRecord>>, ApiError> {
    let Json(patch) = payload?;

    let record = state
        .health_records
        .update_record(&record_id, &user.user_id, patch)
        .await?;

    Ok(Json(ApiResponse::ok(record).with_message("Health record updated successfully")))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(record_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.health_records.delete_record(&record_id, &user.user_id).await?;
    Ok(Json(ApiResponse::acknowledged("Health record deleted successfully")))
}
