use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use oipet_domain::auth::{auth_middleware, configure_security};

use crate::api::handlers::{health, health_records, pets};
use crate::api::state::AppState;
use crate::entities::ApiResponse;

/// Build the application router over `state`
pub fn create_app(state: AppState, cors_origin: Option<&str>) -> Router {
    debug!("Creating application router");

    // Every /api route requires a bearer token
    let api_routes = Router::new()
        .route(
            "/health/pets/:pet_id",
            post(health_records::create_record).get(health_records::list_records),
        )
        .route("/health/pets/:pet_id/stats", get(health_records::get_stats))
        .route("/health/pets/:pet_id/weight", get(health_records::get_weight_history))
        .route(
            "/health/:record_id",
            get(health_records::get_record)
                .put(health_records::update_record)
                .delete(health_records::delete_record),
        )
        .route("/pets", post(pets::create_pet).get(pets::list_pets))
        .route("/pets/:pet_id", get(pets::get_pet))
        .route_layer(middleware::from_fn_with_state(state.auth.clone(), auth_middleware));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    debug!("Application routes configured");

    configure_security(app, cors_origin)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Not Found", "The requested resource does not exist")),
    )
}
