use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use oipet_data::database::{initialize_database_pool, DatabaseConfig};
use oipet_domain::auth::AuthConfig;
use oipet_domain::services::ErrorKind;
use oipet_domain::testing::{issue_token, FailingHealthRecordService};

use crate::api::{create_app, AppState};

const SECRET: &str = "test-secret";
const ISSUER: &str = "oipet-api";

fn auth_config() -> AuthConfig {
    AuthConfig::new(SECRET, ISSUER)
}

fn app_with(state: AppState) -> Router {
    create_app(state, None)
}

fn app() -> Router {
    app_with(AppState::new(None, auth_config(), "test"))
}

fn bearer(user_id: &str) -> String {
    format!("Bearer {}", issue_token(&auth_config(), user_id, 60).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, user: Option<&str>, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, bearer(user));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_pet(app: &Router, user: &str) -> String {
    let body = json!({
        "name": "Rex",
        "species": "dog",
        "breed": "Labrador",
        "birthDate": "2020-05-01",
        "weight": 25.0,
        "height": 55.0,
        "gender": "male",
    });
    let (status, value) = send(app, Method::POST, "/api/pets", Some(user), Some(&body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", value);
    value["data"]["id"].as_str().unwrap().to_string()
}

async fn create_record(app: &Router, user: &str, pet_id: &str, body: Value) -> (StatusCode, Value) {
    let uri = format!("/api/health/pets/{}", pet_id);
    send(app, Method::POST, &uri, Some(user), Some(&body.to_string())).await
}

#[tokio::test]
async fn test_owner_creates_and_updates_record() {
    let app = app();
    let pet_id = create_pet(&app, "u1").await;

    let (status, created) = create_record(&app, "u1", &pet_id, json!({"date": "2024-01-01", "weight": 10})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["petId"], pet_id.as_str());
    assert_eq!(created["data"]["weight"], 10.0);

    let record_id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/health/{}", record_id);

    let (status, updated) = send(&app, Method::PUT, &uri, Some("u1"), Some(r#"{"weight": 11}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["weight"], 11.0);
    assert_eq!(updated["data"]["date"], created["data"]["date"]);
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);
}

#[tokio::test]
async fn test_other_user_is_forbidden() {
    let app = app();
    let pet_id = create_pet(&app, "u1").await;

    let (status, body) = create_record(&app, "u2", &pet_id, json!({"date": "2024-01-01", "weight": 10})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (_, created) = create_record(&app, "u1", &pet_id, json!({"date": "2024-01-01", "weight": 10})).await;
    let uri = format!("/api/health/{}", created["data"]["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::GET, &uri, Some("u2"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::PUT, &uri, Some("u2"), Some(r#"{"weight": 12}"#)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &uri, Some("u2"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Untouched by the rejected calls
    let (status, record) = send(&app, Method::GET, &uri, Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["data"]["weight"], 10.0);
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/pets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let request = Request::builder()
        .uri("/api/pets")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let expired = issue_token(&auth_config(), "u1", -10).unwrap();
    let request = Request::builder()
        .uri("/api/pets")
        .header(header::AUTHORIZATION, format!("Bearer {}", expired))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_and_unknown_fields_are_bad_requests() {
    let app = app();
    let pet_id = create_pet(&app, "u1").await;
    let (_, created) = create_record(&app, "u1", &pet_id, json!({"weight": 10})).await;
    let uri = format!("/api/health/{}", created["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some("u1"), Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::PUT, &uri, Some("u1"), Some(r#"{"petId": "other"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::PUT, &uri, Some("u1"), Some(r#"{"weight": 500}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("weight"));
}

#[tokio::test]
async fn test_deleted_record_is_not_found() {
    let app = app();
    let pet_id = create_pet(&app, "u1").await;
    let (_, created) = create_record(&app, "u1", &pet_id, json!({"weight": 10})).await;
    let uri = format!("/api/health/{}", created["data"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Health record deleted successfully");

    let (status, _) = send(&app, Method::GET, &uri, Some("u1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some("u1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_stats_and_weight_history() {
    let app = app();
    let pet_id = create_pet(&app, "u1").await;
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();

    create_record(&app, "u1", &pet_id, json!({"date": today, "weight": 10.0})).await;
    create_record(
        &app,
        "u1",
        &pet_id,
        json!({"date": today, "weight": 11.0, "activity": {"type": "walk", "duration": 30, "intensity": "low"}}),
    )
    .await;

    let (status, list) = send(&app, Method::GET, &format!("/api/health/pets/{}", pet_id), Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    let (status, stats) = send(&app, Method::GET, &format!("/api/health/pets/{}/stats?days=7", pet_id), Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["data"]["totalRecords"], 2);
    assert_eq!(stats["data"]["periodDays"], 7);
    assert_eq!(stats["data"]["totalActivities"], 1);

    let (status, history) = send(&app, Method::GET, &format!("/api/health/pets/{}/weight", pet_id), Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["data"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, &format!("/api/health/pets/{}/stats?days=0", pet_id), Some("u1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, &format!("/api/health/pets/{}/stats?days=abc", pet_id), Some("u1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_records_by_date_range() {
    let app = app();
    let pet_id = create_pet(&app, "u1").await;
    for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        create_record(&app, "u1", &pet_id, json!({"date": day, "weight": 10})).await;
    }

    let uri = format!("/api/health/pets/{}?startDate=2024-01-02&endDate=2024-01-02", pet_id);
    let (status, body) = send(&app, Method::GET, &uri, Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["date"], "2024-01-02T00:00:00Z");

    let uri = format!("/api/health/pets/{}?startDate=2024-01-03&endDate=2024-01-01", pet_id);
    let (status, _) = send(&app, Method::GET, &uri, Some("u1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/health/pets/{}?startDate=soon", pet_id);
    let (status, _) = send(&app, Method::GET, &uri, Some("u1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_huge_pet_offset_is_an_empty_page() {
    let pool = initialize_database_pool(&DatabaseConfig::in_memory()).unwrap();
    let sqlite = app_with(AppState::new(Some(pool), auth_config(), "test"));

    for app in [app(), sqlite] {
        create_pet(&app, "u1").await;

        let (status, page) = send(&app, Method::GET, "/api/pets?offset=9223372036854775808", Some("u1"), None).await;
        assert_eq!(status, StatusCode::OK, "{}", page);
        assert_eq!(page["data"]["total"], 1);
        assert_eq!(page["data"]["count"], 0);
        assert_eq!(page["data"]["hasNext"], false);
    }
}

#[tokio::test]
async fn test_pets_are_scoped_to_owner() {
    let app = app();
    let pet_id = create_pet(&app, "u1").await;
    create_pet(&app, "u1").await;
    create_pet(&app, "u2").await;

    let (status, page) = send(&app, Method::GET, "/api/pets?limit=1", Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"]["total"], 2);
    assert_eq!(page["data"]["count"], 1);
    assert_eq!(page["data"]["hasNext"], true);

    let (status, _) = send(&app, Method::GET, &format!("/api/pets/{}", pet_id), Some("u2"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/pets/missing", Some("u1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_masked() {
    let state = AppState::new(None, auth_config(), "test")
        .with_health_record_service(Arc::new(FailingHealthRecordService::new(ErrorKind::Store)));
    let app = app_with(state);

    let (status, body) = send(&app, Method::GET, "/api/health/r1", Some("u1"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "An unexpected error occurred");
}

#[tokio::test]
async fn test_public_health_and_fallback() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let (status, body) = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
