//! Router tests against an in-memory store

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use speedcam_api::{Config, build_router};
use speedcam_domain::CameraRecord;
use speedcam_store::{CameraRepository, InMemoryRepository, JsonFileRepository};

fn camera(city: &str, limit: &str) -> CameraRecord {
    CameraRecord {
        city_name: city.to_string(),
        speed_limit: limit.to_string(),
        latitude: "22.65".to_string(),
        longitude: "120.33".to_string(),
        ..Default::default()
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn list_points_returns_all_records() {
    let repo = Arc::new(InMemoryRepository::new(vec![
        camera("高雄市", "50"),
        camera("臺北市", "40"),
    ]));
    let app = build_router(repo, &Config::default());

    let response = app
        .oneshot(Request::get("/points").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["CityName"], "高雄市");
    assert_eq!(points[1]["limit"], "40");
}

#[tokio::test]
async fn create_point_appends_and_returns_created() {
    let repo = Arc::new(InMemoryRepository::default());
    let app = build_router(repo.clone(), &Config::default());

    let payload = json!({
        "CityName": "花蓮縣",
        "limit": "70",
        "Latitude": "24.0021",
        "Longitude": "121.5997",
        "direct": "雙向"
    });
    let response = app.oneshot(post_json("/points", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["CityName"], "花蓮縣");
    assert_eq!(body["direct"], "雙向");
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn create_point_requires_city_and_limit() {
    let repo = Arc::new(InMemoryRepository::default());
    let app = build_router(repo.clone(), &Config::default());

    let response = app
        .oneshot(post_json("/points", &json!({ "CityName": "花蓮縣" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required fields (CityName, limit)");
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = build_router(Arc::new(InMemoryRepository::default()), &Config::default());

    let request = Request::builder()
        .method("POST")
        .uri("/points")
        .header("content-type", "application/json")
        .body(Body::from("{oops"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn stats_applies_filter_and_search() {
    let repo = Arc::new(InMemoryRepository::new(vec![
        camera("高雄市", "50"),
        camera("高雄市", "60"),
        camera("臺北市", "50"),
    ]));
    let app = build_router(repo, &Config::default());

    let response = app
        .oneshot(Request::get("/stats?limit=50&search=%E9%AB%98%E9%9B%84").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["summary"]["total_count"], 2);
    assert_eq!(body["speed_limits"], json!(["50", "60"]));
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn json_store_round_trip_through_router() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(JsonFileRepository::open(dir.path().join("db.json")).await.unwrap());
    let app = build_router(repo, &Config::default());

    let created = app
        .clone()
        .oneshot(post_json("/points", &json!({ "CityName": "臺東縣", "limit": 60 })))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = app
        .oneshot(Request::get("/points").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(listed).await;
    assert_eq!(body[0]["limit"], "60");
}

#[tokio::test]
async fn health_check_ok() {
    let app = build_router(Arc::new(InMemoryRepository::default()), &Config::default());
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
