use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use insurenav_recommender::api::{create_router, AppState};
use insurenav_recommender::config::RecommenderConfig;
use insurenav_recommender::models::{MaritalStatus, Occupation, ViewerProfile};
use insurenav_recommender::services::{profile_worker, RecommendationService, SeedStore};

async fn create_test_server() -> TestServer {
    let recommender = RecommendationService::new(
        Arc::new(SeedStore),
        1,
        ViewerProfile::new(30, MaritalStatus::Single, Occupation::Employed),
        RecommenderConfig::default(),
    )
    .await
    .unwrap();

    let (queue, _handle) = profile_worker::spawn(recommender.clone());
    let app = create_router(AppState::new(recommender, queue));
    TestServer::new(app).unwrap()
}

fn ids(list: &Value) -> Vec<u64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_header_is_echoed() {
    let server = create_test_server().await;
    let request_id = "3f1c9a4e-8d5b-4a57-9c1e-2b7d6e0f4a11";

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(request_id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), request_id);
}

#[tokio::test]
async fn test_request_id_header_on_error_response() {
    let server = create_test_server().await;
    let request_id = "9a0e7c2d-41f6-4b8e-a3d5-6c1f0b2e8d47";

    let response = server
        .patch("/api/v1/profile")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(request_id),
        )
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.header("x-request-id"), request_id);
}

#[tokio::test]
async fn test_get_catalog_and_viewers() {
    let server = create_test_server().await;

    let products: Vec<Value> = server.get("/api/v1/products").await.json();
    assert_eq!(products.len(), 12);
    assert_eq!(products[0]["name"], "HealthGuard Plus");

    let viewers: Vec<Value> = server.get("/api/v1/viewers").await.json();
    assert_eq!(viewers.len(), 5);
    assert_eq!(viewers[1]["occupation"], "self-employed");
}

#[tokio::test]
async fn test_initial_recommendations() {
    let server = create_test_server().await;

    let response = server.get("/api/v1/recommendations").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["revision"], 0);
    assert_eq!(ids(&body["recommendations"]["popularity"]), vec![3, 1, 2]);
    assert_eq!(ids(&body["recommendations"]["contentBased"]), vec![9]);
    assert_eq!(ids(&body["recommendations"]["collaborative"]), vec![3, 1, 2]);
}

#[tokio::test]
async fn test_get_recommendations_is_idempotent() {
    let server = create_test_server().await;

    let first: Value = server.get("/api/v1/recommendations").await.json();
    let second: Value = server.get("/api/v1/recommendations").await.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_profile_update_recomputes() {
    let server = create_test_server().await;

    let response = server
        .patch("/api/v1/profile")
        .json(&json!({ "age": 58, "marital_status": "married" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["revision"], 1);
    assert_eq!(body["profile"]["age"], 58);
    assert_eq!(body["profile"]["occupation"], "employed");
    assert_eq!(ids(&body["recommendations"]["collaborative"]), vec![3, 2, 6]);

    let profile: Value = server.get("/api/v1/profile").await.json();
    assert_eq!(profile["marital_status"], "married");

    let neighbors: Value = server.get("/api/v1/recommendations/neighbors").await.json();
    let neighbor_ids: Vec<u64> = neighbors["neighbors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["viewer_id"].as_u64().unwrap())
        .collect();
    assert_eq!(neighbor_ids, vec![4, 2]);
}

#[tokio::test]
async fn test_empty_profile_update_rejected() {
    let server = create_test_server().await;

    let response = server.patch("/api/v1/profile").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_profile_update_rejected() {
    let server = create_test_server().await;

    let response = server
        .patch("/api/v1/profile")
        .json(&json!({ "marital_status": "complicated" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("marital_status"));

    let response = server
        .post("/api/v1/profile/events")
        .json(&json!({ "age": "forty" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let profile: Value = server.get("/api/v1/profile").await.json();
    assert_eq!(profile["marital_status"], "single");
    assert_eq!(profile["age"], 30);
}

#[tokio::test]
async fn test_patch_supersedes_earlier_profile_event() {
    let server = create_test_server().await;

    server
        .post("/api/v1/profile/events")
        .json(&json!({ "age": 40 }))
        .await
        .assert_status(StatusCode::ACCEPTED);

    let response = server
        .patch("/api/v1/profile")
        .json(&json!({ "age": 50 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["profile"]["age"], 50);

    // Give a stray late application of the event time to show up
    tokio::time::sleep(Duration::from_millis(50)).await;

    let profile: Value = server.get("/api/v1/profile").await.json();
    assert_eq!(profile["age"], 50);

    let latest: Value = server.get("/api/v1/recommendations").await.json();
    assert_eq!(latest["profile"]["age"], 50);
}

#[tokio::test]
async fn test_profile_event_is_applied_by_worker() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/profile/events")
        .json(&json!({ "occupation": "retired" }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    let mut applied = false;
    for _ in 0..50 {
        let profile: Value = server.get("/api/v1/profile").await.json();
        if profile["occupation"] == "retired" {
            applied = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(applied);
}

#[tokio::test]
async fn test_ad_hoc_popularity() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "type": "popularity",
            "category": "health",
            "min_rating": 4.0,
            "min_engagement": 0
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(ids(&body), vec![1, 7]);
}

#[tokio::test]
async fn test_ad_hoc_content_and_collaborative() {
    let server = create_test_server().await;

    let body: Value = server
        .post("/api/v1/recommend")
        .json(&json!({ "type": "content", "product_id": 2 }))
        .await
        .json();
    assert_eq!(ids(&body), vec![8]);

    let body: Value = server
        .post("/api/v1/recommend")
        .json(&json!({ "type": "collaborative", "viewer_id": 4, "similar_viewers": 1 }))
        .await
        .json();
    // viewer 4 (60, married) is closest to viewer 2 (45, married): |45-60| = 15
    assert_eq!(ids(&body), vec![3, 2, 4]);
}

#[tokio::test]
async fn test_ad_hoc_errors() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({ "type": "random" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({ "type": "popularity", "num_recommendations": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({ "type": "content", "product_id": 404 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({ "type": "collaborative", "viewer_id": 99 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_snapshot_reload() {
    let server = create_test_server().await;

    let response = server.post("/api/v1/snapshot/reload").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["revision"], 1);
    assert_eq!(ids(&body["recommendations"]["popularity"]), vec![3, 1, 2]);
}
