mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use bookshare_api::{
    models::Role, routes::build_router, services::auth_service::issue_access_token,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::offline_state;

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn protected_route_without_token_is_401_fail() {
    let app = build_router(offline_state().await);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/donations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn invalid_donation_payload_is_400_before_any_write() {
    let state = offline_state().await;
    let token = issue_access_token(&state.config, "users-abc", Role::User).unwrap();
    let app = build_router(state);

    let payload = json!({
        "title": "Dune",
        "author": "Frank Herbert",
        "publisher": "Chilton",
        "publishYear": 999,
        "synopsis": "Spice",
        "genre": "Fiksi",
        "bookCondition": "baru"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/donations")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["status"], "fail");
    assert!(body["message"].as_str().unwrap().contains("\"publishYear\""));
}

#[tokio::test]
async fn unknown_route_uses_fail_envelope() {
    let app = build_router(offline_state().await);

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn health_route_answers_without_database() {
    let app = build_router(offline_state().await);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn comment_edit_by_body_requires_comment_id() {
    let state = offline_state().await;
    let token = issue_access_token(&state.config, "users-abc", Role::User).unwrap();
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/review/review-abc/comment")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "commentId": " ", "text": "hai" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["status"], "fail");
    assert!(body["message"].as_str().unwrap().contains("\"commentId\""));
}
