//! Handler tests for the Item Requests domain
//!
//! These run against a disposable PostgreSQL container. Collaborator
//! lookups are implemented directly over the test database, the same way
//! the API binary wires them over the other domains.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_requests::*;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use serde_json::json;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

struct DbUserDirectory {
    db: DatabaseConnection,
}

#[async_trait]
impl UserDirectory for DbUserDirectory {
    async fn user_exists(&self, id: Uuid) -> RequestResult<bool> {
        let row = self
            .db
            .query_one_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT 1 FROM users WHERE id = $1",
                [id.into()],
            ))
            .await
            .map_err(|e| RequestError::Internal(e.to_string()))?;
        Ok(row.is_some())
    }
}

struct NoItems;

#[async_trait]
impl ItemProvider for NoItems {
    async fn items_answering(&self, _request_ids: &[Uuid]) -> RequestResult<Vec<AnsweringItem>> {
        Ok(Vec::new())
    }
}

fn build_service(
    db: &TestDatabase,
) -> RequestService<PgRequestRepository, DbUserDirectory, NoItems> {
    RequestService::new(
        Arc::new(PgRequestRepository::new(db.connection())),
        Arc::new(DbUserDirectory {
            db: db.connection(),
        }),
        Arc::new(NoItems),
    )
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_request_handler_returns_201() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("request_create_201");
    let user_id = builder.user_id();
    db.create_test_user(user_id).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("X-Sharer-User-Id", user_id.to_string())
        .body(Body::from(
            serde_json::to_string(&json!({
                "description": "Need a circular saw",
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let created: ItemRequest = json_body(response.into_body()).await;
    assert_eq!(created.requestor_id, user_id);
    assert_eq!(created.description, "Need a circular saw");
}

#[tokio::test]
async fn test_create_request_handler_requires_header() {
    let db = TestDatabase::new().await;
    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "description": "Need a circular saw",
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_request_handler_rejects_blank_description() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("request_blank");
    let user_id = builder.user_id();
    db.create_test_user(user_id).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("X-Sharer-User-Id", user_id.to_string())
        .body(Body::from(
            serde_json::to_string(&json!({
                "description": "   ",
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_request_handler_unknown_user_returns_404() {
    let db = TestDatabase::new().await;
    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("X-Sharer-User-Id", Uuid::new_v4().to_string())
        .body(Body::from(
            serde_json::to_string(&json!({
                "description": "Need a circular saw",
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_own_requests_newest_first() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("request_own_order");
    let user_id = builder.user_id();
    db.create_test_user(user_id).await;

    let service = build_service(&db);
    let first = service
        .create_request(
            user_id,
            CreateItemRequest {
                description: "first".to_string(),
            },
        )
        .await
        .unwrap();
    let second = service
        .create_request(
            user_id,
            CreateItemRequest {
                description: "second".to_string(),
            },
        )
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("X-Sharer-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let requests: Vec<RequestWithItems> = json_body(response.into_body()).await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].request.id, second.id);
    assert_eq!(requests[1].request.id, first.id);
    assert!(requests[0].items.is_empty());
}

#[tokio::test]
async fn test_all_requests_excludes_own() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("request_all");
    let user_id = builder.user_id();
    let other_id = Uuid::new_v4();
    db.create_test_user(user_id).await;
    db.create_test_user(other_id).await;

    let service = build_service(&db);
    service
        .create_request(
            user_id,
            CreateItemRequest {
                description: "mine".to_string(),
            },
        )
        .await
        .unwrap();
    service
        .create_request(
            other_id,
            CreateItemRequest {
                description: "theirs".to_string(),
            },
        )
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/all")
        .header("X-Sharer-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let requests: Vec<RequestWithItems> = json_body(response.into_body()).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].request.description, "theirs");
}

#[tokio::test]
async fn test_get_request_handler_returns_404_for_missing() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("request_get_404");
    let user_id = builder.user_id();
    db.create_test_user(user_id).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", Uuid::new_v4()))
        .header("X-Sharer-User-Id", user_id.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
