//! Handler tests for the Bookings domain
//!
//! These run against a disposable PostgreSQL container. Collaborator
//! lookups are implemented directly over the test database, the same way
//! the API binary wires them over the other domains.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use domain_bookings::*;
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
    async fn user_exists(&self, id: Uuid) -> BookingResult<bool> {
        let row = self
            .db
            .query_one_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT 1 FROM users WHERE id = $1",
                [id.into()],
            ))
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;
        Ok(row.is_some())
    }
}

struct DbItemDirectory {
    db: DatabaseConnection,
}

#[async_trait]
impl ItemDirectory for DbItemDirectory {
    async fn get_item(&self, id: Uuid) -> BookingResult<Option<ItemSnapshot>> {
        let row = self
            .db
            .query_one_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT owner_id, available FROM items WHERE id = $1",
                [id.into()],
            ))
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;

        match row {
            Some(row) => {
                let owner_id: Uuid = row
                    .try_get("", "owner_id")
                    .map_err(|e| BookingError::Internal(e.to_string()))?;
                let available: bool = row
                    .try_get("", "available")
                    .map_err(|e| BookingError::Internal(e.to_string()))?;
                Ok(Some(ItemSnapshot {
                    id,
                    owner_id,
                    available,
                }))
            }
            None => Ok(None),
        }
    }

    async fn user_owns_items(&self, user_id: Uuid) -> BookingResult<bool> {
        let row = self
            .db
            .query_one_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT 1 FROM items WHERE owner_id = $1 LIMIT 1",
                [user_id.into()],
            ))
            .await
            .map_err(|e| BookingError::Internal(e.to_string()))?;
        Ok(row.is_some())
    }
}

fn build_service(
    db: &TestDatabase,
) -> BookingService<PgBookingRepository, DbUserDirectory, DbItemDirectory> {
    BookingService::new(
        Arc::new(PgBookingRepository::new(db.connection())),
        Arc::new(DbUserDirectory {
            db: db.connection(),
        }),
        Arc::new(DbItemDirectory {
            db: db.connection(),
        }),
    )
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seed an owner, a booker and an item; returns (owner, booker, item)
async fn seed(db: &TestDatabase, seed_name: &str, available: bool) -> (Uuid, Uuid, Uuid) {
    let builder = TestDataBuilder::from_test_name(seed_name);
    let owner_id = builder.user_id();
    let booker_id = Uuid::new_v4();
    let item_id = Uuid::new_v4();
    db.create_test_user(owner_id).await;
    db.create_test_user(booker_id).await;
    db.create_test_item(item_id, owner_id, available).await;
    (owner_id, booker_id, item_id)
}

fn create_body(item_id: Uuid, start_days: i64, end_days: i64) -> Body {
    Body::from(
        serde_json::to_string(&json!({
            "item_id": item_id,
            "start": Utc::now() + Duration::days(start_days),
            "end": Utc::now() + Duration::days(end_days),
        }))
        .unwrap(),
    )
}

#[tokio::test]
async fn test_create_booking_handler_returns_201_waiting() {
    let db = TestDatabase::new().await;
    let (_owner, booker, item_id) = seed(&db, "booking_create_201", true).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("X-Sharer-User-Id", booker.to_string())
        .body(create_body(item_id, 1, 2))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let booking: Booking = json_body(response.into_body()).await;
    assert_eq!(booking.status, BookingStatus::Waiting);
    assert_eq!(booking.booker_id, booker);
    assert_eq!(booking.item_id, item_id);
}

#[tokio::test]
async fn test_create_booking_handler_own_item_returns_404() {
    let db = TestDatabase::new().await;
    let (owner, _booker, item_id) = seed(&db, "booking_own_item", true).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("X-Sharer-User-Id", owner.to_string())
        .body(create_body(item_id, 1, 2))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_booking_handler_unavailable_item_returns_400() {
    let db = TestDatabase::new().await;
    let (_owner, booker, item_id) = seed(&db, "booking_unavailable", false).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("X-Sharer-User-Id", booker.to_string())
        .body(create_body(item_id, 1, 2))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_booking_handler_start_after_end_returns_400() {
    let db = TestDatabase::new().await;
    let (_owner, booker, item_id) = seed(&db, "booking_bad_span", true).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("X-Sharer-User-Id", booker.to_string())
        .body(create_body(item_id, 2, 1))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_decide_booking_handler_is_single_shot() {
    let db = TestDatabase::new().await;
    let (owner, booker, item_id) = seed(&db, "booking_decide", true).await;

    let service = build_service(&db);
    let booking = service
        .create_booking(
            booker,
            CreateBooking {
                item_id,
                start: Utc::now() + Duration::days(1),
                end: Utc::now() + Duration::days(2),
            },
        )
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/{}?approved=true", booking.id))
        .header("X-Sharer-User-Id", owner.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let decided: Booking = json_body(response.into_body()).await;
    assert_eq!(decided.status, BookingStatus::Approved);

    // A second decision is rejected, even when flipping the verdict
    let retry = Request::builder()
        .method("PATCH")
        .uri(format!("/{}?approved=false", booking.id))
        .header("X-Sharer-User-Id", owner.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(retry).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_decide_booking_handler_by_booker_returns_404() {
    let db = TestDatabase::new().await;
    let (_owner, booker, item_id) = seed(&db, "booking_decide_booker", true).await;

    let service = build_service(&db);
    let booking = service
        .create_booking(
            booker,
            CreateBooking {
                item_id,
                start: Utc::now() + Duration::days(1),
                end: Utc::now() + Duration::days(2),
            },
        )
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/{}?approved=true", booking.id))
        .header("X-Sharer-User-Id", booker.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_booking_handler_hidden_from_strangers() {
    let db = TestDatabase::new().await;
    let (_owner, booker, item_id) = seed(&db, "booking_get_stranger", true).await;
    let stranger = Uuid::new_v4();
    db.create_test_user(stranger).await;

    let service = build_service(&db);
    let booking = service
        .create_booking(
            booker,
            CreateBooking {
                item_id,
                start: Utc::now() + Duration::days(1),
                end: Utc::now() + Duration::days(2),
            },
        )
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", booking.id))
        .header("X-Sharer-User-Id", stranger.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_for_booker_unknown_state_returns_400() {
    let db = TestDatabase::new().await;
    let (_owner, booker, _item) = seed(&db, "booking_bad_state", true).await;

    let app = handlers::router(build_service(&db));

    // The message is fixed regardless of the offending value
    let request = Request::builder()
        .method("GET")
        .uri("/?state=PAST_DUE")
        .header("X-Sharer-User-Id", booker.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(body_str.contains("Unknown state: UNSUPPORTED_STATUS"));
}

#[tokio::test]
async fn test_list_for_booker_orders_by_start_descending() {
    let db = TestDatabase::new().await;
    let (_owner, booker, item_id) = seed(&db, "booking_list_order", true).await;

    let service = build_service(&db);
    let early = service
        .create_booking(
            booker,
            CreateBooking {
                item_id,
                start: Utc::now() + Duration::days(1),
                end: Utc::now() + Duration::days(2),
            },
        )
        .await
        .unwrap();
    let late = service
        .create_booking(
            booker,
            CreateBooking {
                item_id,
                start: Utc::now() + Duration::days(5),
                end: Utc::now() + Duration::days(6),
            },
        )
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?state=FUTURE")
        .header("X-Sharer-User-Id", booker.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bookings: Vec<Booking> = json_body(response.into_body()).await;
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].id, late.id);
    assert_eq!(bookings[1].id, early.id);
}

#[tokio::test]
async fn test_list_for_owner_without_items_returns_404() {
    let db = TestDatabase::new().await;
    let itemless = Uuid::new_v4();
    db.create_test_user(itemless).await;

    let app = handlers::router(build_service(&db));

    let request = Request::builder()
        .method("GET")
        .uri("/owner?state=ALL")
        .header("X-Sharer-User-Id", itemless.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_for_owner_sees_item_bookings() {
    let db = TestDatabase::new().await;
    let (owner, booker, item_id) = seed(&db, "booking_owner_list", true).await;

    let service = build_service(&db);
    service
        .create_booking(
            booker,
            CreateBooking {
                item_id,
                start: Utc::now() + Duration::days(1),
                end: Utc::now() + Duration::days(2),
            },
        )
        .await
        .unwrap();

    let app = handlers::router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/owner")
        .header("X-Sharer-User-Id", owner.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bookings: Vec<Booking> = json_body(response.into_body()).await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].owner_id, owner);
}
