//! Router assembly and readiness checks

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use std::sync::Arc;

use crate::adapters::{BookingHistory, ItemLookup, UserLookup};
use crate::state::AppState;
use domain_bookings::{BookingService, PgBookingRepository};
use domain_items::{ItemService, PgItemRepository};
use domain_requests::{PgRequestRepository, RequestService};
use domain_users::{PgUserRepository, UserService};

/// Build the domain routers on top of a single connection pool.
///
/// Every domain gets its own Postgres repository; the cross-domain
/// adapters reuse the same repositories behind the collaborator traits.
pub fn routes(state: &AppState) -> Router {
    let users_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let items_repo = Arc::new(PgItemRepository::new(state.db.clone()));
    let bookings_repo = Arc::new(PgBookingRepository::new(state.db.clone()));
    let requests_repo = Arc::new(PgRequestRepository::new(state.db.clone()));

    let user_lookup = Arc::new(UserLookup::new(Arc::clone(&users_repo)));
    let item_lookup = Arc::new(ItemLookup::new(Arc::clone(&items_repo)));
    let booking_history = Arc::new(BookingHistory::new(Arc::clone(&bookings_repo)));

    let users = UserService::new(users_repo);
    let items = ItemService::new(
        items_repo,
        Arc::clone(&user_lookup),
        booking_history,
    );
    let bookings = BookingService::new(
        bookings_repo,
        Arc::clone(&user_lookup),
        Arc::clone(&item_lookup),
    );
    let requests = RequestService::new(requests_repo, user_lookup, item_lookup);

    Router::new()
        .nest("/users", domain_users::handlers::router(users))
        .nest("/items", domain_items::handlers::router(items))
        .nest("/bookings", domain_bookings::handlers::router(bookings))
        .nest("/requests", domain_requests::handlers::router(requests))
}

/// Readiness endpoint verifying the database connection is usable.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| format!("Database check failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

/// Router exposing `/health/ready`, backed by the shared state.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/health/ready", get(ready_handler))
        .with_state(state)
}
