//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Lendit API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lendit API",
        version = "0.1.0",
        description = "Rental marketplace backend: users, items, bookings and item requests",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/users", api = domain_users::ApiDoc),
        (path = "/items", api = domain_items::ApiDoc),
        (path = "/bookings", api = domain_bookings::ApiDoc),
        (path = "/requests", api = domain_requests::ApiDoc)
    ),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "items", description = "Item listing endpoints"),
        (name = "bookings", description = "Booking lifecycle endpoints"),
        (name = "requests", description = "Item request endpoints")
    )
)]
pub struct ApiDoc;
