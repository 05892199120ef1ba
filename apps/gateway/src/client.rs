//! HTTP client forwarding validated requests to the upstream API

use axum::body::Body;
use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::Response;
use axum_helpers::AppError;
use axum_helpers::extractors::USER_ID_HEADER;
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

/// Forwards requests to the Lendit API, passing the upstream status
/// and body through unchanged.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        user: Option<Uuid>,
        query: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Response, AppError> {
        let mut url = format!("{}{}", self.base_url, path);
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }

        let mut request = self.http.request(method, &url);
        if let Some(user) = user {
            request = request.header(USER_ID_HEADER, user.to_string());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let upstream = request.send().await.map_err(|e| {
            AppError::ServiceUnavailable(format!("Upstream request failed: {}", e))
        })?;

        let status =
            StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = upstream
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = upstream.bytes().await.map_err(|e| {
            AppError::ServiceUnavailable(format!("Upstream body read failed: {}", e))
        })?;

        let mut response = Response::builder().status(status);
        if let Some(content_type) = content_type {
            response = response.header(CONTENT_TYPE, content_type);
        }
        response
            .body(Body::from(bytes))
            .map_err(|e| AppError::InternalServerError(format!("Response assembly failed: {}", e)))
    }
}
