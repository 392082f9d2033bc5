use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod admin;
pub mod auth;
pub mod events;
pub mod tickets;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "ticketflow-api",
    };

    success(payload, "Health check successful").into_response()
}

/// Catch-all for unknown routes.
pub async fn not_found() -> Response {
    AppError::NotFound("The requested route does not exist".to_string()).into_response()
}
