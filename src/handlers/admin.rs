use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::repositories::TicketRepository;
use crate::services::analytics;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
pub struct RefundRequest {
    pub ticket_id: Uuid,
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct BulkEmailRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

/// Refund a ticket. The status transition is a conditional update guarded to
/// active statuses; the server row is the source of truth, the client never
/// mutates status locally.
pub async fn refund(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<RefundRequest>,
) -> Result<Response, AppError> {
    let reason = req.reason.trim();
    if reason.is_empty() {
        return Err(AppError::ValidationError(
            "Refund reason is required".to_string(),
        ));
    }

    let tickets = TicketRepository::new(state.pool.clone());
    match tickets.refund(req.ticket_id, reason).await? {
        Some(ticket) => {
            tracing::info!(ticket_id = %ticket.id, "Ticket refunded");
            Ok(success(ticket, "Refund processed successfully").into_response())
        }
        None => match tickets.find_by_id(req.ticket_id).await? {
            None => Err(AppError::NotFound("Ticket not found".to_string())),
            Some(ticket) => Err(AppError::Conflict(format!(
                "Ticket cannot be refunded from status '{}'",
                ticket.status
            ))),
        },
    }
}

/// Fan a message out to every distinct customer email. Best-effort: failed
/// recipients are logged and skipped, never retried.
pub async fn bulk_email(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<BulkEmailRequest>,
) -> Result<Response, AppError> {
    let subject = req.subject.trim();
    if subject.is_empty() {
        return Err(AppError::ValidationError("Subject is required".to_string()));
    }
    if req.content.trim().is_empty() {
        return Err(AppError::ValidationError("Content is required".to_string()));
    }

    let recipients = TicketRepository::new(state.pool.clone())
        .distinct_customer_emails()
        .await?;

    let report = state.mailer.send_bulk(&recipients, subject, &req.content).await?;
    tracing::info!(attempted = report.attempted, sent = report.sent, "Bulk email dispatched");

    Ok(success(report, "Bulk email sent successfully").into_response())
}

/// Per-day sales counts and cumulative revenue, recomputed from scratch.
pub async fn sales_analytics(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let sales = TicketRepository::new(state.pool.clone()).sales().await?;
    let series = analytics::aggregate_daily_sales(&sales);

    Ok(success(series, "Sales analytics computed").into_response())
}

/// Dashboard totals.
pub async fn stats(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let stats = TicketRepository::new(state.pool.clone())
        .overview_stats()
        .await?;

    Ok(success(stats, "Overview stats computed").into_response())
}
