use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::repositories::{EventRepository, TicketRepository};
use crate::services::checkin;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
pub struct CheckinRequest {
    /// Decoded QR payload: the ticket's unique code.
    pub code: String,
}

#[derive(Deserialize)]
pub struct PurchaseRequest {
    pub ticket_type: String,
    #[serde(default)]
    pub customer_email: String,
}

/// Check-in: one conditional update transitions the ticket to `used`.
/// Zero rows affected is classified by re-fetching the ticket, so a double
/// scan reports "already used" rather than succeeding twice.
pub async fn check_in(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CheckinRequest>,
) -> Result<Response, AppError> {
    let code = req.code.trim();
    if code.is_empty() {
        return Err(AppError::ValidationError("Scan payload is empty".to_string()));
    }

    let tickets = TicketRepository::new(state.pool.clone());
    match tickets.check_in(code).await? {
        Some(ticket) => {
            tracing::info!(code = %ticket.unique_id, "Ticket checked in");
            Ok(success(ticket, "Check-in successful!").into_response())
        }
        None => {
            let existing = tickets.find_by_code(code).await?;
            Err(checkin::classify_failed_scan(existing.as_ref()))
        }
    }
}

/// Claim one available ticket of the requested type for a customer. The
/// returned `unique_id` is the payload the printable QR artifact encodes.
pub async fn purchase(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Response, AppError> {
    let customer_email = req.customer_email.trim().to_lowercase();
    if customer_email.is_empty() || !customer_email.contains('@') {
        return Err(AppError::ValidationError(
            "Please enter your email address".to_string(),
        ));
    }
    let ticket_type = req.ticket_type.trim();
    if ticket_type.is_empty() {
        return Err(AppError::ValidationError(
            "Ticket type is required".to_string(),
        ));
    }

    let tickets = TicketRepository::new(state.pool.clone());
    match tickets
        .purchase(event_id, ticket_type, &customer_email)
        .await?
    {
        Some(ticket) => Ok(success(ticket, "Ticket purchased successfully!").into_response()),
        None => {
            // Distinguish a missing event from a sold-out ticket type.
            let event = EventRepository::new(state.pool.clone())
                .find_by_id(event_id)
                .await?;
            match event {
                None => Err(AppError::NotFound(format!(
                    "Event with id '{event_id}' was not found"
                ))),
                Some(_) => Err(AppError::Conflict(format!(
                    "No '{ticket_type}' tickets are available for this event"
                ))),
            }
        }
    }
}

pub async fn get_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let ticket = TicketRepository::new(state.pool.clone())
        .find_by_code(code.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid ticket".to_string()))?;

    Ok(success(ticket, "Ticket retrieved").into_response())
}

/// Attendee table data: every ticket of the event with a customer attached.
pub async fn attendees(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let attendees = TicketRepository::new(state.pool.clone())
        .attendees_for_event(event_id)
        .await?;

    Ok(success(attendees, "Attendees retrieved").into_response())
}
