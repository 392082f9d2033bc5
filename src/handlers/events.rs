use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::models::{Event, NewEvent, TicketTypeDraft};
use crate::repositories::EventRepository;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

/// Event creation form payload. Dates and times arrive as form strings and
/// optional fields may be empty strings, matching the admin console's form.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub ticket_types: Vec<TicketTypeDraft>,
}

impl CreateEventRequest {
    /// Local validation, performed before any database work. A rejection
    /// here means no network round trip happened at all.
    pub fn validate(self, created_by: Uuid) -> Result<(NewEvent, Vec<TicketTypeDraft>), String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Event name is required".to_string());
        }

        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err("Category is required".to_string());
        }

        if self.start_time.trim().is_empty() {
            return Err("Start time is required".to_string());
        }
        if self.start_date.trim().is_empty() {
            return Err("Start date is required".to_string());
        }

        let start_date = parse_date(&self.start_date).ok_or("Start date must be YYYY-MM-DD")?;
        let start_time = parse_time(&self.start_time).ok_or("Start time must be HH:MM")?;

        let end_date = match none_if_empty(self.end_date) {
            Some(raw) => Some(parse_date(&raw).ok_or("End date must be YYYY-MM-DD")?),
            None => None,
        };
        let end_time = match none_if_empty(self.end_time) {
            Some(raw) => Some(parse_time(&raw).ok_or("End time must be HH:MM")?),
            None => None,
        };

        for draft in &self.ticket_types {
            if draft.name.trim().is_empty() {
                return Err("Every ticket type needs a name".to_string());
            }
            if draft.price.is_sign_negative() || draft.service_fee.is_sign_negative() {
                return Err("Ticket prices and fees cannot be negative".to_string());
            }
        }

        let event = NewEvent {
            name,
            category,
            start_date,
            start_time,
            end_date,
            end_time,
            location: none_if_empty(self.location),
            description: none_if_empty(self.description),
            capacity: self.capacity,
            created_by,
        };
        Ok((event, self.ticket_types))
    }
}

fn none_if_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

#[derive(Serialize)]
pub struct CreatedEventPayload {
    pub event: Event,
    pub tickets_issued: u64,
}

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = EventRepository::new(state.pool.clone()).list().await?;
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = EventRepository::new(state.pool.clone())
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{event_id}' was not found")))?;

    Ok(success(event, "Event retrieved").into_response())
}

pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    let (new_event, drafts) = req.validate(admin.id).map_err(AppError::ValidationError)?;

    let (event, tickets_issued) = EventRepository::new(state.pool.clone())
        .create_with_tickets(new_event, &drafts)
        .await?;

    tracing::info!(event_id = %event.id, tickets_issued, "Event created");

    let payload = CreatedEventPayload {
        event,
        tickets_issued,
    };
    Ok(created(payload, "Event created successfully!").into_response())
}

pub async fn remove(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let deleted = EventRepository::new(state.pool.clone())
        .delete(event_id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound(format!(
            "Event with id '{event_id}' was not found"
        )));
    }

    Ok(empty_success("Event deleted").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            name: "Launch Party".to_string(),
            category: "Music".to_string(),
            start_date: "2024-06-01".to_string(),
            start_time: "18:00".to_string(),
            end_date: String::new(),
            end_time: String::new(),
            location: "Warehouse 12".to_string(),
            description: String::new(),
            capacity: Some(500),
            ticket_types: vec![TicketTypeDraft {
                name: "General".to_string(),
                price: dec!(100),
                quantity: 10,
                service_fee: dec!(20),
            }],
        }
    }

    #[test]
    fn valid_request_passes() {
        let (event, drafts) = request().validate(Uuid::new_v4()).unwrap();
        assert_eq!(event.name, "Launch Party");
        assert_eq!(event.start_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn empty_category_is_rejected_locally() {
        let mut req = request();
        req.category = "  ".to_string();
        let err = req.validate(Uuid::new_v4()).unwrap_err();
        assert_eq!(err, "Category is required");
    }

    #[test]
    fn empty_start_time_is_rejected_locally() {
        let mut req = request();
        req.start_time = String::new();
        let err = req.validate(Uuid::new_v4()).unwrap_err();
        assert_eq!(err, "Start time is required");
    }

    #[test]
    fn empty_optional_strings_become_null() {
        let mut req = request();
        req.description = "   ".to_string();
        req.location = String::new();
        let (event, _) = req.validate(Uuid::new_v4()).unwrap();
        assert!(event.description.is_none());
        assert!(event.location.is_none());
        assert!(event.end_date.is_none());
    }

    #[test]
    fn malformed_start_date_is_rejected() {
        let mut req = request();
        req.start_date = "June 1st".to_string();
        let err = req.validate(Uuid::new_v4()).unwrap_err();
        assert_eq!(err, "Start date must be YYYY-MM-DD");
    }

    #[test]
    fn seconds_in_start_time_are_accepted() {
        let mut req = request();
        req.start_time = "18:30:15".to_string();
        let (event, _) = req.validate(Uuid::new_v4()).unwrap();
        assert_eq!(
            event.start_time,
            NaiveTime::from_hms_opt(18, 30, 15).unwrap()
        );
    }

    #[test]
    fn negative_ticket_price_is_rejected() {
        let mut req = request();
        req.ticket_types[0].price = dec!(-5);
        let err = req.validate(Uuid::new_v4()).unwrap_err();
        assert_eq!(err, "Ticket prices and fees cannot be negative");
    }
}
