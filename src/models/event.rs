use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for an event insert. Optional fields have already been
/// null-coalesced (empty form strings become `None`).
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub category: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub created_by: Uuid,
}
