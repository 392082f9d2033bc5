use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle tag on a single ticket row.
///
/// Transitions are monotonic: `available`/`sold` may move to `used` or
/// `refunded`, both of which are terminal. The transitions are enforced by
/// conditional UPDATE statements, never by client-side read-then-write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Available,
    Sold,
    Used,
    Refunded,
}

impl TicketStatus {
    /// Whether a ticket in this state can still be checked in or refunded.
    pub fn is_active(self) -> bool {
        matches!(self, TicketStatus::Available | TicketStatus::Sold)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketStatus::Available => "available",
            TicketStatus::Sold => "sold",
            TicketStatus::Used => "used",
            TicketStatus::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_type: String,
    /// Scannable code embedded in the printed QR artifact.
    pub unique_id: String,
    pub status: TicketStatus,
    pub price: Decimal,
    pub service_fee: Decimal,
    pub customer_email: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub scanned_at: Option<DateTime<Utc>>,
    pub refund_reason: Option<String>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One ticket-type line from the event creation form. Transient: drives bulk
/// issuance and is not persisted as its own entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTypeDraft {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub service_fee: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_states() {
        assert!(TicketStatus::Available.is_active());
        assert!(TicketStatus::Sold.is_active());
        assert!(!TicketStatus::Used.is_active());
        assert!(!TicketStatus::Refunded.is_active());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TicketStatus::Refunded).unwrap();
        assert_eq!(json, "\"refunded\"");
        let back: TicketStatus = serde_json::from_str("\"sold\"").unwrap();
        assert_eq!(back, TicketStatus::Sold);
    }
}
