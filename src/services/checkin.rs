//! Check-in rejection classification.
//!
//! The status transition itself is a single conditional UPDATE
//! (`TicketRepository::check_in`); when it affects zero rows, the scanner
//! re-fetches the ticket and this module decides which rejection to report.

use crate::models::{Ticket, TicketStatus};
use crate::utils::error::AppError;

/// Classify why a conditional check-in update matched no row.
///
/// A ticket that looks eligible on re-fetch lost a race with another scan
/// between the update and the fetch; it is reported as already used, per the
/// rule that zero rows affected means "already used".
pub fn classify_failed_scan(ticket: Option<&Ticket>) -> AppError {
    match ticket {
        None => AppError::NotFound("Invalid ticket".to_string()),
        Some(t) if t.scanned_at.is_some() || t.status == TicketStatus::Used => {
            AppError::Conflict("Ticket has already been used".to_string())
        }
        Some(t) if !t.status.is_active() => {
            AppError::Conflict("Invalid ticket status".to_string())
        }
        // Looks eligible on re-fetch: another scan won in between.
        Some(_) => AppError::Conflict("Ticket has already been used".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketStatus;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn ticket(status: TicketStatus, scanned: bool) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            ticket_type: "General".to_string(),
            unique_id: "deadbeef-000001".to_string(),
            status,
            price: dec!(100),
            service_fee: dec!(20),
            customer_email: Some("attendee@example.com".to_string()),
            purchase_date: Some(Utc::now()),
            scanned_at: scanned.then(Utc::now),
            refund_reason: None,
            refunded_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_ticket_is_invalid() {
        let err = classify_failed_scan(None);
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Invalid ticket"));
    }

    #[test]
    fn used_ticket_is_already_used() {
        let t = ticket(TicketStatus::Used, true);
        let err = classify_failed_scan(Some(&t));
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Ticket has already been used"));
    }

    #[test]
    fn scanned_but_not_marked_used_is_already_used() {
        let t = ticket(TicketStatus::Sold, true);
        let err = classify_failed_scan(Some(&t));
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Ticket has already been used"));
    }

    #[test]
    fn refunded_ticket_has_invalid_status() {
        let t = ticket(TicketStatus::Refunded, false);
        let err = classify_failed_scan(Some(&t));
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Invalid ticket status"));
    }

    #[test]
    fn eligible_ticket_lost_the_race() {
        // Conditional update matched nothing but the re-fetch still looks
        // eligible: another scan won in between.
        let t = ticket(TicketStatus::Sold, false);
        let err = classify_failed_scan(Some(&t));
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Ticket has already been used"));
    }
}
