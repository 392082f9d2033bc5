//! Bulk ticket issuance at event creation time.
//!
//! Each ticket-type draft expands into `quantity` individual ticket rows.
//! Codes are derived from the event id plus a zero-padded sequence index,
//! which keeps them short and collision-free within an event.

use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{TicketStatus, TicketTypeDraft};

const CODE_PREFIX_LEN: usize = 8;
const CODE_SEQ_WIDTH: usize = 6;

/// One generated ticket row, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedTicket {
    pub ticket_type: String,
    pub unique_id: String,
    pub price: Decimal,
    pub service_fee: Decimal,
}

/// Scannable code for the `index`-th ticket of an event.
pub fn ticket_code(event_id: Uuid, index: usize) -> String {
    let hex = event_id.simple().to_string();
    format!(
        "{}-{:0width$}",
        &hex[..CODE_PREFIX_LEN],
        index,
        width = CODE_SEQ_WIDTH
    )
}

/// Expand ticket-type drafts into individual ticket rows. The sequence index
/// runs across all drafts of the event, so codes stay unique even when two
/// drafts share a name.
pub fn build_tickets(event_id: Uuid, drafts: &[TicketTypeDraft]) -> Vec<IssuedTicket> {
    let mut tickets = Vec::new();
    let mut seq = 0usize;
    for draft in drafts {
        for _ in 0..draft.quantity {
            tickets.push(IssuedTicket {
                ticket_type: draft.name.clone(),
                unique_id: ticket_code(event_id, seq),
                price: draft.price,
                service_fee: draft.service_fee,
            });
            seq += 1;
        }
    }
    tickets
}

/// Insert all generated rows in one bulk statement. Runs on the caller's
/// connection so event creation can wrap it in a transaction; a failure here
/// rolls back the whole creation (partial issuance never commits).
pub async fn insert_tickets(
    conn: &mut PgConnection,
    event_id: Uuid,
    tickets: &[IssuedTicket],
) -> sqlx::Result<u64> {
    if tickets.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO tickets (event_id, ticket_type, unique_id, status, price, service_fee) ",
    );
    builder.push_values(tickets, |mut row, ticket| {
        row.push_bind(event_id)
            .push_bind(&ticket.ticket_type)
            .push_bind(&ticket.unique_id)
            .push_bind(TicketStatus::Available)
            .push_bind(ticket.price)
            .push_bind(ticket.service_fee);
    });

    let result = builder.build().execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn draft(name: &str, price: Decimal, quantity: u32, fee: Decimal) -> TicketTypeDraft {
        TicketTypeDraft {
            name: name.to_string(),
            price,
            quantity,
            service_fee: fee,
        }
    }

    #[test]
    fn code_format_is_prefix_dash_padded_index() {
        let event_id = Uuid::parse_str("a1b2c3d4-0000-0000-0000-000000000000").unwrap();
        assert_eq!(ticket_code(event_id, 0), "a1b2c3d4-000000");
        assert_eq!(ticket_code(event_id, 42), "a1b2c3d4-000042");
    }

    #[test]
    fn builds_sum_of_quantities_rows() {
        let event_id = Uuid::new_v4();
        let drafts = vec![
            draft("General", dec!(100), 3, dec!(20)),
            draft("VIP", dec!(250), 2, dec!(50)),
        ];
        let tickets = build_tickets(event_id, &drafts);
        assert_eq!(tickets.len(), 5);
        assert_eq!(
            tickets.iter().filter(|t| t.ticket_type == "General").count(),
            3
        );
        assert_eq!(tickets.iter().filter(|t| t.ticket_type == "VIP").count(), 2);
    }

    #[test]
    fn codes_are_unique_within_event() {
        let event_id = Uuid::new_v4();
        let drafts = vec![
            draft("General", dec!(10), 100, dec!(1)),
            // Same name on purpose: the sequence spans drafts
            draft("General", dec!(15), 100, dec!(1)),
        ];
        let tickets = build_tickets(event_id, &drafts);
        let codes: HashSet<&str> = tickets.iter().map(|t| t.unique_id.as_str()).collect();
        assert_eq!(codes.len(), tickets.len());
    }

    #[test]
    fn prices_and_fees_carry_through() {
        let event_id = Uuid::new_v4();
        let tickets = build_tickets(event_id, &[draft("Early Bird", dec!(79.99), 1, dec!(5.50))]);
        assert_eq!(tickets[0].price, dec!(79.99));
        assert_eq!(tickets[0].service_fee, dec!(5.50));
    }

    #[test]
    fn zero_quantity_yields_no_rows() {
        let tickets = build_tickets(Uuid::new_v4(), &[draft("General", dec!(10), 0, dec!(0))]);
        assert!(tickets.is_empty());
    }
}
