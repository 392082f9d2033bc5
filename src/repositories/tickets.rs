use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Ticket;
use crate::services::analytics::TicketSale;

/// Dashboard totals across all events.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct OverviewStats {
    pub total_events: i64,
    pub tickets_sold: i64,
    pub total_revenue: Decimal,
}

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_code(&self, code: &str) -> sqlx::Result<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE unique_id = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
    }

    /// Check a ticket in: one conditional update, so two concurrent scans of
    /// the same code can never both succeed. Zero rows affected means the
    /// ticket is missing, already used, or otherwise ineligible; the caller
    /// re-fetches to classify the rejection.
    pub async fn check_in(&self, code: &str) -> sqlx::Result<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = 'used', scanned_at = now() \
             WHERE unique_id = $1 \
               AND status IN ('available', 'sold') \
               AND scanned_at IS NULL \
             RETURNING *",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Mark a ticket refunded. Guarded to active statuses: a used ticket is
    /// not refundable and a refunded one stays refunded.
    pub async fn refund(&self, id: Uuid, reason: &str) -> sqlx::Result<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = 'refunded', refund_reason = $2, refunded_at = now() \
             WHERE id = $1 \
               AND status IN ('available', 'sold') \
             RETURNING *",
        )
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await
    }

    /// Claim one available ticket of the given type for a customer.
    /// `SKIP LOCKED` keeps two concurrent purchases from fighting over the
    /// same row. Returns `None` when the type is sold out.
    pub async fn purchase(
        &self,
        event_id: Uuid,
        ticket_type: &str,
        customer_email: &str,
    ) -> sqlx::Result<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets \
             SET status = 'sold', customer_email = $3, purchase_date = now() \
             WHERE id = ( \
                 SELECT id FROM tickets \
                 WHERE event_id = $1 AND ticket_type = $2 AND status = 'available' \
                 ORDER BY unique_id \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING *",
        )
        .bind(event_id)
        .bind(ticket_type)
        .bind(customer_email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Tickets with an attached customer, for the attendee table.
    pub async fn attendees_for_event(&self, event_id: Uuid) -> sqlx::Result<Vec<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets \
             WHERE event_id = $1 AND customer_email IS NOT NULL \
             ORDER BY purchase_date DESC NULLS LAST",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Every distinct customer email across all tickets, for bulk email
    /// fan-out.
    pub async fn distinct_customer_emails(&self) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT customer_email FROM tickets WHERE customer_email IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Raw per-ticket sale records for the analytics series.
    pub async fn sales(&self) -> sqlx::Result<Vec<TicketSale>> {
        sqlx::query_as::<_, TicketSale>(
            "SELECT purchase_date, price, service_fee FROM tickets \
             WHERE purchase_date IS NOT NULL \
             ORDER BY purchase_date",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn overview_stats(&self) -> sqlx::Result<OverviewStats> {
        sqlx::query_as::<_, OverviewStats>(
            "SELECT \
               (SELECT count(*) FROM events) AS total_events, \
               (SELECT count(*) FROM tickets WHERE status IN ('sold', 'used')) AS tickets_sold, \
               (SELECT COALESCE(sum(price + service_fee), 0) FROM tickets \
                 WHERE purchase_date IS NOT NULL) AS total_revenue",
        )
        .fetch_one(&self.pool)
        .await
    }
}
