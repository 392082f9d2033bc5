use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, NewEvent, TicketTypeDraft};
use crate::services::issuance;

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All events, newest first.
    pub async fn list(&self) -> sqlx::Result<Vec<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> sqlx::Result<Option<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Insert the event and bulk-issue its tickets in one transaction.
    ///
    /// An event insert failure short-circuits before issuance; an issuance
    /// failure rolls the event back, so a partial bulk insert can never
    /// commit. Returns the event and the number of tickets issued.
    pub async fn create_with_tickets(
        &self,
        new_event: NewEvent,
        drafts: &[TicketTypeDraft],
    ) -> sqlx::Result<(Event, u64)> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events \
             (name, category, start_date, start_time, end_date, end_time, \
              location, description, capacity, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(&new_event.name)
        .bind(&new_event.category)
        .bind(new_event.start_date)
        .bind(new_event.start_time)
        .bind(new_event.end_date)
        .bind(new_event.end_time)
        .bind(&new_event.location)
        .bind(&new_event.description)
        .bind(new_event.capacity)
        .bind(new_event.created_by)
        .fetch_one(&mut *tx)
        .await?;

        let tickets = issuance::build_tickets(event.id, drafts);
        let issued = issuance::insert_tickets(&mut *tx, event.id, &tickets).await?;

        tx.commit().await?;
        Ok((event, issued))
    }

    /// Delete the event row. Dependent tickets are intentionally left in
    /// place (no cascade). Returns whether a row was deleted.
    pub async fn delete(&self, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
