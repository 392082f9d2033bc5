use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Session, User};

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        ttl_hours: i64,
    ) -> sqlx::Result<Session> {
        let expires_at = Utc::now() + Duration::hours(ttl_hours);
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Authoritative, revocation-checked session resolution. Privilege
    /// decisions must go through this lookup, never a cached claim.
    pub async fn find_active_user(&self, token_hash: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT u.* FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.token_hash = $1 \
               AND s.revoked_at IS NULL \
               AND s.expires_at > now()",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
    }

    /// Revoke the session carrying this token. Returns whether a live
    /// session was actually revoked.
    pub async fn revoke(&self, token_hash: &str) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = now() \
             WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
