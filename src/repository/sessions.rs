//! Sessions repository for database operations

use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::session::{Flash, Session},
};

#[derive(Clone)]
pub struct SessionsRepository {
    pool: Pool<Sqlite>,
}

impl SessionsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Insert a session row with a fresh token. `user_id` is None for
    /// anonymous flash-carrier sessions.
    pub async fn create(&self, user_id: Option<i64>, ttl: Duration) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id,
            flash_kind: None,
            flash_message: None,
            created_at: now,
            expires_at: now + ttl,
        };

        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, flash_kind, flash_message, created_at, expires_at)
            VALUES (?1, ?2, NULL, NULL, ?3, ?4)
            "#,
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    /// Resolve a token to its live session. Expired rows are deleted on the
    /// way out and behave exactly like missing ones.
    pub async fn get(&self, token: &str) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token, user_id, flash_kind, flash_message, created_at, expires_at
            FROM sessions WHERE token = ?1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match session {
            Some(s) if s.is_expired(Utc::now()) => {
                self.delete(&s.token).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Delete a session row, missing tokens included
    pub async fn delete(&self, token: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Store a flash message on the session, replacing any pending one
    pub async fn set_flash(&self, token: &str, flash: &Flash) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET flash_kind = ?1, flash_message = ?2 WHERE token = ?3")
            .bind(flash.kind.as_str())
            .bind(&flash.message)
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Read and clear the pending flash message, if any
    pub async fn take_flash(&self, token: &str) -> AppResult<Option<Flash>> {
        let session = match self.get(token).await? {
            Some(s) => s,
            None => return Ok(None),
        };

        let flash = session.flash();
        if flash.is_some() {
            sqlx::query("UPDATE sessions SET flash_kind = NULL, flash_message = NULL WHERE token = ?1")
                .bind(token)
                .execute(&self.pool)
                .await?;
        }

        Ok(flash)
    }
}
