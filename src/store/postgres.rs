//! Postgres-backed user directory.
//!
//! Conditional writes are single `UPDATE ... WHERE` statements; the matched
//! count reported to callers is `rows_affected`. Schema lives in
//! `sql/schema.sql`.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::{ChoikiniEntry, UserDirectory, UserId, UserRecord};
use crate::auth::policy::AccessLevel;
use crate::auth::Error;

pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool and wrap it.
    /// # Errors
    /// Returns an error if the pool cannot be established.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        name: row.get("name"),
        password_salt: row.get("password_salt"),
        password_hash: row.get("password_hash"),
        token: row.get("token"),
        access: AccessLevel::from_level(row.get::<i32, _>("access_level")),
    }
}

impl UserDirectory for PgDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, Error> {
        let query = r"
            SELECT id, name, password_salt, password_hash, token, access_level
            FROM users
            WHERE name = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(name)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to look up user by name")
            .map_err(Error::StoreUnavailable)?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn find_by_name_and_token(
        &self,
        name: &str,
        token: &str,
    ) -> Result<Option<UserRecord>, Error> {
        if token.is_empty() {
            return Ok(None);
        }
        let query = r"
            SELECT id, name, password_salt, password_hash, token, access_level
            FROM users
            WHERE name = $1 AND token = $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(name)
            .bind(token)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to look up user by name and token")
            .map_err(Error::StoreUnavailable)?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn update_token(
        &self,
        id: UserId,
        name: &str,
        expected_password_hash: &str,
        new_token: &str,
    ) -> Result<u64, Error> {
        // The WHERE clause is the optimistic precondition: a concurrent
        // password change leaves rows_affected at 0 and the caller reports
        // the conflict instead of issuing a token against stale credentials.
        let query = r"
            UPDATE users
            SET token = $4
            WHERE id = $1 AND name = $2 AND password_hash = $3
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(id)
            .bind(name)
            .bind(expected_password_hash)
            .bind(new_token)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to persist session token")
            .map_err(Error::StoreUnavailable)?;

        Ok(result.rows_affected())
    }

    async fn clear_token(&self, name: &str, token: &str) -> Result<u64, Error> {
        if token.is_empty() {
            return Ok(0);
        }
        let query = r"
            UPDATE users
            SET token = ''
            WHERE name = $1 AND token = $2
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(name)
            .bind(token)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to clear session token")
            .map_err(Error::StoreUnavailable)?;

        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, Error> {
        let query = r"
            SELECT id, name, password_salt, password_hash, token, access_level
            FROM users
            ORDER BY name
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to list users")
            .map_err(Error::StoreUnavailable)?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn append_entry(&self, user_id: UserId, entry: &ChoikiniEntry) -> Result<(), Error> {
        let query = r"
            INSERT INTO choikini_entries (user_id, entry_date, entry)
            VALUES ($1, $2, $3)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(entry.entry_date)
            .bind(&entry.entry)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to append choikini entry")
            .map_err(Error::StoreUnavailable)?;

        Ok(())
    }

    async fn entries_for(&self, user_id: UserId) -> Result<Vec<ChoikiniEntry>, Error> {
        let query = r"
            SELECT entry_date, entry
            FROM choikini_entries
            WHERE user_id = $1
            ORDER BY entry_date
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to fetch choikini entries")
            .map_err(Error::StoreUnavailable)?;

        Ok(rows
            .iter()
            .map(|row| ChoikiniEntry {
                entry_date: row.get("entry_date"),
                entry: row.get("entry"),
            })
            .collect())
    }
}
