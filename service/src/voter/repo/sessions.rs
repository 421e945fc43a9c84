//! Login sessions backing the session cookie

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::accounts::{map_account_row, AccountRecord};
use super::RepoError;

/// Start a session for an account. Returns the opaque session id.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn create_session<'e, E>(
    executor: E,
    account_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<Uuid, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO sessions (id, account_id, expires_at) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(account_id)
        .bind(expires_at)
        .execute(executor)
        .await?;

    Ok(id)
}

/// The account behind a session that has not expired at `now`.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn get_session_account<'e, E>(
    executor: E,
    session_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<AccountRecord>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query(
        r"
        SELECT a.id, a.screen_name, a.email, a.password_hash, a.address, a.created_at
        FROM sessions s
        JOIN accounts a ON a.id = s.account_id
        WHERE s.id = $1 AND s.expires_at > $2
        ",
    )
    .bind(session_id)
    .bind(now)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(map_account_row))
}

/// End a session. Deleting an unknown session is not an error.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn delete_session<'e, E>(executor: E, session_id: Uuid) -> Result<(), RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(session_id)
        .execute(executor)
        .await?;
    Ok(())
}
