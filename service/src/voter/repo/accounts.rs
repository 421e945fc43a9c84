//! Account repository for database operations

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use utoipa::ToSchema;

/// Record returned from account queries
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountRecord {
    pub id: i64,
    pub screen_name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to register an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub screen_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
}

/// Error types for account operations
#[derive(Debug, thiserror::Error)]
pub enum AccountRepoError {
    #[error("screen name already taken")]
    DuplicateScreenName,
    #[error("account not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub(crate) fn map_account_row(row: &sqlx::postgres::PgRow) -> AccountRecord {
    AccountRecord {
        id: row.get("id"),
        screen_name: row.get("screen_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        address: row.get("address"),
        created_at: row.get("created_at"),
    }
}

/// Create a new account.
///
/// Works with any sqlx executor (pool, connection, or transaction).
///
/// # Errors
///
/// Returns `AccountRepoError::DuplicateScreenName` if the screen name is taken.
pub async fn create_account<'e, E>(
    executor: E,
    account: &NewAccount,
) -> Result<AccountRecord, AccountRepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let result = sqlx::query(
        r"
        INSERT INTO accounts (screen_name, email, password_hash, address)
        VALUES ($1, $2, $3, $4)
        RETURNING id, screen_name, email, password_hash, address, created_at
        ",
    )
    .bind(&account.screen_name)
    .bind(&account.email)
    .bind(&account.password_hash)
    .bind(&account.address)
    .fetch_one(executor)
    .await;

    match result {
        Ok(row) => Ok(map_account_row(&row)),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("accounts_screen_name_key") {
                    return Err(AccountRepoError::DuplicateScreenName);
                }
            }
            Err(AccountRepoError::Database(e))
        }
    }
}

/// Get an account by id.
///
/// # Errors
///
/// Returns `AccountRepoError::NotFound` if no account has this id.
pub async fn get_account_by_id<'e, E>(executor: E, id: i64) -> Result<AccountRecord, AccountRepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query(
        "SELECT id, screen_name, email, password_hash, address, created_at FROM accounts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or(AccountRepoError::NotFound)?;

    Ok(map_account_row(&row))
}

/// Get an account by screen name.
///
/// # Errors
///
/// Returns `AccountRepoError::NotFound` if no account has this screen name.
pub async fn get_account_by_screen_name<'e, E>(
    executor: E,
    screen_name: &str,
) -> Result<AccountRecord, AccountRepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query(
        r"
        SELECT id, screen_name, email, password_hash, address, created_at
        FROM accounts
        WHERE screen_name = $1
        ",
    )
    .bind(screen_name)
    .fetch_optional(executor)
    .await?
    .ok_or(AccountRepoError::NotFound)?;

    Ok(map_account_row(&row))
}

/// Whether any account already uses this screen name or email.
///
/// # Errors
///
/// Returns `AccountRepoError::Database` on database failures.
pub async fn account_exists<'e, E>(
    executor: E,
    screen_name: &str,
    email: &str,
) -> Result<bool, AccountRepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM accounts WHERE screen_name = $1 OR email = $2)",
    )
    .bind(screen_name)
    .bind(email)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}
