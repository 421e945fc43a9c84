//! Policy categories and the account-category join

use serde::Serialize;
use sqlx::{PgPool, Row};
use utoipa::ToSchema;

use super::RepoError;

/// A policy subject tag (e.g. "Health")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryRecord {
    pub id: i32,
    pub name: String,
}

fn map_category_row(row: &sqlx::postgres::PgRow) -> CategoryRecord {
    CategoryRecord {
        id: row.get("id"),
        name: row.get("name"),
    }
}

/// Insert category names that do not exist yet, in one transaction.
/// Returns the number of categories created.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures; nothing is committed.
pub async fn seed_categories(pool: &PgPool, names: &[String]) -> Result<u64, RepoError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for name in names {
        let result = sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// All categories, ordered by name.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn list_categories<'e, E>(executor: E) -> Result<Vec<CategoryRecord>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name")
        .fetch_all(executor)
        .await?;
    Ok(rows.iter().map(map_category_row).collect())
}

/// # Errors
///
/// Returns `RepoError::NotFound` if no category has this id.
pub async fn get_category<'e, E>(executor: E, id: i32) -> Result<CategoryRecord, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(RepoError::NotFound)?;
    Ok(map_category_row(&row))
}

/// # Errors
///
/// Returns `RepoError::NotFound` if no category has this name.
pub async fn get_category_by_name<'e, E>(executor: E, name: &str) -> Result<CategoryRecord, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query("SELECT id, name FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await?
        .ok_or(RepoError::NotFound)?;
    Ok(map_category_row(&row))
}

/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn account_category_link_exists<'e, E>(
    executor: E,
    account_id: i64,
    category_id: i32,
) -> Result<bool, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM account_categories WHERE account_id = $1 AND category_id = $2)",
    )
    .bind(account_id)
    .bind(category_id)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Link an account to categories in one transaction. Returns rows inserted.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures (including an unknown
/// category id); nothing is committed.
pub async fn insert_account_category_links(
    pool: &PgPool,
    account_id: i64,
    category_ids: &[i32],
) -> Result<u64, RepoError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for category_id in category_ids {
        let result = sqlx::query(
            r"
            INSERT INTO account_categories (account_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT account_categories_pair_key DO NOTHING
            ",
        )
        .bind(account_id)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Remove an account's links to categories. Returns rows deleted.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn delete_account_category_links<'e, E>(
    executor: E,
    account_id: i64,
    category_ids: &[i32],
) -> Result<u64, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let result = sqlx::query(
        "DELETE FROM account_categories WHERE account_id = $1 AND category_id = ANY($2)",
    )
    .bind(account_id)
    .bind(category_ids)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Categories an account has chosen, ordered by name.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn list_account_categories<'e, E>(
    executor: E,
    account_id: i64,
) -> Result<Vec<CategoryRecord>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let rows = sqlx::query(
        r"
        SELECT c.id, c.name
        FROM account_categories ac
        JOIN categories c ON c.id = ac.category_id
        WHERE ac.account_id = $1
        ORDER BY c.name
        ",
    )
    .bind(account_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_category_row).collect())
}
