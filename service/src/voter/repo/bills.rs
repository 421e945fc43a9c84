//! Bill repository and the bill-category join

use std::collections::HashSet;

use serde::Serialize;
use sqlx::{PgPool, Row};
use utoipa::ToSchema;

use super::RepoError;

/// A bill filed under one or more categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BillRecord {
    /// Legislative API bill id (e.g. "hr1234-115")
    pub bill_id: String,
    pub title: Option<String>,
    pub uri: String,
    pub summary: Option<String>,
}

/// One pending write in a category's ingestion batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillWrite {
    /// The bill is already stored; only link it to the category.
    Link(String),
    /// Store a new bill and link it to the category.
    Insert(BillRecord),
}

impl BillWrite {
    #[must_use]
    pub fn bill_id(&self) -> &str {
        match self {
            Self::Link(id) => id,
            Self::Insert(bill) => &bill.bill_id,
        }
    }
}

/// Rows written by [`apply_bill_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BillBatchResult {
    pub bills_inserted: u64,
    pub links_inserted: u64,
}

fn map_bill_row(row: &sqlx::postgres::PgRow) -> BillRecord {
    BillRecord {
        bill_id: row.get("bill_id"),
        title: row.get("title"),
        uri: row.get("uri"),
        summary: row.get("summary"),
    }
}

/// Which of `bill_ids` are already stored.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn existing_bill_ids<'e, E>(
    executor: E,
    bill_ids: &[String],
) -> Result<HashSet<String>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let ids: Vec<String> = sqlx::query_scalar("SELECT bill_id FROM bills WHERE bill_id = ANY($1)")
        .bind(bill_ids)
        .fetch_all(executor)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Apply a category's batch of bill writes in one transaction.
///
/// A bill id or link that already exists is skipped, so re-running a batch
/// is a no-op. On error nothing from the batch is committed.
///
/// # Errors
///
/// Returns `RepoError::DuplicateBillUri` if a new bill's URI belongs to
/// another stored bill, `RepoError::Database` on other database failures.
pub async fn apply_bill_batch(
    pool: &PgPool,
    category_id: i32,
    writes: &[BillWrite],
) -> Result<BillBatchResult, RepoError> {
    let mut tx = pool.begin().await?;
    let mut result = BillBatchResult::default();

    for write in writes {
        if let BillWrite::Insert(bill) = write {
            let inserted = sqlx::query(
                r"
                INSERT INTO bills (bill_id, title, uri, summary)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (bill_id) DO NOTHING
                ",
            )
            .bind(&bill.bill_id)
            .bind(&bill.title)
            .bind(&bill.uri)
            .bind(&bill.summary)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.constraint() == Some("bills_uri_key") {
                        return RepoError::DuplicateBillUri(bill.bill_id.clone());
                    }
                }
                RepoError::Database(e)
            })?;
            result.bills_inserted += inserted.rows_affected();
        }

        let linked = sqlx::query(
            r"
            INSERT INTO bill_categories (bill_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT bill_categories_pair_key DO NOTHING
            ",
        )
        .bind(write.bill_id())
        .bind(category_id)
        .execute(&mut *tx)
        .await?;
        result.links_inserted += linked.rows_affected();
    }

    tx.commit().await?;
    Ok(result)
}

/// Bills linked to a category, ordered by bill id.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn list_bills_by_category<'e, E>(
    executor: E,
    category_id: i32,
) -> Result<Vec<BillRecord>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let rows = sqlx::query(
        r"
        SELECT b.bill_id, b.title, b.uri, b.summary
        FROM bill_categories bc
        JOIN bills b ON b.bill_id = bc.bill_id
        WHERE bc.category_id = $1
        ORDER BY b.bill_id
        ",
    )
    .bind(category_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_bill_row).collect())
}

/// # Errors
///
/// Returns `RepoError::NotFound` if the bill is not stored.
pub async fn get_bill<'e, E>(executor: E, bill_id: &str) -> Result<BillRecord, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query("SELECT bill_id, title, uri, summary FROM bills WHERE bill_id = $1")
        .bind(bill_id)
        .fetch_optional(executor)
        .await?
        .ok_or(RepoError::NotFound)?;
    Ok(map_bill_row(&row))
}
