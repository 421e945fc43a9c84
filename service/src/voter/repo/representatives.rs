//! Representative repository for legislators ingested from chamber rosters

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::Row;
use utoipa::ToSchema;

use super::RepoError;
use crate::congress::Chamber;

/// A legislator. `name` is unique and is the join key against the
/// geocoding provider's officials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RepresentativeRecord {
    /// Legislative API member id (Bioguide)
    pub external_id: String,
    pub name: String,
    pub title: String,
    pub party: String,
    pub phone: Option<String>,
    pub next_election: Option<NaiveDate>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
}

impl RepresentativeRecord {
    /// Year of the next election; the stored date carries only a year.
    #[must_use]
    pub fn election_year(&self) -> Option<i32> {
        self.next_election.map(|date| date.year())
    }

    /// Chamber implied by the title, if it names one.
    #[must_use]
    pub fn chamber(&self) -> Option<Chamber> {
        if self.title.contains("Representative") {
            Some(Chamber::House)
        } else if self.title.contains("Senator") {
            Some(Chamber::Senate)
        } else {
            None
        }
    }
}

const COLUMNS: &str =
    "external_id, name, title, party, phone, next_election, twitter, facebook, youtube";

fn map_representative_row(row: &sqlx::postgres::PgRow) -> RepresentativeRecord {
    RepresentativeRecord {
        external_id: row.get("external_id"),
        name: row.get("name"),
        title: row.get("title"),
        party: row.get("party"),
        phone: row.get("phone"),
        next_election: row.get("next_election"),
        twitter: row.get("twitter"),
        facebook: row.get("facebook"),
        youtube: row.get("youtube"),
    }
}

/// Insert a representative unless its external id or name is already stored.
/// Returns whether a row was inserted.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn insert_representative<'e, E>(
    executor: E,
    rep: &RepresentativeRecord,
) -> Result<bool, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let result = sqlx::query(
        r"
        INSERT INTO representatives
            (external_id, name, title, party, phone, next_election, twitter, facebook, youtube)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT DO NOTHING
        ",
    )
    .bind(&rep.external_id)
    .bind(&rep.name)
    .bind(&rep.title)
    .bind(&rep.party)
    .bind(&rep.phone)
    .bind(rep.next_election)
    .bind(&rep.twitter)
    .bind(&rep.facebook)
    .bind(&rep.youtube)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Look up a representative by exact name.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn find_representative_by_name<'e, E>(
    executor: E,
    name: &str,
) -> Result<Option<RepresentativeRecord>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM representatives WHERE name = $1"))
        .bind(name)
        .fetch_optional(executor)
        .await?;
    Ok(row.as_ref().map(map_representative_row))
}

/// Representatives whose title starts with "Senator", ordered by name.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn list_senators<'e, E>(executor: E) -> Result<Vec<RepresentativeRecord>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM representatives WHERE title LIKE 'Senator%' ORDER BY name"
    ))
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_representative_row).collect())
}

/// Representatives whose title is exactly "Representative", ordered by name.
///
/// # Errors
///
/// Returns `RepoError::Database` on database failures.
pub async fn list_house_members<'e, E>(executor: E) -> Result<Vec<RepresentativeRecord>, RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM representatives WHERE title = 'Representative' ORDER BY name"
    ))
    .fetch_all(executor)
    .await?;
    Ok(rows.iter().map(map_representative_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_title(title: &str) -> RepresentativeRecord {
        RepresentativeRecord {
            external_id: "X000001".into(),
            name: "Test Person".into(),
            title: title.into(),
            party: "I".into(),
            phone: None,
            next_election: NaiveDate::from_ymd_opt(2020, 1, 1),
            twitter: None,
            facebook: None,
            youtube: None,
        }
    }

    #[test]
    fn chamber_follows_title() {
        assert_eq!(with_title("Representative").chamber(), Some(Chamber::House));
        assert_eq!(with_title("Senator, 2nd Class").chamber(), Some(Chamber::Senate));
        assert_eq!(with_title("Delegate").chamber(), None);
    }

    #[test]
    fn election_year_from_date() {
        assert_eq!(with_title("Senator").election_year(), Some(2020));
    }
}
