//! Category seeding and account-category association

use serde::Serialize;
use utoipa::ToSchema;

use super::ServiceError;
use crate::voter::repo::{AccountRecord, CategoryRecord, RepoError, VoterRepo};

/// The logged-in account and its chosen categories.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Profile {
    pub account: AccountRecord,
    pub categories: Vec<CategoryRecord>,
}

/// One category name per line, trimmed; blank lines skipped.
#[must_use]
pub fn parse_subject_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Seed categories from a newline-separated subject list. Names already
/// stored are left untouched. Returns the number created.
///
/// # Errors
///
/// Returns `ServiceError::Repo` on database failures.
pub async fn seed_categories(repo: &dyn VoterRepo, subjects: &str) -> Result<u64, ServiceError> {
    let names = parse_subject_list(subjects);
    let inserted = repo.seed_categories(&names).await?;
    tracing::info!(inserted, total = names.len(), "Seeded categories");
    Ok(inserted)
}

fn dedup(category_ids: &[i32]) -> Vec<i32> {
    let mut unique = Vec::with_capacity(category_ids.len());
    for id in category_ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

/// Link an account to categories it is not yet linked to, in one commit.
/// Returns the number of links created.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for an empty selection,
/// `ServiceError::NotFound` for an unknown category (nothing is linked),
/// `ServiceError::Repo` on database failures.
pub async fn add_categories(
    repo: &dyn VoterRepo,
    account_id: i64,
    category_ids: &[i32],
) -> Result<u64, ServiceError> {
    if category_ids.is_empty() {
        return Err(ServiceError::Validation(
            "Select at least one category".to_string(),
        ));
    }

    let mut pending = Vec::new();
    for id in dedup(category_ids) {
        match repo.get_category(id).await {
            Ok(_) => {}
            Err(RepoError::NotFound) => return Err(ServiceError::NotFound(format!("category {id}"))),
            Err(e) => return Err(e.into()),
        }
        if !repo.account_category_link_exists(account_id, id).await? {
            pending.push(id);
        }
    }

    if pending.is_empty() {
        return Ok(0);
    }
    Ok(repo.insert_account_category_links(account_id, &pending).await?)
}

/// Unlink an account from categories. Returns the number of links removed.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for an empty selection,
/// `ServiceError::Repo` on database failures.
pub async fn remove_categories(
    repo: &dyn VoterRepo,
    account_id: i64,
    category_ids: &[i32],
) -> Result<u64, ServiceError> {
    if category_ids.is_empty() {
        return Err(ServiceError::Validation(
            "Select at least one category".to_string(),
        ));
    }
    Ok(repo
        .delete_account_category_links(account_id, &dedup(category_ids))
        .await?)
}

/// # Errors
///
/// Returns `ServiceError::Repo` on database failures.
pub async fn profile(repo: &dyn VoterRepo, account: AccountRecord) -> Result<Profile, ServiceError> {
    let categories = repo.list_account_categories(account.id).await?;
    Ok(Profile {
        account,
        categories,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::voter::repo::mock::MockVoterRepo;
    use proptest::prelude::*;

    #[test]
    fn subject_list_trims_and_skips_blanks() {
        let names = parse_subject_list("Health\n\n  Taxation  \r\nEnergy\n");
        assert_eq!(names, vec!["Health", "Taxation", "Energy"]);
    }

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let repo = MockVoterRepo::new();

        assert_eq!(seed_categories(&repo, "Health\nEnergy\n").await.unwrap(), 2);
        assert_eq!(seed_categories(&repo, "Health\nTaxation\n").await.unwrap(), 1);

        let names: Vec<_> = repo
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Energy", "Health", "Taxation"]);
    }

    #[tokio::test]
    async fn unknown_category_links_nothing() {
        let repo = MockVoterRepo::new();
        let health = repo.add_category("Health");

        let err = add_categories(&repo, 1, &[health, 99]).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(repo.account_links().is_empty());
    }

    #[tokio::test]
    async fn remove_then_list() {
        let repo = MockVoterRepo::new();
        let health = repo.add_category("Health");
        let energy = repo.add_category("Energy");
        add_categories(&repo, 1, &[health, energy]).await.unwrap();

        let removed = remove_categories(&repo, 1, &[health, health]).await.unwrap();

        assert_eq!(removed, 1);
        assert_eq!(repo.account_links(), vec![(1, energy)]);
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let repo = MockVoterRepo::new();
        assert!(matches!(
            add_categories(&repo, 1, &[]).await,
            Err(ServiceError::Validation(_))
        ));
    }

    proptest! {
        #[test]
        fn overlapping_adds_link_the_union(
            first in prop::collection::vec(1..=6i32, 1..6),
            second in prop::collection::vec(1..=6i32, 1..6),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let links = runtime.block_on(async {
                let repo = MockVoterRepo::new();
                for name in ["A", "B", "C", "D", "E", "F"] {
                    repo.add_category(name);
                }
                add_categories(&repo, 7, &first).await.unwrap();
                add_categories(&repo, 7, &second).await.unwrap();
                repo.account_links()
            });

            let mut union: Vec<i32> = first.iter().chain(second.iter()).copied().collect();
            union.sort_unstable();
            union.dedup();
            let linked: Vec<i32> = links.iter().map(|(_, id)| *id).collect();
            prop_assert_eq!(linked, union);
        }
    }
}
