//! Representative resolution by address

use super::ServiceError;
use crate::civic::CivicApiClient;
use crate::normalize::normalize_name;
use crate::voter::repo::{AccountRecord, RepresentativeRecord, VoterRepo};

/// Resolve the stored representatives for an account's address.
///
/// Officials returned by the geocoding provider are matched by normalized
/// name against stored representatives. Matches keep the upstream order;
/// officials without a stored counterpart are dropped.
///
/// # Errors
///
/// Returns `ServiceError::Validation` if the account has no address,
/// `ServiceError::Civic` if the lookup fails or the body has no officials,
/// `ServiceError::Repo` on database failures.
pub async fn find_representatives(
    repo: &dyn VoterRepo,
    civic: &dyn CivicApiClient,
    account: &AccountRecord,
) -> Result<Vec<RepresentativeRecord>, ServiceError> {
    let address = account
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ServiceError::Validation("No address on file".to_string()))?;

    let officials = civic.officials_for_address(address).await?;
    let mut matches = Vec::new();

    for official in officials {
        let name = normalize_name(&official.name);
        match repo.find_representative_by_name(&name).await? {
            Some(rep) => matches.push(rep),
            None => tracing::debug!(official = %official.name, "No stored representative"),
        }
    }

    Ok(matches)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::civic::mock::MockCivicClient;
    use crate::civic::CivicApiError;
    use crate::voter::repo::mock::MockVoterRepo;
    use chrono::Utc;

    fn account(address: Option<&str>) -> AccountRecord {
        AccountRecord {
            id: 1,
            screen_name: "voter".into(),
            email: "voter@example.com".into(),
            password_hash: String::new(),
            address: address.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn rep(id: &str, name: &str) -> RepresentativeRecord {
        RepresentativeRecord {
            external_id: id.into(),
            name: name.into(),
            title: "Representative".into(),
            party: "R".into(),
            phone: None,
            next_election: None,
            twitter: None,
            facebook: None,
            youtube: None,
        }
    }

    #[tokio::test]
    async fn keeps_upstream_order_and_drops_unmatched() {
        let repo = MockVoterRepo::new();
        repo.add_representative(rep("C1", "Carol Chen"));
        repo.add_representative(rep("B1", "Bob Burns"));
        let civic = MockCivicClient::with_names(&["Alice A. Adams", "Bob Q. Burns", "Carol Chen"]);

        let found = find_representatives(&repo, &civic, &account(Some("1 Main St")))
            .await
            .unwrap();

        let ids: Vec<_> = found.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["B1", "C1"]);
        assert_eq!(civic.calls(), vec!["1 Main St"]);
    }

    #[tokio::test]
    async fn missing_officials_is_a_schema_error() {
        let repo = MockVoterRepo::new();
        let civic = MockCivicClient::new();

        let err = find_representatives(&repo, &civic, &account(Some("1 Main St")))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Civic(CivicApiError::Schema(_))));
    }

    #[tokio::test]
    async fn account_without_address_is_rejected() {
        let repo = MockVoterRepo::new();
        let civic = MockCivicClient::with_names(&["Bob Burns"]);

        let err = find_representatives(&repo, &civic, &account(None))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(civic.calls().is_empty());
    }
}
