//! Bill ingestion by category, bill listings, and bill detail

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use super::representatives::find_representatives;
use super::votes::{get_vote, set_roll_call_info, RollCallInfo};
use super::ServiceError;
use crate::civic::CivicApiClient;
use crate::congress::{CongressApiClient, CongressApiError};
use crate::normalize::category_slug;
use crate::voter::repo::{
    AccountRecord, BillBatchResult, BillRecord, BillWrite, CategoryRecord, RepoError,
    RepresentativeRecord, VoterRepo,
};

/// Result of ingesting one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillIngestOutcome {
    /// Upstream flagged the request; nothing was written.
    NoResults(String),
    Ingested(BillBatchResult),
}

/// Totals from [`ingest_categories`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestRunSummary {
    pub ingested: usize,
    pub no_results: usize,
    pub failed: usize,
    pub bills_inserted: u64,
    pub links_inserted: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RepresentativeVote {
    pub representative: RepresentativeRecord,
    /// Vote position, or "No vote information found"
    pub vote: String,
}

/// A stored bill with its latest roll calls and, for a logged-in account,
/// how each of its representatives voted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BillDetailView {
    pub bill: BillRecord,
    pub roll_calls: RollCallInfo,
    pub votes: Vec<RepresentativeVote>,
}

/// Fetch the bills filed under a category and store them.
///
/// A bill already stored only gains a link to this category. A bill listed
/// twice in the response is written once. All writes for the category are
/// committed together.
///
/// # Errors
///
/// Returns `ServiceError::Congress` for request failures or a malformed body,
/// `ServiceError::Repo` on database failures (nothing from the batch is
/// committed).
pub async fn ingest_bills_for_category(
    repo: &dyn VoterRepo,
    congress: &dyn CongressApiClient,
    category: &CategoryRecord,
) -> Result<BillIngestOutcome, ServiceError> {
    let slug = category_slug(&category.name);
    let bills = match congress.bills_by_subject(&slug).await {
        Ok(bills) => bills,
        Err(CongressApiError::Flagged(reason)) => {
            tracing::warn!(category = %category.name, %reason, "No bills for category");
            return Ok(BillIngestOutcome::NoResults(reason));
        }
        Err(e) => return Err(e.into()),
    };

    let mut seen = HashSet::new();
    let bills: Vec<_> = bills
        .into_iter()
        .filter(|bill| seen.insert(bill.bill_id.clone()))
        .collect();

    let ids: Vec<String> = bills.iter().map(|bill| bill.bill_id.clone()).collect();
    let existing = repo.existing_bill_ids(&ids).await?;

    let writes: Vec<BillWrite> = bills
        .into_iter()
        .map(|bill| {
            if existing.contains(&bill.bill_id) {
                BillWrite::Link(bill.bill_id)
            } else {
                BillWrite::Insert(BillRecord {
                    bill_id: bill.bill_id,
                    title: bill.short_title,
                    uri: bill.congressdotgov_url,
                    summary: bill.summary,
                })
            }
        })
        .collect();

    let result = repo.apply_bill_batch(category.id, &writes).await?;
    tracing::info!(
        category = %category.name,
        inserted = result.bills_inserted,
        linked = result.links_inserted,
        "Ingested bills"
    );

    Ok(BillIngestOutcome::Ingested(result))
}

/// Ingest each category in turn. A category that fails is logged and the
/// run moves on.
pub async fn ingest_categories(
    repo: &dyn VoterRepo,
    congress: &dyn CongressApiClient,
    categories: &[CategoryRecord],
) -> IngestRunSummary {
    let mut summary = IngestRunSummary::default();

    for category in categories {
        match ingest_bills_for_category(repo, congress, category).await {
            Ok(BillIngestOutcome::Ingested(result)) => {
                summary.ingested += 1;
                summary.bills_inserted += result.bills_inserted;
                summary.links_inserted += result.links_inserted;
            }
            Ok(BillIngestOutcome::NoResults(_)) => summary.no_results += 1,
            Err(e) => {
                tracing::warn!(category = %category.name, error = %e, "Category ingestion failed");
                summary.failed += 1;
            }
        }
    }

    summary
}

/// The category and the stored bills linked to it.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` for an unknown category.
pub async fn bills_for_category(
    repo: &dyn VoterRepo,
    category_id: i32,
) -> Result<(CategoryRecord, Vec<BillRecord>), ServiceError> {
    let category = match repo.get_category(category_id).await {
        Ok(category) => category,
        Err(RepoError::NotFound) => {
            return Err(ServiceError::NotFound(format!("category {category_id}")))
        }
        Err(e) => return Err(e.into()),
    };
    let bills = repo.list_bills_by_category(category_id).await?;
    Ok((category, bills))
}

/// Load a stored bill and enrich it with roll-call info and, when an account
/// with an address is given, its representatives' votes.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` for an unknown bill, upstream errors from
/// the legislative or geocoding API, `ServiceError::Repo` on database failures.
pub async fn bill_detail(
    repo: &dyn VoterRepo,
    congress: &dyn CongressApiClient,
    civic: &dyn CivicApiClient,
    bill_id: &str,
    account: Option<&AccountRecord>,
) -> Result<BillDetailView, ServiceError> {
    let bill = match repo.get_bill(bill_id).await {
        Ok(bill) => bill,
        Err(RepoError::NotFound) => return Err(ServiceError::NotFound(format!("bill {bill_id}"))),
        Err(e) => return Err(e.into()),
    };

    let roll_calls = set_roll_call_info(congress, &bill).await?;

    let mut votes = Vec::new();
    if let Some(account) = account.filter(|a| a.address.is_some()) {
        for representative in find_representatives(repo, civic, account).await? {
            let vote = get_vote(congress, &representative, &roll_calls).await?;
            votes.push(RepresentativeVote {
                representative,
                vote: vote.to_string(),
            });
        }
    }

    Ok(BillDetailView {
        bill,
        roll_calls,
        votes,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::congress::mock::MockCongressClient;
    use crate::congress::SubjectBill;
    use crate::voter::repo::mock::MockVoterRepo;

    fn subject_bill(id: &str) -> SubjectBill {
        SubjectBill {
            bill_id: id.into(),
            short_title: Some(format!("Title of {id}")),
            congressdotgov_url: format!("https://www.congress.gov/{id}"),
            summary: Some(String::new()),
        }
    }

    fn category(repo: &MockVoterRepo, name: &str) -> CategoryRecord {
        let id = repo.add_category(name);
        CategoryRecord {
            id,
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn shared_bill_is_stored_once_and_linked_twice() {
        let repo = MockVoterRepo::new();
        let congress = MockCongressClient::new();
        let health = category(&repo, "Health");
        let taxes = category(&repo, "Taxation");
        congress.set_subject_bills("Health", vec![subject_bill("hr1-115"), subject_bill("s5-115")]);
        congress.set_subject_bills("Taxation", vec![subject_bill("hr1-115")]);

        ingest_bills_for_category(&repo, &congress, &health).await.unwrap();
        let second = ingest_bills_for_category(&repo, &congress, &taxes).await.unwrap();

        assert_eq!(
            second,
            BillIngestOutcome::Ingested(BillBatchResult {
                bills_inserted: 0,
                links_inserted: 1,
            })
        );
        let hr1: Vec<_> = repo.bills().into_iter().filter(|b| b.bill_id == "hr1-115").collect();
        assert_eq!(hr1.len(), 1);
        let links: Vec<_> = repo
            .bill_links()
            .into_iter()
            .filter(|(bill, _)| bill == "hr1-115")
            .collect();
        assert_eq!(links, vec![("hr1-115".to_string(), health.id), ("hr1-115".to_string(), taxes.id)]);
    }

    #[tokio::test]
    async fn repeated_ingestion_adds_nothing() {
        let repo = MockVoterRepo::new();
        let congress = MockCongressClient::new();
        let health = category(&repo, "Health");
        congress.set_subject_bills("Health", vec![subject_bill("hr1-115"), subject_bill("hr1-115")]);

        ingest_bills_for_category(&repo, &congress, &health).await.unwrap();
        let again = ingest_bills_for_category(&repo, &congress, &health).await.unwrap();

        assert_eq!(again, BillIngestOutcome::Ingested(BillBatchResult::default()));
        assert_eq!(repo.bills().len(), 1);
        assert_eq!(repo.bill_links().len(), 1);
    }

    #[tokio::test]
    async fn flagged_response_is_a_no_op() {
        let repo = MockVoterRepo::new();
        let congress = MockCongressClient::new();
        let womens = category(&repo, "Women's Health, Reproductive Rights");

        let outcome = ingest_bills_for_category(&repo, &congress, &womens).await.unwrap();

        assert!(matches!(outcome, BillIngestOutcome::NoResults(_)));
        assert!(repo.bills().is_empty());
        assert_eq!(congress.calls(), vec!["subject Womens-Health-Reproductive-Rights"]);
    }

    #[tokio::test]
    async fn failed_batch_writes_nothing() {
        let repo = MockVoterRepo::new();
        let congress = MockCongressClient::new();
        let health = category(&repo, "Health");
        congress.set_subject_bills("Health", vec![subject_bill("hr1-115")]);
        repo.fail_writes(true);

        let err = ingest_bills_for_category(&repo, &congress, &health).await.unwrap_err();

        assert!(matches!(err, ServiceError::Repo(RepoError::Database(_))));
        assert!(repo.bills().is_empty());
    }

    #[tokio::test]
    async fn shared_uri_fails_the_category_batch() {
        let repo = MockVoterRepo::new();
        let congress = MockCongressClient::new();
        let health = category(&repo, "Health");
        let mut second = subject_bill("hr2-115");
        second.congressdotgov_url = subject_bill("hr1-115").congressdotgov_url;
        congress.set_subject_bills("Health", vec![subject_bill("hr1-115"), second]);

        let err = ingest_bills_for_category(&repo, &congress, &health).await.unwrap_err();

        assert!(
            matches!(&err, ServiceError::Repo(RepoError::DuplicateBillUri(id)) if id == "hr2-115"),
            "got {err:?}"
        );
        assert!(repo.bills().is_empty());
        assert!(repo.bill_links().is_empty());
    }

    #[tokio::test]
    async fn run_continues_past_failed_category() {
        let repo = MockVoterRepo::new();
        let congress = MockCongressClient::new();
        let health = category(&repo, "Health");
        let energy = category(&repo, "Energy");
        let taxes = category(&repo, "Taxation");
        congress.set_subject_bills("Health", vec![subject_bill("hr1-115")]);
        congress.set_subject_bills("Taxation", vec![subject_bill("hr2-115")]);

        let summary = ingest_categories(&repo, &congress, &[health, energy, taxes]).await;

        assert_eq!(summary.ingested, 2);
        assert_eq!(summary.no_results, 1);
        assert_eq!(summary.bills_inserted, 2);
    }

    #[tokio::test]
    async fn unknown_bill_is_not_found() {
        let repo = MockVoterRepo::new();
        let congress = MockCongressClient::new();
        let civic = crate::civic::mock::MockCivicClient::new();

        let err = bill_detail(&repo, &congress, &civic, "hr9-115", None).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
