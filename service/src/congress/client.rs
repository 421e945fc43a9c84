//! Legislative API client for rosters, subject searches, and roll calls.
//!
//! # Example
//!
//! ```ignore
//! use voterinfo_api::congress::{Chamber, CongressApiClient, HttpCongressClient};
//!
//! let client = HttpCongressClient::new("https://api.propublica.org/congress/v1", 115, "my-api-key");
//! let senators = client.list_members(Chamber::Senate).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::types::{
    BillDetailResponse, BillVote, Chamber, RollCallResponse, RosterMember, RosterResponse,
    SubjectBill, SubjectBillsResponse, VotePosition,
};

/// Errors that can occur when calling the legislative API.
#[derive(Debug, Error)]
pub enum CongressApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status without a recognizable error body
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Body carried an `error`/`errors` field or `"status": "ERROR"`
    #[error("API reported an error: {0}")]
    Flagged(String),

    /// Body was missing an expected field or had the wrong shape
    #[error("unexpected response shape: {0}")]
    Schema(String),
}

/// Return the upstream error message if the body is error-flagged.
///
/// A body is flagged when `error` or `errors` is present and non-empty, or
/// when `status` is the string `"ERROR"`.
#[must_use]
pub fn error_flag(body: &Value) -> Option<String> {
    for key in ["error", "errors"] {
        if let Some(value) = body.get(key).filter(|v| is_truthy(v)) {
            return Some(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
    }
    if body.get("status").and_then(Value::as_str) == Some("ERROR") {
        return Some("status ERROR".to_string());
    }
    None
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Decode an unflagged body into a typed schema.
fn decode<T: DeserializeOwned>(body: Value, what: &str) -> Result<T, CongressApiError> {
    if let Some(message) = error_flag(&body) {
        return Err(CongressApiError::Flagged(message));
    }
    serde_json::from_value(body).map_err(|e| CongressApiError::Schema(format!("{what}: {e}")))
}

/// Trait for legislative API operations.
///
/// Use `HttpCongressClient` for real HTTP calls, or
/// [`mock::MockCongressClient`] in tests.
#[async_trait]
pub trait CongressApiClient: Send + Sync {
    /// Current membership roster of a chamber.
    async fn list_members(&self, chamber: Chamber) -> Result<Vec<RosterMember>, CongressApiError>;

    /// Recent bills tagged with a subject slug.
    async fn bills_by_subject(&self, subject_slug: &str)
        -> Result<Vec<SubjectBill>, CongressApiError>;

    /// Roll calls recorded on a bill, most recent first.
    async fn bill_votes(&self, bill_slug: &str) -> Result<Vec<BillVote>, CongressApiError>;

    /// Member positions on a roll call, fetched from the URL a bill's vote listed.
    async fn roll_call_positions(
        &self,
        votes_url: &str,
    ) -> Result<Vec<VotePosition>, CongressApiError>;
}

/// HTTP-based implementation of `CongressApiClient`.
pub struct HttpCongressClient {
    client: reqwest::Client,
    base_url: String,
    congress: u16,
    api_key: String,
}

impl HttpCongressClient {
    /// Create a new client for the given congress number.
    pub fn new(base_url: impl Into<String>, congress: u16, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, congress, api_key)
    }

    /// Create a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        congress: u16,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CongressApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, congress, api_key))
    }

    /// Create a client with a custom `reqwest::Client`.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        congress: u16,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            congress,
            api_key: api_key.into(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, CongressApiError> {
        tracing::debug!(url, "legislative API request");

        let response = self
            .client
            .get(url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if let Some(flag) = serde_json::from_str::<Value>(&message)
                .ok()
                .as_ref()
                .and_then(error_flag)
            {
                return Err(CongressApiError::Flagged(flag));
            }
            return Err(CongressApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CongressApiClient for HttpCongressClient {
    async fn list_members(&self, chamber: Chamber) -> Result<Vec<RosterMember>, CongressApiError> {
        let url = format!(
            "{}/{}/{}/members.json",
            self.base_url,
            self.congress,
            chamber.as_path()
        );
        let roster: RosterResponse = decode(self.get_json(&url).await?, "roster")?;

        roster
            .results
            .into_iter()
            .next()
            .map(|result| result.members)
            .ok_or_else(|| CongressApiError::Schema("roster: empty results".to_string()))
    }

    async fn bills_by_subject(
        &self,
        subject_slug: &str,
    ) -> Result<Vec<SubjectBill>, CongressApiError> {
        let url = format!("{}/bills/subjects/{subject_slug}.json", self.base_url);
        let bills: SubjectBillsResponse = decode(self.get_json(&url).await?, "subject bills")?;
        Ok(bills.results)
    }

    async fn bill_votes(&self, bill_slug: &str) -> Result<Vec<BillVote>, CongressApiError> {
        let url = format!(
            "{}/{}/bills/{bill_slug}.json",
            self.base_url, self.congress
        );
        let detail: BillDetailResponse = decode(self.get_json(&url).await?, "bill detail")?;

        detail
            .results
            .into_iter()
            .next()
            .map(|result| result.votes)
            .ok_or_else(|| CongressApiError::Schema("bill detail: empty results".to_string()))
    }

    async fn roll_call_positions(
        &self,
        votes_url: &str,
    ) -> Result<Vec<VotePosition>, CongressApiError> {
        let roll_call: RollCallResponse = decode(self.get_json(votes_url).await?, "roll call")?;
        Ok(roll_call.results.votes.vote.positions)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{
        async_trait, BillVote, Chamber, CongressApiClient, CongressApiError, RosterMember,
        SubjectBill, VotePosition,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock implementation of `CongressApiClient`.
    ///
    /// Results are keyed by request argument and returned on every call.
    /// Unconfigured arguments yield `Flagged("No results")`, the same
    /// outcome as an upstream error body. Calls are recorded for
    /// verification.
    pub struct MockCongressClient {
        members: Mutex<HashMap<Chamber, Vec<RosterMember>>>,
        subjects: Mutex<HashMap<String, Vec<SubjectBill>>>,
        bill_votes: Mutex<HashMap<String, Vec<BillVote>>>,
        positions: Mutex<HashMap<String, Vec<VotePosition>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockCongressClient {
        pub fn new() -> Self {
            Self {
                members: Mutex::new(HashMap::new()),
                subjects: Mutex::new(HashMap::new()),
                bill_votes: Mutex::new(HashMap::new()),
                positions: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn set_members(&self, chamber: Chamber, members: Vec<RosterMember>) {
            self.members.lock().unwrap().insert(chamber, members);
        }

        pub fn set_subject_bills(&self, slug: &str, bills: Vec<SubjectBill>) {
            self.subjects.lock().unwrap().insert(slug.to_string(), bills);
        }

        pub fn set_bill_votes(&self, bill_slug: &str, votes: Vec<BillVote>) {
            self.bill_votes
                .lock()
                .unwrap()
                .insert(bill_slug.to_string(), votes);
        }

        pub fn set_positions(&self, url: &str, positions: Vec<VotePosition>) {
            self.positions
                .lock()
                .unwrap()
                .insert(url.to_string(), positions);
        }

        /// Every request made, as `"<operation> <argument>"`.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Default for MockCongressClient {
        fn default() -> Self {
            Self::new()
        }
    }

    fn no_results() -> CongressApiError {
        CongressApiError::Flagged("No results".to_string())
    }

    #[async_trait]
    impl CongressApiClient for MockCongressClient {
        async fn list_members(
            &self,
            chamber: Chamber,
        ) -> Result<Vec<RosterMember>, CongressApiError> {
            self.record(format!("members {chamber}"));
            self.members
                .lock()
                .unwrap()
                .get(&chamber)
                .cloned()
                .ok_or_else(no_results)
        }

        async fn bills_by_subject(
            &self,
            subject_slug: &str,
        ) -> Result<Vec<SubjectBill>, CongressApiError> {
            self.record(format!("subject {subject_slug}"));
            self.subjects
                .lock()
                .unwrap()
                .get(subject_slug)
                .cloned()
                .ok_or_else(no_results)
        }

        async fn bill_votes(&self, bill_slug: &str) -> Result<Vec<BillVote>, CongressApiError> {
            self.record(format!("bill {bill_slug}"));
            self.bill_votes
                .lock()
                .unwrap()
                .get(bill_slug)
                .cloned()
                .ok_or_else(no_results)
        }

        async fn roll_call_positions(
            &self,
            votes_url: &str,
        ) -> Result<Vec<VotePosition>, CongressApiError> {
            self.record(format!("positions {votes_url}"));
            self.positions
                .lock()
                .unwrap()
                .get(votes_url)
                .cloned()
                .ok_or_else(no_results)
        }
    }
}
