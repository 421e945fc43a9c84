//! Data types for legislative API responses.
//!
//! Every upstream body is first checked for an error flag, then decoded into
//! these schemas. A missing or malformed field becomes
//! [`CongressApiError::Schema`](super::CongressApiError::Schema).

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_string_from_number};

/// Chamber of Congress, used to pick the roster endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Senate,
    House,
}

impl Chamber {
    /// Path segment used by the roster endpoint.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Senate => "senate",
            Self::House => "house",
        }
    }
}

impl std::fmt::Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

/// A member record from a chamber roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterMember {
    /// Bioguide ID (e.g., "A000360")
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// "Senator, 2nd Class", "Representative", ...
    pub title: String,
    /// Party affiliation (e.g., "R", "D", "I")
    pub party: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Year of the next election, as a string ("2020")
    #[serde(default)]
    pub next_election: Option<String>,
    #[serde(default)]
    pub twitter_account: Option<String>,
    #[serde(default)]
    pub facebook_account: Option<String>,
    #[serde(default)]
    pub youtube_account: Option<String>,
    /// Boolean in recent payloads, "true"/"false" in older ones.
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub in_office: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterResult {
    pub members: Vec<RosterMember>,
}

/// Response from the chamber roster endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterResponse {
    pub results: Vec<RosterResult>,
}

/// A bill record from the subject search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectBill {
    /// Bill id including the congress number (e.g., "hr1234-115")
    pub bill_id: String,
    #[serde(default)]
    pub short_title: Option<String>,
    pub congressdotgov_url: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Response from the subject search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectBillsResponse {
    pub results: Vec<SubjectBill>,
}

/// One roll call listed on a bill, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillVote {
    /// "House" or "Senate"
    pub chamber: String,
    #[serde(deserialize_with = "deserialize_string_from_number")]
    pub roll_call: String,
    /// Absolute URL of the roll call's vote positions
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillDetail {
    #[serde(default)]
    pub votes: Vec<BillVote>,
}

/// Response from the per-bill detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BillDetailResponse {
    pub results: Vec<BillDetail>,
}

/// A single member's position on a roll call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotePosition {
    pub member_id: String,
    pub vote_position: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollCallVote {
    pub positions: Vec<VotePosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollCallVotes {
    pub vote: RollCallVote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollCallResults {
    pub votes: RollCallVotes,
}

/// Response from a roll call's vote-positions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RollCallResponse {
    pub results: RollCallResults,
}
