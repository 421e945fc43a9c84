//! Roll-call lookup and vote resolution for a bill

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::congress::{Chamber, CongressApiClient, CongressApiError};
use crate::normalize::bill_slug;
use crate::voter::repo::{BillRecord, RepresentativeRecord};

/// Shown when no position can be found for a representative.
pub const NO_VOTE_FOUND: &str = "No vote information found";

/// Most recent House and Senate roll calls on a bill.
///
/// Computed on demand for each bill view; never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RollCallInfo {
    pub house_roll_call: Option<String>,
    pub house_votes_url: Option<String>,
    pub senate_roll_call: Option<String>,
    pub senate_votes_url: Option<String>,
}

impl RollCallInfo {
    #[must_use]
    pub fn votes_url(&self, chamber: Chamber) -> Option<&str> {
        match chamber {
            Chamber::House => self.house_votes_url.as_deref(),
            Chamber::Senate => self.senate_votes_url.as_deref(),
        }
    }
}

/// A representative's position on a bill's latest roll call in their chamber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Position(String),
    NotFound,
}

impl fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => f.write_str(position),
            Self::NotFound => f.write_str(NO_VOTE_FOUND),
        }
    }
}

/// Fetch a bill's roll calls and keep the first House and first Senate entry.
///
/// The upstream list is taken to be ordered most recent first. An
/// error-flagged body yields empty info.
///
/// # Errors
///
/// Returns `CongressApiError` for request failures, non-success statuses, or
/// a malformed body.
pub async fn set_roll_call_info(
    congress: &dyn CongressApiClient,
    bill: &BillRecord,
) -> Result<RollCallInfo, CongressApiError> {
    let slug = bill_slug(&bill.bill_id);
    let votes = match congress.bill_votes(slug).await {
        Ok(votes) => votes,
        Err(CongressApiError::Flagged(reason)) => {
            tracing::warn!(bill_id = %bill.bill_id, %reason, "No roll calls for bill");
            return Ok(RollCallInfo::default());
        }
        Err(e) => return Err(e),
    };

    let mut info = RollCallInfo::default();
    if let Some(vote) = votes.iter().find(|v| v.chamber == "House") {
        info.house_roll_call = Some(vote.roll_call.clone());
        info.house_votes_url = Some(vote.api_url.clone());
    }
    if let Some(vote) = votes.iter().find(|v| v.chamber == "Senate") {
        info.senate_roll_call = Some(vote.roll_call.clone());
        info.senate_votes_url = Some(vote.api_url.clone());
    }
    Ok(info)
}

/// Resolve a representative's vote from previously fetched roll-call info.
///
/// # Errors
///
/// Returns `CongressApiError` for request failures, non-success statuses, or
/// a malformed body. An error-flagged body is [`VoteOutcome::NotFound`].
pub async fn get_vote(
    congress: &dyn CongressApiClient,
    rep: &RepresentativeRecord,
    info: &RollCallInfo,
) -> Result<VoteOutcome, CongressApiError> {
    let Some(url) = rep.chamber().and_then(|chamber| info.votes_url(chamber)) else {
        return Ok(VoteOutcome::NotFound);
    };

    let positions = match congress.roll_call_positions(url).await {
        Ok(positions) => positions,
        Err(CongressApiError::Flagged(reason)) => {
            tracing::warn!(member_id = %rep.external_id, %reason, "No positions for roll call");
            return Ok(VoteOutcome::NotFound);
        }
        Err(e) => return Err(e),
    };

    Ok(positions
        .into_iter()
        .find(|p| p.member_id == rep.external_id)
        .map_or(VoteOutcome::NotFound, |p| VoteOutcome::Position(p.vote_position)))
}
