//! Service layer for voter operations
//!
//! Each operation takes its collaborators explicitly: a [`VoterRepo`] for
//! persistence and the upstream clients it needs. Nothing here holds global
//! state, so every operation runs unchanged against the mocks.
//!
//! [`VoterRepo`]: super::repo::VoterRepo

pub mod accounts;
pub mod bills;
pub mod categories;
pub mod members;
pub mod representatives;
pub mod votes;

pub use accounts::{
    current_account, hash_password, login, logout, register, verify_password, LoginSession,
    RegisterRequest,
};
pub use bills::{
    bill_detail, bills_for_category, ingest_bills_for_category, ingest_categories,
    BillDetailView, BillIngestOutcome, IngestRunSummary, RepresentativeVote,
};
pub use categories::{
    add_categories, parse_subject_list, profile, remove_categories, seed_categories, Profile,
};
pub use members::{congress_listing, load_members, ChamberSummary, CongressListing, MemberIngestSummary};
pub use representatives::find_representatives;
pub use votes::{get_vote, set_roll_call_info, RollCallInfo, VoteOutcome, NO_VOTE_FOUND};

use crate::civic::CivicApiError;
use crate::congress::CongressApiError;

use super::repo::{AccountRepoError, RepoError};

/// Error from a voter operation, with variants that map cleanly to HTTP
/// status codes.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidCredentials(&'static str),
    #[error("A user with that email already exists!")]
    AccountExists,
    #[error("Login required")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(String),
    #[error("legislative API: {0}")]
    Congress(#[from] CongressApiError),
    #[error("geocoding API: {0}")]
    Civic(#[from] CivicApiError),
    #[error("repository: {0}")]
    Repo(#[from] RepoError),
    #[error("account repository: {0}")]
    Account(#[from] AccountRepoError),
    #[error("internal error: {0}")]
    Internal(String),
}
