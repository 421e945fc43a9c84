//! Repository layer for voter, legislator, and bill persistence

pub mod accounts;
pub mod bills;
pub mod categories;
pub mod representatives;
pub mod sessions;
pub mod voter;

pub use accounts::{AccountRecord, AccountRepoError, NewAccount};
pub use bills::{BillBatchResult, BillRecord, BillWrite};
pub use categories::CategoryRecord;
pub use representatives::RepresentativeRecord;
pub use voter::{PgVoterRepo, VoterRepo};

/// Error type shared by repository operations without domain-specific failures
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,
    /// A new bill's URI is already stored under another bill id.
    #[error("bill {0} has a URI already stored for another bill")]
    DuplicateBillUri(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    pub use super::voter::mock::MockVoterRepo;
}
