//! Legislative API client module.
//!
//! Fetches chamber rosters, bills by subject, per-bill roll calls, and
//! roll-call vote positions.
//!
//! # Architecture
//!
//! - [`CongressApiClient`] - Trait defining API operations
//! - [`HttpCongressClient`] - Real HTTP implementation using reqwest
//! - [`mock::MockCongressClient`] - Mock for unit tests (behind `test-utils` feature)
//!
//! Upstream bodies are untrusted: an error-flagged body becomes
//! [`CongressApiError::Flagged`] and a body missing expected fields becomes
//! [`CongressApiError::Schema`], so callers can tell the handled no-op case
//! apart from a broken upstream.
//!
//! # Testing Patterns
//!
//! Use `MockCongressClient` for service tests and `MockHttpServer` (wiremock)
//! to exercise `HttpCongressClient` against stubbed HTTP:
//!
//! ```ignore
//! server
//!     .expect_get("/115/senate/members.json")
//!     .with_header("X-API-Key", "test-key")
//!     .respond_with_json(json!({ "results": [{ "members": [] }] }))
//!     .mount()
//!     .await;
//!
//! let client = HttpCongressClient::new(server.url(), 115, "test-key");
//! let members = client.list_members(Chamber::Senate).await?;
//! ```

mod client;
mod types;

pub use client::{error_flag, CongressApiClient, CongressApiError, HttpCongressClient};
pub use types::{
    BillDetail, BillDetailResponse, BillVote, Chamber, RollCallResponse, RosterMember,
    RosterResponse, SubjectBill, SubjectBillsResponse, VotePosition,
};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
