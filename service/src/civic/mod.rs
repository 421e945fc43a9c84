//! Geocoding API client module.
//!
//! Resolves a free-text home address to the elected officials that
//! represent it. Mirrors the [`crate::congress`] layout:
//!
//! - [`CivicApiClient`] - Trait defining API operations
//! - [`HttpCivicClient`] - Real HTTP implementation using reqwest
//! - [`mock::MockCivicClient`] - Mock for unit tests (behind `test-utils` feature)

mod client;
mod types;

pub use client::{CivicApiClient, CivicApiError, HttpCivicClient};
pub use types::{Office, Official, RepresentativesResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
