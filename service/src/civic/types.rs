//! Data types for geocoding/representatives API responses.

use serde::{Deserialize, Serialize};

/// An elected official returned for an address.
///
/// Names carry middle initials ("John Q. Public").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Official {
    pub name: String,
    #[serde(default)]
    pub party: Option<String>,
}

/// An office held by one or more of the returned officials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub name: String,
    #[serde(default)]
    pub official_indices: Vec<usize>,
}

/// Response from the representatives-by-address endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RepresentativesResponse {
    pub officials: Vec<Official>,
    #[serde(default)]
    pub offices: Vec<Office>,
}
