//! Voter-facing domain: accounts, legislators, categories, and bills.
//!
//! - [`repo`] persists everything behind the [`repo::VoterRepo`] trait
//! - [`service`] implements the ingestion and reconciliation operations
//! - [`http`] exposes them as axum handlers

pub mod http;
pub mod repo;
pub mod service;
