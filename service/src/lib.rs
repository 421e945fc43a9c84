#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod civic;
pub mod config;
pub mod congress;
pub mod db;
pub mod http;
pub mod normalize;
pub mod rest;
pub mod voter;
