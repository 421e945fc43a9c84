//! HTTP utilities and middleware shared by the server binary and tests.

pub mod cors;
pub mod security;

pub use cors::cors_layer;
pub use security::{security_headers_middleware, SecurityHeaders};
