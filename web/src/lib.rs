//! # MultiMusic Web Adapter
//!
//! Thin Axum adapter over the [`multimusic_auth`] gateway. The gateway
//! itself is a pure request-handler library; this crate binds it to HTTP
//! routes, maps domain errors to status codes, and extracts bearer session
//! credentials. A local server binary and a serverless function adapter
//! can both serve [`router::gateway_router`] unchanged.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;

pub use error::AppError;
pub use extractors::BearerToken;
pub use router::gateway_router;
