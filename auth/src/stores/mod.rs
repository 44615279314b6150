//! Storage implementations for the gateway.
//!
//! - **Account Store** (Redis) — profiles, identity links, and platform
//!   connections, with a (provider, subject id) reverse index for identity
//!   resolution and per-account index sets for listings.
//!
//! The in-memory test store lives under [`crate::mocks`].

pub mod account_redis;

pub use account_redis::RedisAccountStore;
