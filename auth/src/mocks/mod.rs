//! Mock provider implementations for testing.
//!
//! Simple, in-memory implementations of the provider traits for use in
//! unit and integration tests. Tokens are held in plain text — never use
//! these in production.

pub mod account_store;
pub mod identity;
pub mod platforms;

pub use account_store::MemoryAccountStore;
pub use identity::MockIdentityProvider;
pub use platforms::MockPlatformGateway;
