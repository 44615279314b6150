//! Account record store trait.
//!
//! Key-value persistence for the three record shapes, addressed by
//! (account id, record-type discriminant). Writes are single-record
//! upserts; there are no cross-record transactions.

use crate::error::Result;
use crate::state::{IdentityLink, Platform, PlatformConnection, Profile, SsoProvider, UserId};
use chrono::{DateTime, Utc};

/// Account record store.
///
/// # Implementation Notes
///
/// **Production**: Redis, with a reverse index on (provider, subject id) for
/// identity resolution and per-user index sets for listings.
///
/// **Testing**: in-memory store ([`crate::mocks::MemoryAccountStore`]).
///
/// Concurrent writes to the same record resolve last-writer-wins; callers
/// must not rely on stronger guarantees.
pub trait AccountStore: Send + Sync {
    /// Upsert an account profile.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn put_profile(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Get an account profile.
    ///
    /// # Errors
    ///
    /// Returns error if retrieval fails.
    fn get_profile(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<Profile>>> + Send;

    /// Upsert an identity link and its (provider, subject id) reverse
    /// mapping.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn put_identity_link(
        &self,
        link: &IdentityLink,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Resolve an identity link by the provider's subject id.
    ///
    /// This is the lookup that decides between "existing account" and "new
    /// account" on an SSO callback.
    ///
    /// # Errors
    ///
    /// Returns error if retrieval fails.
    fn find_identity_by_subject(
        &self,
        provider: SsoProvider,
        subject_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<IdentityLink>>> + Send;

    /// List all identity links for an account.
    ///
    /// # Errors
    ///
    /// Returns error if retrieval fails.
    fn list_identity_links(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<IdentityLink>>> + Send;

    /// Upsert a platform connection.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn put_connection(
        &self,
        connection: &PlatformConnection,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Get a platform connection.
    ///
    /// # Errors
    ///
    /// Returns error if retrieval fails.
    fn get_connection(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> impl std::future::Future<Output = Result<Option<PlatformConnection>>> + Send;

    /// List all platform connections for an account.
    ///
    /// # Errors
    ///
    /// Returns error if retrieval fails.
    fn list_connections(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<PlatformConnection>>> + Send;

    /// Update a connection's tokens in place after a refresh.
    ///
    /// `refresh_token` is `Some` only when the platform rotated it; `None`
    /// leaves the stored refresh token untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the connection does not exist or storage fails.
    fn update_connection_tokens(
        &self,
        user_id: &UserId,
        platform: Platform,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Delete a platform connection. No-op if absent (idempotent).
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn delete_connection(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
