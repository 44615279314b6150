//! Account queries: profile, linked providers, connected platforms.
//!
//! Read-only views over the record store. Tokens are never exposed here.

use crate::error::{AuthError, Result};
use crate::gateway::AuthGateway;
use crate::providers::{AccountStore, IdentityProvider, PlatformGateway};
use crate::state::{Platform, Profile, SsoProvider, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A linked SSO provider, as reported to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProvider {
    /// Provider name.
    pub provider: SsoProvider,

    /// Email linked at this provider.
    pub email: String,

    /// Always `true` for an existing link.
    pub linked: bool,

    /// Link timestamp.
    pub linked_at: DateTime<Utc>,
}

/// A connected platform, as reported to the frontend. Token fields are
/// deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPlatform {
    /// Platform name.
    pub platform: Platform,

    /// The platform's own user id.
    pub platform_user_id: String,

    /// Display name reported by the platform.
    pub display_name: Option<String>,

    /// Always `true` for an existing connection.
    pub connected: bool,

    /// Connection timestamp.
    pub connected_at: DateTime<Utc>,

    /// Granted OAuth scope.
    pub scope: String,
}

impl<I, P, S> AuthGateway<I, P, S>
where
    I: IdentityProvider + Clone,
    P: PlatformGateway + Clone,
    S: AccountStore + Clone,
{
    /// Get an account's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccountNotFound`] if no profile exists, or a
    /// storage error.
    pub async fn profile(&self, user_id: &UserId) -> Result<Profile> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// List the SSO providers linked to an account.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn auth_providers(&self, user_id: &UserId) -> Result<Vec<LinkedProvider>> {
        let links = self.store.list_identity_links(user_id).await?;

        Ok(links
            .into_iter()
            .map(|link| LinkedProvider {
                provider: link.provider,
                email: link.email,
                linked: true,
                linked_at: link.linked_at,
            })
            .collect())
    }

    /// List the platforms connected to an account.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn platforms(&self, user_id: &UserId) -> Result<Vec<ConnectedPlatform>> {
        let connections = self.store.list_connections(user_id).await?;

        Ok(connections
            .into_iter()
            .map(|connection| ConnectedPlatform {
                platform: connection.platform,
                platform_user_id: connection.platform_user_id,
                display_name: connection.display_name,
                connected: true,
                connected_at: connection.connected_at,
                scope: connection.scope,
            })
            .collect())
    }
}
