//! Platform connections: connect, refresh, disconnect.
//!
//! Connecting a platform exchanges an authorization code for tokens,
//! encrypts them, and upserts the connection record. Refreshing updates the
//! access token (and the refresh token, when the platform rotates it) in
//! place. Both are single-record upserts; concurrent refreshes for the same
//! (account, platform) resolve last-writer-wins.

use crate::error::{AuthError, Result};
use crate::gateway::AuthGateway;
use crate::providers::{AccountStore, IdentityProvider, PlatformGateway};
use crate::state::{Platform, PlatformConnection, UserId};
use crate::utils::generate_state_token;
use chrono::Utc;

/// Start of a platform connection flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectStart {
    /// Platform authorization URL to redirect the user to.
    pub auth_url: String,

    /// State parameter carrying the account id (and, for PKCE platforms,
    /// the code verifier). The callback is stateless; everything it needs
    /// rides in here.
    pub state: String,
}

/// A freshly-refreshed access token, returned to the caller in plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedAccess {
    /// New plaintext access token.
    pub access_token: String,

    /// Seconds until the new token expires.
    pub expires_in: i64,
}

/// Parsed platform callback state: `<account id>:<nonce>[:<verifier>]`.
struct CallbackState {
    user_id: UserId,
    code_verifier: Option<String>,
}

fn parse_callback_state(state: &str) -> Result<CallbackState> {
    let mut segments = state.splitn(3, ':');

    let user_id = match segments.next() {
        Some(id) if !id.is_empty() => UserId::new(id),
        _ => return Err(AuthError::InvalidStateParam),
    };

    // Second segment is the nonce; a third, when present, is the PKCE
    // verifier.
    if segments.next().is_none() {
        return Err(AuthError::InvalidStateParam);
    }
    let code_verifier = segments.next().map(str::to_string);

    Ok(CallbackState {
        user_id,
        code_verifier,
    })
}

impl<I, P, S> AuthGateway<I, P, S>
where
    I: IdentityProvider + Clone,
    P: PlatformGateway + Clone,
    S: AccountStore + Clone,
{
    /// Begin a platform connection flow for an authenticated account.
    ///
    /// # Errors
    ///
    /// Returns error if the platform authorization URL cannot be built.
    pub async fn begin_connect(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> Result<ConnectStart> {
        let state = format!("{user_id}:{}", generate_state_token());
        let request = self.platforms.authorize_request(platform, &state).await?;

        tracing::info!(user_id = %user_id, platform = %platform, "initiating platform connection");

        Ok(ConnectStart {
            auth_url: request.url,
            state: request.state,
        })
    }

    /// Complete a platform connection: exchange the code, fetch the
    /// platform identity, and upsert the encrypted connection record.
    ///
    /// Returns the account id parsed from the callback state so the caller
    /// can redirect appropriately.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidStateParam`] if the state cannot be
    /// parsed, [`AuthError::ProviderExchangeFailed`] if the code exchange
    /// fails, or a storage error.
    pub async fn complete_connect(
        &self,
        platform: Platform,
        code: &str,
        state: &str,
    ) -> Result<UserId> {
        let callback = parse_callback_state(state)?;

        let grant = self
            .platforms
            .exchange_code(platform, code, callback.code_verifier.as_deref())
            .await?;

        let account = self
            .platforms
            .fetch_account(platform, &grant.access_token)
            .await?;

        tracing::info!(
            user_id = %callback.user_id,
            platform = %platform,
            platform_user_id = %account.id,
            "linking platform account"
        );

        let now = Utc::now();
        let connection = PlatformConnection {
            user_id: callback.user_id.clone(),
            platform,
            platform_user_id: account.id,
            display_name: account.display_name,
            access_token: self.cipher.encrypt(&grant.access_token)?,
            refresh_token: grant
                .refresh_token
                .as_deref()
                .map(|token| self.cipher.encrypt(token))
                .transpose()?,
            expires_at: grant.expires_at,
            scope: grant.scope.unwrap_or_default(),
            connected_at: now,
            updated_at: now,
        };

        self.store.put_connection(&connection).await?;

        Ok(callback.user_id)
    }

    /// Refresh a platform connection's access token in place.
    ///
    /// A failed refresh leaves the stored (stale) record untouched. When
    /// the platform rotates the refresh token (SoundCloud refresh tokens
    /// are one-time use), the stored refresh token is rotated as well.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PlatformNotConnected`] if no connection exists,
    /// [`AuthError::TokenRefreshFailed`] if no refresh token is stored or
    /// the platform rejects it, [`AuthError::DecryptionFailed`] if the
    /// stored refresh token cannot be decrypted.
    pub async fn refresh(&self, user_id: &UserId, platform: Platform) -> Result<RefreshedAccess> {
        let connection = self
            .store
            .get_connection(user_id, platform)
            .await?
            .ok_or_else(|| AuthError::PlatformNotConnected {
                platform: platform.to_string(),
            })?;

        let Some(encrypted_refresh) = connection.refresh_token.as_deref() else {
            tracing::warn!(user_id = %user_id, platform = %platform, "no refresh token stored");
            return Err(AuthError::TokenRefreshFailed {
                platform: platform.to_string(),
                reason: "no refresh token available".to_string(),
            });
        };

        let refresh_token = self.cipher.decrypt(encrypted_refresh)?;

        let grant = self
            .platforms
            .refresh_token(platform, &refresh_token)
            .await?;

        let rotated_refresh = grant
            .refresh_token
            .as_deref()
            .map(|token| self.cipher.encrypt(token))
            .transpose()?;

        self.store
            .update_connection_tokens(
                user_id,
                platform,
                self.cipher.encrypt(&grant.access_token)?,
                rotated_refresh,
                grant.expires_at,
            )
            .await?;

        tracing::info!(user_id = %user_id, platform = %platform, "access token refreshed");

        Ok(RefreshedAccess {
            expires_in: (grant.expires_at - Utc::now()).num_seconds().max(0),
            access_token: grant.access_token,
        })
    }

    /// Disconnect a platform. No-op if the connection is absent.
    ///
    /// # Errors
    ///
    /// Returns error only if storage fails.
    pub async fn disconnect(&self, user_id: &UserId, platform: Platform) -> Result<()> {
        self.store.delete_connection(user_id, platform).await?;

        tracing::info!(user_id = %user_id, platform = %platform, "platform disconnected");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback_state() {
        let parsed = parse_callback_state("mmp_1:nonce").ok();
        assert!(parsed.is_some());

        let parsed = parse_callback_state("mmp_1:nonce:verifier-string")
            .ok()
            .map(|c| (c.user_id, c.code_verifier));
        assert_eq!(
            parsed,
            Some((UserId::new("mmp_1"), Some("verifier-string".to_string())))
        );
    }

    #[test]
    fn test_parse_callback_state_rejects_malformed() {
        assert!(parse_callback_state("").is_err());
        assert!(parse_callback_state("no-segments").is_err());
        assert!(parse_callback_state(":nonce").is_err());
    }
}
