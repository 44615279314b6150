//! Identity linking: SSO login and account resolution.
//!
//! An SSO callback resolves to exactly one internal account: if an identity
//! link already exists for the provider's subject id, its account is
//! reused; otherwise a new account and link are created. Either way a
//! session credential for the account is returned. SSO tokens are consumed
//! once for identity claims and never stored.

use crate::error::Result;
use crate::gateway::AuthGateway;
use crate::providers::{AccountStore, IdentityClaims, IdentityProvider, PlatformGateway};
use crate::state::{IdentityLink, Profile, SsoProvider, UserId};
use crate::utils::{display_name_from_email, generate_state_token};
use chrono::Utc;

/// Start of an SSO login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStart {
    /// Provider authorization URL to redirect the user to.
    pub auth_url: String,

    /// Random state parameter (CSRF token).
    pub state: String,
}

/// Outcome of a completed SSO login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    /// The resolved internal account.
    pub user_id: UserId,

    /// Session credential for the account.
    pub session_token: String,

    /// Whether a new account was created for this login.
    pub account_created: bool,
}

impl<I, P, S> AuthGateway<I, P, S>
where
    I: IdentityProvider + Clone,
    P: PlatformGateway + Clone,
    S: AccountStore + Clone,
{
    /// Begin an SSO login flow.
    ///
    /// # Errors
    ///
    /// Returns error if the provider authorization URL cannot be built.
    pub async fn begin_login(&self, provider: SsoProvider) -> Result<LoginStart> {
        let state = generate_state_token();
        let auth_url = self.identity.authorization_url(provider, &state).await?;

        tracing::info!(provider = %provider, "initiating SSO login");

        Ok(LoginStart { auth_url, state })
    }

    /// Complete an SSO login: exchange the authorization code, resolve or
    /// create the account, and issue a session credential.
    ///
    /// Authorization codes are single-use; a failed exchange is surfaced
    /// without retry and the caller must restart the login.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::ProviderExchangeFailed`] if the code
    /// exchange fails, [`crate::AuthError::EmailNotVerified`] if the
    /// provider reports an unverified email, or a storage error.
    pub async fn complete_login(
        &self,
        provider: SsoProvider,
        code: &str,
    ) -> Result<LoginSession> {
        let grant = self.identity.exchange_code(provider, code).await?;
        let claims = self
            .identity
            .fetch_claims(provider, &grant.access_token)
            .await?;

        let (user_id, account_created) = self.resolve_account(provider, &claims).await?;
        let session_token = self.sessions.issue(&user_id)?;

        Ok(LoginSession {
            user_id,
            session_token,
            account_created,
        })
    }

    /// Link an additional SSO provider to an existing account.
    ///
    /// Upserts the identity link for (account, provider); at most one link
    /// per pair exists.
    ///
    /// # Errors
    ///
    /// Returns error if the code exchange fails or storage fails.
    pub async fn link_provider(
        &self,
        user_id: &UserId,
        provider: SsoProvider,
        code: &str,
    ) -> Result<()> {
        let grant = self.identity.exchange_code(provider, code).await?;
        let claims = self
            .identity
            .fetch_claims(provider, &grant.access_token)
            .await?;

        self.store
            .put_identity_link(&IdentityLink {
                user_id: user_id.clone(),
                provider,
                subject_id: claims.subject_id,
                email: claims.email,
                linked_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = %user_id, provider = %provider, "linked additional provider");

        Ok(())
    }

    /// Find the account owning this provider identity, or create one.
    async fn resolve_account(
        &self,
        provider: SsoProvider,
        claims: &IdentityClaims,
    ) -> Result<(UserId, bool)> {
        if let Some(link) = self
            .store
            .find_identity_by_subject(provider, &claims.subject_id)
            .await?
        {
            tracing::info!(user_id = %link.user_id, provider = %provider, "existing account resolved");
            return Ok((link.user_id, false));
        }

        let user_id = UserId::generate();
        let now = Utc::now();

        tracing::info!(user_id = %user_id, provider = %provider, "creating new account");

        let display_name = claims
            .name
            .clone()
            .unwrap_or_else(|| display_name_from_email(&claims.email));

        self.store
            .put_profile(&Profile {
                user_id: user_id.clone(),
                email: claims.email.clone(),
                display_name,
                avatar_url: claims.picture.clone(),
                primary_provider: provider,
                created_at: now,
                updated_at: now,
            })
            .await?;

        self.store
            .put_identity_link(&IdentityLink {
                user_id: user_id.clone(),
                provider,
                subject_id: claims.subject_id.clone(),
                email: claims.email.clone(),
                linked_at: now,
            })
            .await?;

        Ok((user_id, true))
    }
}
