//! Mock SSO identity provider for testing.

use crate::error::{AuthError, Result};
use crate::providers::{IdentityClaims, IdentityProvider, TokenGrant};
use crate::state::SsoProvider;
use std::future::Future;

/// Mock SSO identity provider.
///
/// Returns predefined claims for any authorization code. Use
/// [`MockIdentityProvider::with_subject`] to simulate distinct provider
/// identities.
#[derive(Debug, Clone)]
pub struct MockIdentityProvider {
    /// Whether to simulate success or failure.
    pub should_succeed: bool,

    /// Subject id returned in claims.
    pub subject_id: String,

    /// Email returned in claims.
    pub email: String,

    /// Display name returned in claims (`None` exercises the email
    /// fallback).
    pub name: Option<String>,
}

impl MockIdentityProvider {
    /// Create a mock that succeeds with default claims.
    #[must_use]
    pub fn new() -> Self {
        Self {
            should_succeed: true,
            subject_id: "google_subject_123".to_string(),
            email: "test@example.com".to_string(),
            name: Some("Test User".to_string()),
        }
    }

    /// Create a mock that fails every exchange.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_succeed: false,
            ..Self::new()
        }
    }

    /// Override the subject id and email in the returned claims.
    #[must_use]
    pub fn with_subject(mut self, subject_id: impl Into<String>, email: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self.email = email.into();
        self
    }

    /// Drop the display name from the returned claims.
    #[must_use]
    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MockIdentityProvider {
    fn authorization_url(
        &self,
        provider: SsoProvider,
        state: &str,
    ) -> impl Future<Output = Result<String>> + Send {
        let state = state.to_string();

        async move {
            Ok(format!(
                "https://{provider}.example/oauth/authorize?state={state}"
            ))
        }
    }

    fn exchange_code(
        &self,
        provider: SsoProvider,
        code: &str,
    ) -> impl Future<Output = Result<TokenGrant>> + Send {
        let should_succeed = self.should_succeed;
        let code = code.to_string();

        async move {
            if !should_succeed {
                return Err(AuthError::ProviderExchangeFailed {
                    provider: provider.to_string(),
                    reason: format!("invalid code: {code}"),
                });
            }

            Ok(TokenGrant {
                access_token: "mock_sso_access_token".to_string(),
                refresh_token: Some("mock_sso_refresh_token".to_string()),
                expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
                scope: Some("openid email profile".to_string()),
            })
        }
    }

    fn fetch_claims(
        &self,
        provider: SsoProvider,
        _access_token: &str,
    ) -> impl Future<Output = Result<IdentityClaims>> + Send {
        let this = self.clone();

        async move {
            if !this.should_succeed {
                return Err(AuthError::UserInfoFailed {
                    provider: provider.to_string(),
                    reason: "mock failure".to_string(),
                });
            }

            Ok(IdentityClaims {
                subject_id: this.subject_id,
                email: this.email,
                email_verified: true,
                name: this.name,
                picture: Some("https://example.com/avatar.jpg".to_string()),
            })
        }
    }
}
