//! Google SSO identity provider implementation.

use crate::config::OAuthClient;
use crate::error::{AuthError, Result};
use crate::providers::{IdentityClaims, IdentityProvider, TokenGrant};
use crate::state::SsoProvider;
use reqwest::Client;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google Identity Platform provider.
///
/// Requests offline access with a forced consent screen so a refresh token
/// is always granted, and the OIDC scopes `openid email profile`.
///
/// # Example
///
/// ```no_run
/// use multimusic_auth::config::OAuthClient;
/// use multimusic_auth::providers::GoogleIdentityProvider;
///
/// let google = GoogleIdentityProvider::new(OAuthClient::new(
///     "client-id",
///     "client-secret",
///     "https://api.example.com/auth/google/callback",
/// ));
/// ```
#[derive(Clone, Debug)]
pub struct GoogleIdentityProvider {
    client: OAuthClient,
    http_client: Client,
}

impl GoogleIdentityProvider {
    /// Create a new Google identity provider.
    #[must_use]
    pub fn new(client: OAuthClient) -> Self {
        Self {
            client,
            http_client: Client::new(),
        }
    }

    const fn check_provider(provider: SsoProvider) -> Result<()> {
        match provider {
            SsoProvider::Google => Ok(()),
        }
    }
}

impl IdentityProvider for GoogleIdentityProvider {
    async fn authorization_url(&self, provider: SsoProvider, state: &str) -> Result<String> {
        Self::check_provider(provider)?;

        let params = [
            ("client_id", self.client.client_id.as_str()),
            ("redirect_uri", self.client.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("state", state),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];

        let query = serde_urlencoded::to_string(params)
            .map_err(|e| AuthError::InternalError(format!("failed to build URL: {e}")))?;

        Ok(format!("{AUTHORIZE_URL}?{query}"))
    }

    async fn exchange_code(&self, provider: SsoProvider, code: &str) -> Result<TokenGrant> {
        Self::check_provider(provider)?;

        let params = [
            ("code", code),
            ("client_id", &self.client.client_id),
            ("client_secret", &self.client.client_secret),
            ("redirect_uri", &self.client.redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::ProviderExchangeFailed {
                provider: provider.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(provider = %provider, "Google token exchange failed: {body}");
            return Err(AuthError::ProviderExchangeFailed {
                provider: provider.to_string(),
                reason: "token exchange rejected".to_string(),
            });
        }

        let google_response: GoogleTokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::ProviderExchangeFailed {
                    provider: provider.to_string(),
                    reason: e.to_string(),
                })?;

        Ok(TokenGrant {
            access_token: google_response.access_token,
            refresh_token: google_response.refresh_token,
            expires_at: chrono::Utc::now()
                + chrono::Duration::seconds(google_response.expires_in.unwrap_or(3600)),
            scope: google_response.scope,
        })
    }

    async fn fetch_claims(
        &self,
        provider: SsoProvider,
        access_token: &str,
    ) -> Result<IdentityClaims> {
        Self::check_provider(provider)?;

        let response = self
            .http_client
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfoFailed {
                provider: provider.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(provider = %provider, "Google userinfo request failed: {body}");
            return Err(AuthError::UserInfoFailed {
                provider: provider.to_string(),
                reason: "userinfo fetch rejected".to_string(),
            });
        }

        let user: GoogleUserInfo =
            response
                .json()
                .await
                .map_err(|e| AuthError::UserInfoFailed {
                    provider: provider.to_string(),
                    reason: e.to_string(),
                })?;

        if !user.email_verified {
            tracing::warn!(provider = %provider, email = %user.email, "unverified email rejected");
            return Err(AuthError::EmailNotVerified);
        }

        Ok(IdentityClaims {
            subject_id: user.sub,
            email: user.email,
            email_verified: user.email_verified,
            name: user.name,
            picture: user.picture,
        })
    }
}

/// Google's token endpoint response format.
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    /// Access token for API requests.
    access_token: String,

    /// Token expiration in seconds (typically 3600).
    expires_in: Option<i64>,

    /// Refresh token (only with `access_type=offline`).
    refresh_token: Option<String>,

    /// Granted scopes (space-delimited).
    scope: Option<String>,
}

/// Google's UserInfo endpoint response format.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    /// Google user ID (stable, unique).
    sub: String,

    /// Full name.
    name: Option<String>,

    /// Profile picture URL.
    picture: Option<String>,

    /// Email address.
    email: String,

    /// Whether Google verified the email.
    email_verified: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn provider() -> GoogleIdentityProvider {
        GoogleIdentityProvider::new(OAuthClient::new(
            "test_client_id",
            "test_secret",
            "http://127.0.0.1:8080/auth/google/callback",
        ))
    }

    #[tokio::test]
    async fn test_authorization_url() {
        let url = provider()
            .authorization_url(SsoProvider::Google, "test_state_123")
            .await
            .unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains("state=test_state_123"));
        assert!(url.contains("scope=openid+email+profile"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2F127.0.0.1%3A8080%2Fauth%2Fgoogle%2Fcallback"
        ));
    }
}
