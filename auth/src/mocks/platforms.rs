//! Mock streaming platform gateway for testing.

use crate::error::{AuthError, Result};
use crate::providers::{AuthorizeRequest, PlatformAccount, PlatformGateway, TokenGrant};
use crate::state::Platform;
use std::future::Future;

/// Mock streaming platform gateway.
///
/// Returns predefined token grants and account identities.
#[derive(Debug, Clone)]
pub struct MockPlatformGateway {
    /// Whether code exchange and account fetch succeed.
    pub should_succeed: bool,

    /// Whether refresh succeeds.
    pub refresh_should_succeed: bool,

    /// Refresh token included in the initial grant (`None` simulates a
    /// non-expiring grant without one).
    pub grant_refresh_token: Option<String>,

    /// Refresh token returned by a successful refresh (`Some` simulates
    /// one-time-use rotation).
    pub rotated_refresh_token: Option<String>,
}

impl MockPlatformGateway {
    /// Create a mock where every operation succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            should_succeed: true,
            refresh_should_succeed: true,
            grant_refresh_token: Some("mock_platform_refresh_token".to_string()),
            rotated_refresh_token: None,
        }
    }

    /// Create a mock that fails code exchanges.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            should_succeed: false,
            ..Self::new()
        }
    }

    /// Make refresh calls fail (revoked refresh token).
    #[must_use]
    pub fn with_failing_refresh(mut self) -> Self {
        self.refresh_should_succeed = false;
        self
    }

    /// Omit the refresh token from the initial grant.
    #[must_use]
    pub fn without_refresh_token(mut self) -> Self {
        self.grant_refresh_token = None;
        self
    }

    /// Rotate the refresh token on every successful refresh.
    #[must_use]
    pub fn with_rotating_refresh(mut self, token: impl Into<String>) -> Self {
        self.rotated_refresh_token = Some(token.into());
        self
    }
}

impl Default for MockPlatformGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformGateway for MockPlatformGateway {
    fn authorize_request(
        &self,
        platform: Platform,
        state: &str,
    ) -> impl Future<Output = Result<AuthorizeRequest>> + Send {
        let state = state.to_string();

        async move {
            Ok(AuthorizeRequest {
                url: format!(
                    "https://{platform}.example/oauth/authorize?state={state}"
                ),
                state,
                code_verifier: None,
            })
        }
    }

    fn exchange_code(
        &self,
        platform: Platform,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> impl Future<Output = Result<TokenGrant>> + Send {
        let this = self.clone();
        let code = code.to_string();

        async move {
            if !this.should_succeed {
                return Err(AuthError::ProviderExchangeFailed {
                    provider: platform.to_string(),
                    reason: format!("invalid code: {code}"),
                });
            }

            Ok(TokenGrant {
                access_token: "mock_platform_access_token".to_string(),
                refresh_token: this.grant_refresh_token,
                expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
                scope: Some("streaming".to_string()),
            })
        }
    }

    fn fetch_account(
        &self,
        platform: Platform,
        _access_token: &str,
    ) -> impl Future<Output = Result<PlatformAccount>> + Send {
        let should_succeed = self.should_succeed;

        async move {
            if !should_succeed {
                return Err(AuthError::UserInfoFailed {
                    provider: platform.to_string(),
                    reason: "mock failure".to_string(),
                });
            }

            Ok(PlatformAccount {
                id: format!("{platform}_user_123"),
                display_name: Some("Mock Listener".to_string()),
            })
        }
    }

    fn refresh_token(
        &self,
        platform: Platform,
        _refresh_token: &str,
    ) -> impl Future<Output = Result<TokenGrant>> + Send {
        let this = self.clone();

        async move {
            if !this.refresh_should_succeed {
                return Err(AuthError::TokenRefreshFailed {
                    platform: platform.to_string(),
                    reason: "refresh token revoked".to_string(),
                });
            }

            Ok(TokenGrant {
                access_token: "mock_refreshed_access_token".to_string(),
                refresh_token: this.rotated_refresh_token,
                expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
                scope: None,
            })
        }
    }
}
