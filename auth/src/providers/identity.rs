//! SSO identity provider trait.

use super::{IdentityClaims, TokenGrant};
use crate::error::Result;
use crate::state::SsoProvider;

/// SSO identity provider.
///
/// Abstracts over the external identity services (Google, etc.) used to
/// authenticate a user into an internal account. The tokens obtained here
/// are consumed once to read identity claims and are never stored.
pub trait IdentityProvider: Send + Sync {
    /// Build the provider's authorization URL.
    ///
    /// # Errors
    ///
    /// Returns error if URL construction fails or the provider is not
    /// handled by this implementation.
    fn authorization_url(
        &self,
        provider: SsoProvider,
        state: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Exchange an authorization code for tokens.
    ///
    /// Codes are single-use; a failed exchange is surfaced to the caller
    /// without retry.
    ///
    /// # Errors
    ///
    /// Returns error if the network request fails, the provider rejects the
    /// code, or the response is malformed.
    fn exchange_code(
        &self,
        provider: SsoProvider,
        code: &str,
    ) -> impl std::future::Future<Output = Result<TokenGrant>> + Send;

    /// Fetch identity claims using a freshly-obtained access token.
    ///
    /// # Errors
    ///
    /// Returns error if the network request fails, the token is invalid, or
    /// the response is malformed.
    fn fetch_claims(
        &self,
        provider: SsoProvider,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<IdentityClaims>> + Send;
}
