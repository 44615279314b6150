//! Streaming platform gateway trait.

use super::{AuthorizeRequest, PlatformAccount, TokenGrant};
use crate::error::Result;
use crate::state::Platform;

/// Streaming platform OAuth gateway.
///
/// Abstracts over the music platforms whose accounts a user can connect
/// (Spotify, YouTube Music, SoundCloud). Unlike [`super::IdentityProvider`],
/// tokens obtained here are stored — encrypted — so the frontend can use
/// them against the platform's API, and they can be refreshed later.
pub trait PlatformGateway: Send + Sync {
    /// Build the platform's authorization request.
    ///
    /// For platforms requiring PKCE the returned request carries the code
    /// verifier, which must be passed back to [`Self::exchange_code`].
    ///
    /// # Errors
    ///
    /// Returns error if URL construction fails or the platform is not
    /// handled by this implementation.
    fn authorize_request(
        &self,
        platform: Platform,
        state: &str,
    ) -> impl std::future::Future<Output = Result<AuthorizeRequest>> + Send;

    /// Exchange an authorization code for platform tokens.
    ///
    /// # Errors
    ///
    /// Returns error if the network request fails, the platform rejects the
    /// code, or the response is malformed.
    fn exchange_code(
        &self,
        platform: Platform,
        code: &str,
        code_verifier: Option<&str>,
    ) -> impl std::future::Future<Output = Result<TokenGrant>> + Send;

    /// Fetch the platform's own account identity using an access token.
    ///
    /// # Errors
    ///
    /// Returns error if the network request fails, the token is invalid, or
    /// the account cannot be resolved (e.g. a Google account without a
    /// YouTube channel).
    fn fetch_account(
        &self,
        platform: Platform,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<PlatformAccount>> + Send;

    /// Obtain a new access token from a refresh token.
    ///
    /// Some platforms rotate the refresh token on every use; when the
    /// returned grant carries one, the caller must persist it.
    ///
    /// # Errors
    ///
    /// Returns error if the network request fails or the platform rejects
    /// the refresh token (revoked, expired, or malformed).
    fn refresh_token(
        &self,
        platform: Platform,
        refresh_token: &str,
    ) -> impl std::future::Future<Output = Result<TokenGrant>> + Send;
}
