//! Gateway providers.
//!
//! This module defines traits for all external dependencies of the gateway
//! (SSO providers, streaming platforms, the record store). The service layer
//! depends on these traits only; concrete HTTP implementations live next to
//! them and in-memory mocks live under [`crate::mocks`].
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast
//! - **Production**: real HTTP providers and the Redis-backed store
//! - **Development**: instrumented variants (logging, tracing)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod account_store;
pub mod google;
pub mod identity;
pub mod platform;
pub mod streaming;

// Re-export provider traits and implementations
pub use account_store::AccountStore;
pub use google::GoogleIdentityProvider;
pub use identity::IdentityProvider;
pub use platform::PlatformGateway;
pub use streaming::StreamingPlatforms;

/// Identity claims returned by an SSO provider after code exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Provider-assigned subject id (stable, unique per provider).
    pub subject_id: String,

    /// Email address.
    pub email: String,

    /// Whether the provider verified the email.
    pub email_verified: bool,

    /// Display name.
    pub name: Option<String>,

    /// Profile picture URL.
    pub picture: Option<String>,
}

/// Token grant returned by a provider's token endpoint.
///
/// Used for both the initial authorization-code exchange and refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGrant {
    /// Access token.
    pub access_token: String,

    /// Refresh token. Present on initial grants with offline access; on
    /// refresh only when the platform rotates it (SoundCloud does).
    pub refresh_token: Option<String>,

    /// Access token expiry timestamp.
    pub expires_at: DateTime<Utc>,

    /// Granted scope (space-delimited), if reported.
    pub scope: Option<String>,
}

/// Authorization request produced at the start of an OAuth flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizeRequest {
    /// URL to redirect the user to.
    pub url: String,

    /// The state parameter embedded in the URL. PKCE platforms extend the
    /// caller's state with a verifier segment, so callers must use this
    /// value — not the one they passed in — when handing the state to the
    /// client.
    pub state: String,

    /// PKCE code verifier, for platforms that require one. Must be carried
    /// through to the code exchange.
    pub code_verifier: Option<String>,
}

/// The platform's own view of the connected account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformAccount {
    /// The platform's user id (Spotify user id, YouTube channel id,
    /// SoundCloud user id).
    pub id: String,

    /// Display name reported by the platform.
    pub display_name: Option<String>,
}
