//! Core domain types for the authentication gateway.
//!
//! These are the three persisted record shapes (profile, identity link,
//! platform connection) plus the identifier and provider/platform enums
//! they are keyed by.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Internal account identifier.
///
/// Opaque, globally unique, of the form `mmp_<uuid-hex>`. Generated once on
/// first SSO login and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Generate a new random account identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("mmp_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Wrap an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Providers and Platforms
// ═══════════════════════════════════════════════════════════════════════

/// SSO identity provider.
///
/// An SSO provider authenticates the user into an internal account; its
/// tokens are used once to read identity claims and are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SsoProvider {
    /// Google Identity Platform.
    Google,
}

impl SsoProvider {
    /// Get the provider name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }

    /// Parse provider from string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::UnknownProvider`] if the name is not
    /// recognized.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            _ => Err(crate::AuthError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for SsoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Streaming platform whose account a user can connect.
///
/// Unlike SSO providers, platform tokens are stored (encrypted) so the
/// frontend can use them against the platform's API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Spotify.
    Spotify,
    /// YouTube Music (Google OAuth with YouTube scopes).
    YouTube,
    /// SoundCloud (OAuth 2.1 with PKCE).
    SoundCloud,
}

impl Platform {
    /// Get the platform name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::YouTube => "youtube",
            Self::SoundCloud => "soundcloud",
        }
    }

    /// Parse platform from string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::UnknownPlatform`] if the name is not
    /// recognized.
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "spotify" => Ok(Self::Spotify),
            "youtube" => Ok(Self::YouTube),
            "soundcloud" => Ok(Self::SoundCloud),
            _ => Err(crate::AuthError::UnknownPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Persisted Records
// ═══════════════════════════════════════════════════════════════════════

/// Account profile record.
///
/// Created on first successful SSO callback; never deleted by this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Internal account id.
    pub user_id: UserId,

    /// Email address from the first SSO provider.
    pub email: String,

    /// Display name. Falls back to the local part of the email when the
    /// provider supplies none.
    pub display_name: String,

    /// Avatar URL (if the provider supplied one).
    pub avatar_url: Option<String>,

    /// The SSO provider that created this account.
    pub primary_provider: SsoProvider,

    /// Account created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Identity link record (account ↔ SSO provider).
///
/// At most one link exists per (account, provider) pair, and a provider
/// subject id maps to at most one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityLink {
    /// Internal account id.
    pub user_id: UserId,

    /// SSO provider.
    pub provider: SsoProvider,

    /// Provider-assigned subject id (e.g. Google `sub`).
    pub subject_id: String,

    /// Email linked at this provider.
    pub email: String,

    /// Link timestamp.
    pub linked_at: DateTime<Utc>,
}

/// Platform connection record (account ↔ streaming platform).
///
/// Both tokens are stored encrypted; the plaintext never touches the store.
/// Destroyed on explicit disconnect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConnection {
    /// Internal account id.
    pub user_id: UserId,

    /// Streaming platform.
    pub platform: Platform,

    /// The platform's own user id (Spotify user id, YouTube channel id,
    /// SoundCloud user id).
    pub platform_user_id: String,

    /// Display name reported by the platform (channel title, username).
    pub display_name: Option<String>,

    /// Encrypted access token.
    pub access_token: String,

    /// Encrypted refresh token. SoundCloud non-expiring grants may omit it.
    pub refresh_token: Option<String>,

    /// Access token expiry timestamp.
    pub expires_at: DateTime<Utc>,

    /// Granted OAuth scope.
    pub scope: String,

    /// Connection created timestamp.
    pub connected_at: DateTime<Utc>,

    /// Last token update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PlatformConnection {
    /// Whether the stored access token is still inside its validity window.
    ///
    /// Past expiry, the refresh token is mandatory input to obtain a new
    /// access token.
    #[must_use]
    pub fn access_token_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }

    /// Seconds until the access token expires (zero if already expired).
    #[must_use]
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_user_id_generation() {
        let id1 = UserId::generate();
        let id2 = UserId::generate();

        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("mmp_"));
        // uuid simple form: 32 hex chars after the prefix
        assert_eq!(id1.as_str().len(), "mmp_".len() + 32);
    }

    #[test]
    fn test_sso_provider_parse() {
        assert_eq!(SsoProvider::parse("google").ok(), Some(SsoProvider::Google));
        assert_eq!(SsoProvider::parse("Google").ok(), Some(SsoProvider::Google));
        assert!(SsoProvider::parse("myspace").is_err());
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!(Platform::parse("spotify").ok(), Some(Platform::Spotify));
        assert_eq!(Platform::parse("YouTube").ok(), Some(Platform::YouTube));
        assert_eq!(
            Platform::parse("soundcloud").ok(),
            Some(Platform::SoundCloud)
        );
        assert!(Platform::parse("winamp").is_err());
    }

    #[test]
    fn test_platform_as_str_round_trip() {
        for platform in [Platform::Spotify, Platform::YouTube, Platform::SoundCloud] {
            assert_eq!(Platform::parse(platform.as_str()).ok(), Some(platform));
        }
    }

    #[test]
    fn test_access_token_validity_window() {
        let mut connection = PlatformConnection {
            user_id: UserId::generate(),
            platform: Platform::Spotify,
            platform_user_id: "spotify_user".to_string(),
            display_name: None,
            access_token: "encrypted".to_string(),
            refresh_token: Some("encrypted".to_string()),
            expires_at: Utc::now() + Duration::hours(1),
            scope: "streaming".to_string(),
            connected_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(connection.access_token_valid());
        assert!(connection.expires_in() > 3500);

        connection.expires_at = Utc::now() - Duration::minutes(5);
        assert!(!connection.access_token_valid());
        assert_eq!(connection.expires_in(), 0);
    }
}
