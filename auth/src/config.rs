//! Gateway configuration.
//!
//! All secrets and provider credentials live in one explicit struct that is
//! constructed once at process start and passed by reference to each
//! component — never as ambient global state.

use chrono::Duration;

/// OAuth client settings for one provider or platform.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// OAuth 2.0 client ID.
    pub client_id: String,

    /// OAuth 2.0 client secret (keep confidential).
    pub client_secret: String,

    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
}

impl OAuthClient {
    /// Create new OAuth client settings.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

/// Top-level gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Frontend base URL. Callback handlers redirect here with either a
    /// session credential or an error query parameter.
    pub frontend_url: String,

    /// Secret used to sign session credentials (HS256).
    pub session_secret: String,

    /// Session credential lifetime.
    ///
    /// Default: 7 days
    pub session_ttl: Duration,

    /// 32-byte AES-256-GCM key for token encryption at rest.
    pub encryption_key: Vec<u8>,

    /// Google SSO client settings.
    pub google: OAuthClient,

    /// Spotify platform client settings.
    pub spotify: OAuthClient,

    /// YouTube Music platform client settings (Google OAuth credentials).
    pub youtube: OAuthClient,

    /// SoundCloud platform client settings.
    pub soundcloud: OAuthClient,
}

impl GatewayConfig {
    /// Create a new configuration with the default 7-day session lifetime.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frontend_url: impl Into<String>,
        session_secret: impl Into<String>,
        encryption_key: Vec<u8>,
        google: OAuthClient,
        spotify: OAuthClient,
        youtube: OAuthClient,
        soundcloud: OAuthClient,
    ) -> Self {
        Self {
            frontend_url: frontend_url.into(),
            session_secret: session_secret.into(),
            session_ttl: Duration::days(7),
            encryption_key,
            google,
            spotify,
            youtube,
            soundcloud,
        }
    }

    /// Set session credential lifetime.
    #[must_use]
    pub const fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Build configuration from environment variables.
    ///
    /// Reads `FRONTEND_URL`, `SESSION_SECRET`, `ENCRYPTION_KEY` and per
    /// provider `<NAME>_CLIENT_ID` / `<NAME>_CLIENT_SECRET` /
    /// `<NAME>_REDIRECT_URI` (YouTube reuses the Google client credentials
    /// with its own redirect URI).
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::InternalError`] if a required variable is
    /// missing or the encryption key is not 32 bytes.
    pub fn from_env() -> crate::Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| crate::AuthError::InternalError(format!("{name} is not set")))
        };

        let encryption_key = var("ENCRYPTION_KEY")?.into_bytes();
        if encryption_key.len() != 32 {
            return Err(crate::AuthError::InternalError(
                "ENCRYPTION_KEY must be exactly 32 bytes".to_string(),
            ));
        }

        let google_id = var("GOOGLE_CLIENT_ID")?;
        let google_secret = var("GOOGLE_CLIENT_SECRET")?;

        Ok(Self::new(
            var("FRONTEND_URL")?,
            var("SESSION_SECRET")?,
            encryption_key,
            OAuthClient::new(
                google_id.clone(),
                google_secret.clone(),
                var("GOOGLE_REDIRECT_URI")?,
            ),
            OAuthClient::new(
                var("SPOTIFY_CLIENT_ID")?,
                var("SPOTIFY_CLIENT_SECRET")?,
                var("SPOTIFY_REDIRECT_URI")?,
            ),
            OAuthClient::new(google_id, google_secret, var("YOUTUBE_REDIRECT_URI")?),
            OAuthClient::new(
                var("SOUNDCLOUD_CLIENT_ID")?,
                var("SOUNDCLOUD_CLIENT_SECRET")?,
                var("SOUNDCLOUD_REDIRECT_URI")?,
            ),
        ))
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let localhost_client = |path: &str| {
            OAuthClient::new(
                "test-client-id",
                "test-client-secret",
                format!("http://127.0.0.1:8080{path}"),
            )
        };

        Self::new(
            "http://127.0.0.1:3000",
            "test-session-secret",
            vec![0u8; 32],
            localhost_client("/auth/google/callback"),
            localhost_client("/platforms/spotify/callback"),
            localhost_client("/platforms/youtube/callback"),
            localhost_client("/platforms/soundcloud/callback"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.session_ttl, Duration::days(7));
        assert_eq!(config.encryption_key.len(), 32);
        assert_eq!(config.frontend_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn test_session_ttl_builder() {
        let config = GatewayConfig::default().with_session_ttl(Duration::hours(1));
        assert_eq!(config.session_ttl, Duration::hours(1));
    }
}
