//! HTTP implementation of the streaming platform gateway.
//!
//! One struct handles all three platforms, routing on [`Platform`]:
//!
//! - **Spotify** — standard OAuth 2.0 authorization code flow with
//!   streaming/playback scopes.
//! - **YouTube Music** — Google OAuth endpoints with YouTube scopes and
//!   offline access; the connected identity is the user's primary YouTube
//!   channel.
//! - **SoundCloud** — OAuth 2.1 with PKCE (S256) and the `non-expiring`
//!   scope; refresh tokens are one-time use.

use crate::config::{GatewayConfig, OAuthClient};
use crate::error::{AuthError, Result};
use crate::providers::{AuthorizeRequest, PlatformAccount, PlatformGateway, TokenGrant};
use crate::state::Platform;
use crate::utils::generate_pkce_pair;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

const SPOTIFY_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SPOTIFY_ME_URL: &str = "https://api.spotify.com/v1/me";

const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const YOUTUBE_CHANNELS_URL: &str = "https://www.googleapis.com/youtube/v3/channels";

const SOUNDCLOUD_AUTHORIZE_URL: &str = "https://secure.soundcloud.com/authorize";
const SOUNDCLOUD_TOKEN_URL: &str = "https://secure.soundcloud.com/oauth/token";
const SOUNDCLOUD_ME_URL: &str = "https://api.soundcloud.com/me";

const SPOTIFY_SCOPES: &str = "user-read-private user-read-email streaming \
                              user-modify-playback-state user-read-playback-state";
const YOUTUBE_SCOPES: &str = "https://www.googleapis.com/auth/youtube.readonly \
                              https://www.googleapis.com/auth/youtube.force-ssl";

/// SoundCloud `non-expiring` grants report no `expires_in`; treat them as
/// valid for a year.
const NON_EXPIRING_FALLBACK_SECS: i64 = 31_536_000;

/// HTTP gateway to the supported streaming platforms.
#[derive(Clone, Debug)]
pub struct StreamingPlatforms {
    spotify: OAuthClient,
    youtube: OAuthClient,
    soundcloud: OAuthClient,
    http_client: Client,
}

impl StreamingPlatforms {
    /// Create a gateway from per-platform OAuth client settings.
    #[must_use]
    pub fn new(spotify: OAuthClient, youtube: OAuthClient, soundcloud: OAuthClient) -> Self {
        Self {
            spotify,
            youtube,
            soundcloud,
            http_client: Client::new(),
        }
    }

    /// Create a gateway from the top-level configuration.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            config.spotify.clone(),
            config.youtube.clone(),
            config.soundcloud.clone(),
        )
    }

    const fn client_for(&self, platform: Platform) -> &OAuthClient {
        match platform {
            Platform::Spotify => &self.spotify,
            Platform::YouTube => &self.youtube,
            Platform::SoundCloud => &self.soundcloud,
        }
    }

    const fn token_url(platform: Platform) -> &'static str {
        match platform {
            Platform::Spotify => SPOTIFY_TOKEN_URL,
            Platform::YouTube => GOOGLE_TOKEN_URL,
            Platform::SoundCloud => SOUNDCLOUD_TOKEN_URL,
        }
    }

    async fn post_token_request(
        &self,
        platform: Platform,
        params: &[(&str, &str)],
    ) -> Result<PlatformTokenResponse> {
        let response = self
            .http_client
            .post(Self::token_url(platform))
            .form(params)
            .send()
            .await
            .map_err(|e| AuthError::ProviderExchangeFailed {
                provider: platform.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(platform = %platform, "token request failed: {body}");
            return Err(AuthError::ProviderExchangeFailed {
                provider: platform.to_string(),
                reason: "token request rejected".to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::ProviderExchangeFailed {
                provider: platform.to_string(),
                reason: e.to_string(),
            })
    }

    async fn fetch_spotify_account(&self, access_token: &str) -> Result<PlatformAccount> {
        let user: SpotifyUser = self
            .get_json(Platform::Spotify, SPOTIFY_ME_URL, access_token, false)
            .await?;

        Ok(PlatformAccount {
            id: user.id,
            display_name: user.display_name,
        })
    }

    async fn fetch_youtube_channel(&self, access_token: &str) -> Result<PlatformAccount> {
        let url = format!("{YOUTUBE_CHANNELS_URL}?part=snippet&mine=true");
        let channels: YouTubeChannelList = self
            .get_json(Platform::YouTube, &url, access_token, false)
            .await?;

        // The first channel is the user's primary channel; a Google account
        // without one cannot be connected.
        let channel = channels.items.into_iter().next().ok_or_else(|| {
            AuthError::UserInfoFailed {
                provider: Platform::YouTube.to_string(),
                reason: "no YouTube channel for this account".to_string(),
            }
        })?;

        Ok(PlatformAccount {
            id: channel.id,
            display_name: Some(channel.snippet.title),
        })
    }

    async fn fetch_soundcloud_account(&self, access_token: &str) -> Result<PlatformAccount> {
        let user: SoundCloudUser = self
            .get_json(Platform::SoundCloud, SOUNDCLOUD_ME_URL, access_token, true)
            .await?;

        Ok(PlatformAccount {
            id: user.id.to_string(),
            display_name: user.username,
        })
    }

    /// GET a JSON resource with the platform's authorization header
    /// convention (SoundCloud uses the legacy `OAuth` scheme).
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        platform: Platform,
        url: &str,
        access_token: &str,
        oauth_scheme: bool,
    ) -> Result<T> {
        let request = self.http_client.get(url);
        let request = if oauth_scheme {
            request.header("Authorization", format!("OAuth {access_token}"))
        } else {
            request.bearer_auth(access_token)
        };

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::UserInfoFailed {
                provider: platform.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(platform = %platform, "account fetch failed: {body}");
            return Err(AuthError::UserInfoFailed {
                provider: platform.to_string(),
                reason: "account fetch rejected".to_string(),
            });
        }

        response.json().await.map_err(|e| AuthError::UserInfoFailed {
            provider: platform.to_string(),
            reason: e.to_string(),
        })
    }
}

impl PlatformGateway for StreamingPlatforms {
    async fn authorize_request(
        &self,
        platform: Platform,
        state: &str,
    ) -> Result<AuthorizeRequest> {
        let client = self.client_for(platform);

        let (base_url, mut params, state, code_verifier) = match platform {
            Platform::Spotify => (
                SPOTIFY_AUTHORIZE_URL,
                vec![("scope", SPOTIFY_SCOPES.to_string())],
                state.to_string(),
                None,
            ),
            Platform::YouTube => (
                GOOGLE_AUTHORIZE_URL,
                vec![
                    ("scope", YOUTUBE_SCOPES.to_string()),
                    ("access_type", "offline".to_string()),
                    ("prompt", "consent".to_string()),
                ],
                state.to_string(),
                None,
            ),
            Platform::SoundCloud => {
                // The callback is stateless, so the verifier rides along as
                // an extra state segment.
                let (verifier, challenge) = generate_pkce_pair();
                (
                    SOUNDCLOUD_AUTHORIZE_URL,
                    vec![
                        ("scope", "non-expiring".to_string()),
                        ("code_challenge", challenge),
                        ("code_challenge_method", "S256".to_string()),
                    ],
                    format!("{state}:{verifier}"),
                    Some(verifier),
                )
            }
        };

        params.extend([
            ("client_id", client.client_id.clone()),
            ("response_type", "code".to_string()),
            ("redirect_uri", client.redirect_uri.clone()),
            ("state", state.clone()),
        ]);

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| AuthError::InternalError(format!("failed to build URL: {e}")))?;

        Ok(AuthorizeRequest {
            url: format!("{base_url}?{query}"),
            state,
            code_verifier,
        })
    }

    async fn exchange_code(
        &self,
        platform: Platform,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenGrant> {
        let client = self.client_for(platform);

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", client.redirect_uri.as_str()),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
        ];
        if let Some(verifier) = code_verifier {
            params.push(("code_verifier", verifier));
        }

        let response = self.post_token_request(platform, &params).await?;
        Ok(response.into_grant())
    }

    async fn fetch_account(
        &self,
        platform: Platform,
        access_token: &str,
    ) -> Result<PlatformAccount> {
        match platform {
            Platform::Spotify => self.fetch_spotify_account(access_token).await,
            Platform::YouTube => self.fetch_youtube_channel(access_token).await,
            Platform::SoundCloud => self.fetch_soundcloud_account(access_token).await,
        }
    }

    async fn refresh_token(&self, platform: Platform, refresh_token: &str) -> Result<TokenGrant> {
        let client = self.client_for(platform);

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
        ];

        let response = self
            .post_token_request(platform, &params)
            .await
            .map_err(|e| match e {
                AuthError::ProviderExchangeFailed { reason, .. } => {
                    AuthError::TokenRefreshFailed {
                        platform: platform.to_string(),
                        reason,
                    }
                }
                other => other,
            })?;

        Ok(response.into_grant())
    }
}

/// Common token endpoint response shape across the supported platforms.
#[derive(Debug, Deserialize)]
struct PlatformTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

impl PlatformTokenResponse {
    fn into_grant(self) -> TokenGrant {
        TokenGrant {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now()
                + Duration::seconds(self.expires_in.unwrap_or(NON_EXPIRING_FALLBACK_SECS)),
            scope: self.scope,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpotifyUser {
    id: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YouTubeChannelList {
    #[serde(default)]
    items: Vec<YouTubeChannel>,
}

#[derive(Debug, Deserialize)]
struct YouTubeChannel {
    id: String,
    snippet: YouTubeChannelSnippet,
}

#[derive(Debug, Deserialize)]
struct YouTubeChannelSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SoundCloudUser {
    id: u64,
    username: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway() -> StreamingPlatforms {
        StreamingPlatforms::from_config(&GatewayConfig::default())
    }

    #[tokio::test]
    async fn test_spotify_authorize_request() {
        let request = gateway()
            .authorize_request(Platform::Spotify, "user:nonce")
            .await
            .unwrap();

        assert!(request.url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(request.url.contains("response_type=code"));
        assert!(request.url.contains("state=user%3Anonce"));
        assert!(request.url.contains("scope=user-read-private"));
        assert!(request.code_verifier.is_none());
    }

    #[tokio::test]
    async fn test_youtube_authorize_request_uses_google_endpoints() {
        let request = gateway()
            .authorize_request(Platform::YouTube, "state")
            .await
            .unwrap();

        assert!(request.url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(request.url.contains("youtube.readonly"));
        assert!(request.url.contains("access_type=offline"));
        assert!(request.url.contains("prompt=consent"));
        assert!(request.code_verifier.is_none());
    }

    #[tokio::test]
    async fn test_soundcloud_authorize_request_carries_pkce() {
        let request = gateway()
            .authorize_request(Platform::SoundCloud, "mmp_1:nonce")
            .await
            .unwrap();

        assert!(request.url.starts_with("https://secure.soundcloud.com/authorize?"));
        assert!(request.url.contains("code_challenge_method=S256"));
        assert!(request.url.contains("code_challenge="));
        assert!(request.url.contains("scope=non-expiring"));

        let verifier = request.code_verifier.unwrap();
        assert!(verifier.len() >= 43);

        // Verifier travels as the third state segment.
        assert_eq!(request.state, format!("mmp_1:nonce:{verifier}"));
    }

    #[tokio::test]
    async fn test_spotify_state_is_passed_through_unchanged() {
        let request = gateway()
            .authorize_request(Platform::Spotify, "mmp_1:nonce")
            .await
            .unwrap();

        assert_eq!(request.state, "mmp_1:nonce");
    }

    #[test]
    fn test_grant_defaults_to_non_expiring_fallback() {
        let response = PlatformTokenResponse {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_in: None,
            scope: Some("non-expiring".to_string()),
        };

        let grant = response.into_grant();
        let remaining = (grant.expires_at - Utc::now()).num_days();
        assert!(remaining >= 364);
    }
}
