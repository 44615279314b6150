//! Account management handlers.

use super::Gateway;
use crate::error::AppError;
use crate::extractors::BearerToken;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use multimusic_auth::providers::{AccountStore, IdentityProvider, PlatformGateway};
use multimusic_auth::{ConnectedPlatform, LinkedProvider, Platform, SsoProvider};
use serde::Serialize;

/// Profile response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Internal account id.
    pub user_id: String,

    /// Email address.
    pub email: String,

    /// Display name.
    pub display_name: String,

    /// Avatar URL.
    pub avatar_url: Option<String>,

    /// The SSO provider that created the account.
    pub primary_auth_provider: SsoProvider,

    /// Account created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Linked provider listing body.
#[derive(Debug, Clone, Serialize)]
pub struct AuthProvidersResponse {
    /// Linked SSO providers.
    pub providers: Vec<LinkedProvider>,
}

/// Connected platform listing body.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformsResponse {
    /// Connected platforms. Token material is never included.
    pub platforms: Vec<ConnectedPlatform>,
}

/// Disconnect confirmation body.
#[derive(Debug, Clone, Serialize)]
pub struct DisconnectResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Get the authenticated account's profile.
///
/// # Endpoint
///
/// ```text
/// GET /user/profile    (Bearer session)
/// ```
///
/// # Errors
///
/// Returns 401 without a valid session, 404 if the account record is
/// missing.
pub async fn profile<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    BearerToken(session): BearerToken,
) -> Result<Json<ProfileResponse>, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let user_id = gateway.sessions().verify(&session)?;
    let profile = gateway.profile(&user_id).await?;

    Ok(Json(ProfileResponse {
        user_id: profile.user_id.to_string(),
        email: profile.email,
        display_name: profile.display_name,
        avatar_url: profile.avatar_url,
        primary_auth_provider: profile.primary_provider,
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }))
}

/// List the SSO providers linked to the authenticated account.
///
/// # Endpoint
///
/// ```text
/// GET /user/auth-providers    (Bearer session)
/// ```
///
/// # Errors
///
/// Returns 401 without a valid session.
pub async fn auth_providers<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    BearerToken(session): BearerToken,
) -> Result<Json<AuthProvidersResponse>, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let user_id = gateway.sessions().verify(&session)?;
    let providers = gateway.auth_providers(&user_id).await?;

    Ok(Json(AuthProvidersResponse { providers }))
}

/// List the platforms connected to the authenticated account.
///
/// # Endpoint
///
/// ```text
/// GET /user/platforms    (Bearer session)
/// ```
///
/// # Errors
///
/// Returns 401 without a valid session.
pub async fn platforms<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    BearerToken(session): BearerToken,
) -> Result<Json<PlatformsResponse>, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let user_id = gateway.sessions().verify(&session)?;
    let platforms = gateway.platforms(&user_id).await?;

    Ok(Json(PlatformsResponse { platforms }))
}

/// Disconnect a platform from the authenticated account. Idempotent.
///
/// # Endpoint
///
/// ```text
/// DELETE /user/platforms/:platform    (Bearer session)
/// ```
///
/// # Errors
///
/// Returns 401 without a valid session, 400 for an unknown platform.
pub async fn disconnect_platform<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    Path(platform_str): Path<String>,
    BearerToken(session): BearerToken,
) -> Result<Json<DisconnectResponse>, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let platform = Platform::parse(&platform_str)?;
    let user_id = gateway.sessions().verify(&session)?;

    gateway.disconnect(&user_id, platform).await?;

    Ok(Json(DisconnectResponse {
        message: format!("{platform} disconnected successfully"),
    }))
}
