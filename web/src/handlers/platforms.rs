//! Platform connection handlers.

use super::{AuthStartResponse, Gateway};
use crate::error::AppError;
use crate::extractors::BearerToken;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use multimusic_auth::providers::{AccountStore, IdentityProvider, PlatformGateway};
use multimusic_auth::Platform;
use serde::{Deserialize, Serialize};

/// Platform callback query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformCallbackQuery {
    /// Authorization code from the platform.
    pub code: Option<String>,

    /// State parameter carrying the account id.
    pub state: Option<String>,

    /// Error reported by the platform.
    pub error: Option<String>,
}

/// Refresh response: the new plaintext access token for client-side use.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,

    /// Seconds until it expires.
    pub expires_in: i64,
}

/// Initiate a platform connection for the authenticated account.
///
/// # Endpoint
///
/// ```text
/// POST /platforms/:platform/connect    (Bearer session)
/// ```
///
/// # Errors
///
/// Returns 401 without a valid session, 400 for an unknown platform.
pub async fn connect<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    Path(platform_str): Path<String>,
    BearerToken(session): BearerToken,
) -> Result<Json<AuthStartResponse>, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let platform = Platform::parse(&platform_str)?;
    let user_id = gateway.sessions().verify(&session)?;

    let start = gateway.begin_connect(&user_id, platform).await?;

    Ok(Json(AuthStartResponse {
        auth_url: start.auth_url,
        state: start.state,
    }))
}

/// Handle the platform OAuth callback: link the platform account and
/// redirect to the frontend dashboard.
///
/// # Endpoint
///
/// ```text
/// GET /platforms/:platform/callback?code=...&state=...
/// ```
///
/// The account id rides in the state parameter; no session is required
/// (the platform redirects the browser here directly).
///
/// # Errors
///
/// Returns 400 for an unknown platform; everything else is reported via
/// the redirect.
pub async fn callback<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    Path(platform_str): Path<String>,
    Query(query): Query<PlatformCallbackQuery>,
) -> Result<Response, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let platform = Platform::parse(&platform_str)?;
    let dashboard = format!("{}/dashboard", gateway.config().frontend_url);

    if let Some(error) = query.error {
        tracing::warn!(platform = %platform, error = %error, "platform callback reported an error");
        return Ok(Redirect::to(&format!("{dashboard}?error={error}")).into_response());
    }

    let (Some(code), Some(state)) = (query.code, query.state) else {
        return Ok(Redirect::to(&format!("{dashboard}?error=invalid_callback")).into_response());
    };

    match gateway.complete_connect(platform, &code, &state).await {
        Ok(user_id) => {
            tracing::info!(user_id = %user_id, platform = %platform, "platform connected");
            Ok(Redirect::to(&format!("{dashboard}?{platform}=connected")).into_response())
        }
        Err(multimusic_auth::AuthError::InvalidStateParam) => {
            Ok(Redirect::to(&format!("{dashboard}?error=invalid_state")).into_response())
        }
        Err(err) => {
            tracing::error!(platform = %platform, error = %err, "platform callback failed");
            Ok(Redirect::to(&format!("{dashboard}?error=connection_failed")).into_response())
        }
    }
}

/// Refresh the platform access token for the authenticated account.
///
/// # Endpoint
///
/// ```text
/// POST /platforms/:platform/refresh    (Bearer session)
/// ```
///
/// # Errors
///
/// Returns 401 without a valid session, 404 if the platform is not
/// connected, 400 if the refresh token was rejected (the user must
/// re-connect).
pub async fn refresh<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    Path(platform_str): Path<String>,
    BearerToken(session): BearerToken,
) -> Result<Json<RefreshResponse>, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let platform = Platform::parse(&platform_str)?;
    let user_id = gateway.sessions().verify(&session)?;

    let refreshed = gateway.refresh(&user_id, platform).await?;

    Ok(Json(RefreshResponse {
        access_token: refreshed.access_token,
        expires_in: refreshed.expires_in,
    }))
}
