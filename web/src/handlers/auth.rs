//! SSO authentication handlers.

use super::{AuthStartResponse, Gateway};
use crate::error::AppError;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use multimusic_auth::providers::{AccountStore, IdentityProvider, PlatformGateway};
use multimusic_auth::SsoProvider;
use serde::Deserialize;

/// SSO callback query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    /// Authorization code from the provider.
    pub code: Option<String>,

    /// State parameter echoed back by the provider.
    pub state: Option<String>,

    /// Error reported by the provider (user denied, etc.).
    pub error: Option<String>,
}

/// Initiate an SSO login.
///
/// # Endpoint
///
/// ```text
/// POST /auth/:provider/login
/// ```
///
/// Returns the provider authorization URL and a state parameter; no auth
/// required.
///
/// # Errors
///
/// Returns 400 for an unknown provider.
pub async fn login<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    Path(provider_str): Path<String>,
) -> Result<Json<AuthStartResponse>, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let provider = SsoProvider::parse(&provider_str)?;
    let start = gateway.begin_login(provider).await?;

    Ok(Json(AuthStartResponse {
        auth_url: start.auth_url,
        state: start.state,
    }))
}

/// Handle the SSO callback: resolve or create the account and redirect to
/// the frontend with a session credential.
///
/// # Endpoint
///
/// ```text
/// GET /auth/:provider/callback?code=...&state=...
/// ```
///
/// This endpoint is browser-facing: failures redirect to the frontend with
/// an `error` query parameter instead of returning JSON.
///
/// # Errors
///
/// Returns 400 for an unknown provider; everything else is reported via
/// the redirect.
pub async fn callback<I, P, S>(
    State(gateway): State<Gateway<I, P, S>>,
    Path(provider_str): Path<String>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Response, AppError>
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    let provider = SsoProvider::parse(&provider_str)?;
    let frontend = &gateway.config().frontend_url;

    if let Some(error) = query.error {
        tracing::warn!(provider = %provider, error = %error, "SSO callback reported an error");
        return Ok(Redirect::to(&format!("{frontend}?error={error}")).into_response());
    }

    let Some(code) = query.code else {
        return Ok(Redirect::to(&format!("{frontend}?error=no_code")).into_response());
    };

    match gateway.complete_login(provider, &code).await {
        Ok(login) => {
            let url = format!("{frontend}?session={}", login.session_token);
            Ok(Redirect::to(&url).into_response())
        }
        Err(err) => {
            tracing::error!(provider = %provider, error = %err, "SSO callback failed");
            Ok(Redirect::to(&format!("{frontend}?error=callback_failed")).into_response())
        }
    }
}
