//! HTTP handlers for the gateway routes.

pub mod auth;
pub mod health;
pub mod platforms;
pub mod user;

use multimusic_auth::AuthGateway;
use std::sync::Arc;

/// Shared handler state: the gateway behind an `Arc`.
pub type Gateway<I, P, S> = Arc<AuthGateway<I, P, S>>;

/// Start-of-flow response for both SSO logins and platform connections.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStartResponse {
    /// Authorization URL to redirect the user to.
    pub auth_url: String,

    /// State parameter for the callback.
    pub state: String,
}
