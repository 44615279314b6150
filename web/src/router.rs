//! Gateway router composition.
//!
//! Composes all gateway handlers into a single Axum router. This is the
//! whole HTTP surface; both the local server binary and a serverless
//! adapter serve the same router.

use crate::handlers::{auth, health, platforms, user};
use axum::{
    Router,
    routing::{delete, get, post},
};
use multimusic_auth::AuthGateway;
use multimusic_auth::providers::{AccountStore, IdentityProvider, PlatformGateway};
use std::sync::Arc;

/// Create the gateway router with all endpoints.
///
/// # Routes
///
/// ## SSO Authentication
/// - `POST /auth/:provider/login` - Start an SSO login
/// - `GET /auth/:provider/callback` - Handle the SSO callback
///
/// ## Platform Connections
/// - `POST /platforms/:platform/connect` - Start a platform connection
/// - `GET /platforms/:platform/callback` - Handle the platform callback
/// - `POST /platforms/:platform/refresh` - Refresh the platform access token
///
/// ## Account
/// - `GET /user/profile` - Account profile
/// - `GET /user/auth-providers` - Linked SSO providers
/// - `GET /user/platforms` - Connected platforms
/// - `DELETE /user/platforms/:platform` - Disconnect a platform
///
/// ## Operational
/// - `GET /health` - Liveness probe
///
/// # Example
///
/// ```rust,ignore
/// let gateway = Arc::new(AuthGateway::new(identity, platforms, store, config)?);
/// let app = gateway_router(gateway).layer(TraceLayer::new_for_http());
/// axum::serve(listener, app).await?;
/// ```
pub fn gateway_router<I, P, S>(gateway: Arc<AuthGateway<I, P, S>>) -> Router
where
    I: IdentityProvider + Clone + 'static,
    P: PlatformGateway + Clone + 'static,
    S: AccountStore + Clone + 'static,
{
    Router::new()
        // SSO authentication routes
        .route("/auth/:provider/login", post(auth::login::<I, P, S>))
        .route("/auth/:provider/callback", get(auth::callback::<I, P, S>))
        // Platform connection routes
        .route(
            "/platforms/:platform/connect",
            post(platforms::connect::<I, P, S>),
        )
        .route(
            "/platforms/:platform/callback",
            get(platforms::callback::<I, P, S>),
        )
        .route(
            "/platforms/:platform/refresh",
            post(platforms::refresh::<I, P, S>),
        )
        // Account routes
        .route("/user/profile", get(user::profile::<I, P, S>))
        .route("/user/auth-providers", get(user::auth_providers::<I, P, S>))
        .route("/user/platforms", get(user::platforms::<I, P, S>))
        .route(
            "/user/platforms/:platform",
            delete(user::disconnect_platform::<I, P, S>),
        )
        // Operational routes
        .route("/health", get(health::health))
        .with_state(gateway)
}
