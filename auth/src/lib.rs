//! # MultiMusic Authentication Gateway
//!
//! A thin authentication gateway for the MultiMusic platform: it exchanges
//! OAuth authorization codes with SSO providers and music-streaming
//! platforms, stores the resulting tokens encrypted, and issues stateless
//! session credentials.
//!
//! ## Components
//!
//! - **Identity linking** ([`linker`]): maps external SSO identities
//!   (Google) to one internal account.
//! - **Platform connections** ([`connector`]): links streaming accounts
//!   (Spotify, YouTube Music, SoundCloud) to an account and manages their
//!   token lifecycle.
//! - **Token codec** ([`codec`]): AES-256-GCM encryption for tokens at
//!   rest.
//! - **Session issuer** ([`session`]): signed, stateless session
//!   credentials.
//! - **Account store** ([`providers::AccountStore`]): key-value record
//!   persistence, Redis-backed in production.
//!
//! ## Example: full login and connection flow
//!
//! ```rust,ignore
//! use multimusic_auth::{AuthGateway, Platform, SsoProvider};
//!
//! let gateway = AuthGateway::new(identity, platforms, store, config)?;
//!
//! // 1. SSO login
//! let start = gateway.begin_login(SsoProvider::Google).await?;
//! // ... user authorizes, provider redirects back with a code ...
//! let login = gateway.complete_login(SsoProvider::Google, &code).await?;
//!
//! // 2. Connect a platform with the issued session
//! let user_id = gateway.sessions().verify(&login.session_token)?;
//! let start = gateway.begin_connect(&user_id, Platform::Spotify).await?;
//! // ... platform redirects back ...
//! gateway.complete_connect(Platform::Spotify, &code, &start.state).await?;
//! ```

// Public modules
pub mod accounts;
pub mod codec;
pub mod config;
pub mod connector;
pub mod error;
pub mod gateway;
pub mod linker;
pub mod providers;
pub mod session;
pub mod state;
pub mod stores;
pub mod utils;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use accounts::{ConnectedPlatform, LinkedProvider};
pub use codec::TokenCipher;
pub use config::{GatewayConfig, OAuthClient};
pub use connector::{ConnectStart, RefreshedAccess};
pub use error::{AuthError, Result};
pub use gateway::AuthGateway;
pub use linker::{LoginSession, LoginStart};
pub use session::SessionIssuer;
pub use state::{
    IdentityLink, Platform, PlatformConnection, Profile, SsoProvider, UserId,
};
