//! Gateway environment.
//!
//! Bundles every external dependency of the gateway (identity provider,
//! platform gateway, record store) together with the token cipher, session
//! issuer, and configuration. The service operations in [`crate::linker`],
//! [`crate::connector`], and [`crate::accounts`] are implemented on this
//! type.

use crate::codec::TokenCipher;
use crate::config::GatewayConfig;
use crate::error::Result;
use crate::providers::{AccountStore, IdentityProvider, PlatformGateway};
use crate::session::SessionIssuer;

/// The authentication gateway.
///
/// # Type Parameters
///
/// - `I`: SSO identity provider
/// - `P`: streaming platform gateway
/// - `S`: account record store
///
/// # Example
///
/// ```no_run
/// use multimusic_auth::config::GatewayConfig;
/// use multimusic_auth::gateway::AuthGateway;
/// use multimusic_auth::mocks::{MemoryAccountStore, MockIdentityProvider, MockPlatformGateway};
///
/// # fn main() -> multimusic_auth::Result<()> {
/// let config = GatewayConfig::default();
/// let gateway = AuthGateway::new(
///     MockIdentityProvider::new(),
///     MockPlatformGateway::new(),
///     MemoryAccountStore::new(),
///     config,
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthGateway<I, P, S>
where
    I: IdentityProvider + Clone,
    P: PlatformGateway + Clone,
    S: AccountStore + Clone,
{
    /// SSO identity provider.
    pub(crate) identity: I,

    /// Streaming platform gateway.
    pub(crate) platforms: P,

    /// Account record store.
    pub(crate) store: S,

    /// Token cipher (AES-256-GCM).
    pub(crate) cipher: TokenCipher,

    /// Session credential issuer.
    pub(crate) sessions: SessionIssuer,

    /// Gateway configuration.
    pub(crate) config: GatewayConfig,
}

impl<I, P, S> AuthGateway<I, P, S>
where
    I: IdentityProvider + Clone,
    P: PlatformGateway + Clone,
    S: AccountStore + Clone,
{
    /// Create a new gateway.
    ///
    /// The token cipher and session issuer are built from the configured
    /// encryption key and session secret.
    ///
    /// # Errors
    ///
    /// Returns error if the encryption key is not exactly 32 bytes.
    pub fn new(identity: I, platforms: P, store: S, config: GatewayConfig) -> Result<Self> {
        let cipher = TokenCipher::new(&config.encryption_key)?;
        let sessions = SessionIssuer::new(&config.session_secret, config.session_ttl);

        Ok(Self {
            identity,
            platforms,
            store,
            cipher,
            sessions,
            config,
        })
    }

    /// The session issuer (for adapters that verify bearer credentials).
    #[must_use]
    pub const fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    /// The gateway configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
