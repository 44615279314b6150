//! Error types for the authentication gateway.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the authentication gateway.
///
/// Every failure mode surfaces as one of these variants. None of them are
/// retried internally; callers decide whether to prompt a new login, a
/// platform re-connection, or simply retry at the edge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Provider Exchange Errors
    // ═══════════════════════════════════════════════════════════

    /// Authorization code exchange with a provider failed.
    ///
    /// Codes are single-use, so the caller must restart the login or
    /// connection flow rather than retry.
    #[error("{provider} code exchange failed: {reason}")]
    ProviderExchangeFailed {
        /// Provider or platform name
        provider: String,
        /// Failure detail from the provider
        reason: String,
    },

    /// Fetching identity or account details from a provider failed.
    #[error("{provider} user info request failed: {reason}")]
    UserInfoFailed {
        /// Provider or platform name
        provider: String,
        /// Failure detail from the provider
        reason: String,
    },

    /// The provider reported an unverified email address.
    #[error("provider email is not verified")]
    EmailNotVerified,

    /// Unknown SSO provider name.
    #[error("unknown SSO provider: {0}")]
    UnknownProvider(String),

    /// Unknown streaming platform name.
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    // ═══════════════════════════════════════════════════════════
    // Token Lifecycle Errors
    // ═══════════════════════════════════════════════════════════

    /// The platform rejected the stored refresh token, or no refresh token
    /// is available. The caller must prompt re-connection of the platform.
    #[error("{platform} token refresh failed: {reason}")]
    TokenRefreshFailed {
        /// Platform name
        platform: String,
        /// Failure detail
        reason: String,
    },

    /// A stored token could not be decrypted (key mismatch or corrupted
    /// ciphertext). Fatal for that token; forces re-connection.
    #[error("token decryption failed")]
    DecryptionFailed,

    /// No connection exists for the requested platform.
    #[error("{platform} is not connected")]
    PlatformNotConnected {
        /// Platform name
        platform: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Session Errors
    // ═══════════════════════════════════════════════════════════

    /// Session credential has expired.
    #[error("session has expired")]
    SessionExpired,

    /// Session credential is malformed or carries a bad signature.
    #[error("invalid session credential")]
    InvalidSession,

    // ═══════════════════════════════════════════════════════════
    // Request Errors
    // ═══════════════════════════════════════════════════════════

    /// The OAuth state parameter could not be parsed.
    #[error("invalid state parameter")]
    InvalidStateParam,

    /// No account record exists for the given account id.
    #[error("account not found")]
    AccountNotFound,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Record store operation failed.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Record (de)serialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Internal error (configuration, key setup, URL construction).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Returns `true` if this error should be shown to the user as an
    /// authentication failure (HTTP 401 territory).
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::ProviderExchangeFailed { .. }
                | Self::SessionExpired
                | Self::InvalidSession
                | Self::EmailNotVerified
        )
    }

    /// Returns `true` if this error means the platform connection is no
    /// longer usable and the user must re-connect it.
    #[must_use]
    pub const fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::TokenRefreshFailed { .. } | Self::DecryptionFailed
        )
    }
}
