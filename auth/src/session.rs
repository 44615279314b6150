//! Stateless session credentials.
//!
//! Sessions are HS256 JSON Web Tokens carrying the account id, issuance
//! time, and expiry. Nothing is persisted: validity is fully determined by
//! the signature and the expiry check.

use crate::error::{AuthError, Result};
use crate::state::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a session credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    /// Internal account id.
    sub: String,
    /// Issued-at (seconds since epoch).
    iat: i64,
    /// Expiry (seconds since epoch).
    exp: i64,
}

/// Issues and verifies session credentials.
///
/// Constructed once at process start from the configured signing secret and
/// session lifetime, then shared read-only by every request.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionIssuer {
    /// Create an issuer from the signing secret and session lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a session credential for an account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if signing fails.
    pub fn issue(&self, user_id: &UserId) -> Result<String> {
        self.issue_expiring_at(user_id, Utc::now() + self.ttl)
    }

    /// Issue a credential with an explicit expiry (used by tests to mint
    /// already-expired credentials).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if signing fails.
    pub fn issue_expiring_at(
        &self,
        user_id: &UserId,
        expires_at: chrono::DateTime<Utc>,
    ) -> Result<String> {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("failed to sign session: {e}")))
    }

    /// Verify a session credential and return the account id it was issued
    /// for.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionExpired`] when the credential is past its
    /// expiry, [`AuthError::InvalidSession`] on a bad signature or malformed
    /// token.
    pub fn verify(&self, credential: &str) -> Result<UserId> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<SessionClaims>(
            credential,
            &self.decoding_key,
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
            _ => AuthError::InvalidSession,
        })?;

        Ok(UserId::new(data.claims.sub))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer() -> SessionIssuer {
        SessionIssuer::new("test-session-secret", Duration::days(7))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = issuer();
        let user_id = UserId::generate();

        let credential = issuer.issue(&user_id).unwrap();
        assert_eq!(issuer.verify(&credential).unwrap(), user_id);
    }

    #[test]
    fn test_expired_credential_rejected() {
        let issuer = issuer();
        let user_id = UserId::generate();

        let credential = issuer
            .issue_expiring_at(&user_id, Utc::now() - Duration::hours(1))
            .unwrap();

        assert_eq!(
            issuer.verify(&credential),
            Err(AuthError::SessionExpired)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let user_id = UserId::generate();
        let credential = issuer().issue(&user_id).unwrap();

        let other = SessionIssuer::new("a-different-secret", Duration::days(7));
        assert_eq!(other.verify(&credential), Err(AuthError::InvalidSession));
    }

    #[test]
    fn test_any_byte_flip_invalidates() {
        let issuer = issuer();
        let credential = issuer.issue(&UserId::generate()).unwrap();

        // Flip one character in each JWT segment in turn.
        let bytes = credential.as_bytes();
        for index in [5, credential.find('.').unwrap() + 2, credential.len() - 2] {
            let mut altered = bytes.to_vec();
            altered[index] = if altered[index] == b'A' { b'B' } else { b'A' };
            let altered = String::from_utf8(altered).unwrap();

            assert!(
                issuer.verify(&altered).is_err(),
                "altered credential at byte {index} should not verify"
            );
        }
    }

    #[test]
    fn test_garbage_credential_rejected() {
        assert_eq!(
            issuer().verify("not-a-credential"),
            Err(AuthError::InvalidSession)
        );
    }
}
