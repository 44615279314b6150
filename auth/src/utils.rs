//! Utility functions for the gateway.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a random URL-safe state token (CSRF protection).
///
/// 32 bytes of randomness, base64url-encoded without padding.
#[must_use]
pub fn generate_state_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a PKCE `(code_verifier, code_challenge)` pair.
///
/// The verifier is 64 random bytes base64url-encoded; the challenge is the
/// base64url-encoded SHA-256 of the verifier (method `S256`).
#[must_use]
pub fn generate_pkce_pair() -> (String, String) {
    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    let verifier = URL_SAFE_NO_PAD.encode(bytes);

    let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

    (verifier, challenge)
}

/// Derive a display name from an email address.
///
/// Used when an SSO provider supplies no name: the local part of the email
/// stands in.
#[must_use]
pub fn display_name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_tokens_are_unique() {
        let tokens: std::collections::HashSet<_> =
            (0..10).map(|_| generate_state_token()).collect();
        assert_eq!(tokens.len(), 10);
    }

    #[test]
    fn test_state_token_is_url_safe() {
        let token = generate_state_token();
        assert!(token.len() > 20);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_pkce_challenge_matches_verifier() {
        let (verifier, challenge) = generate_pkce_pair();

        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        assert_eq!(challenge, expected);

        // RFC 7636: verifier must be 43-128 characters
        assert!(verifier.len() >= 43 && verifier.len() <= 128);
    }

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("jane@example.com"), "jane");
        assert_eq!(display_name_from_email("no-at-sign"), "no-at-sign");
    }
}
