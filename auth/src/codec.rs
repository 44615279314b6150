//! Token encryption at rest.
//!
//! Platform access/refresh tokens are encrypted with AES-256-GCM before
//! they reach the record store, and decrypted on the way back out. The
//! stored form is `base64(nonce ‖ ciphertext)` with a fresh random 96-bit
//! nonce per encryption.

use crate::error::{AuthError, Result};
use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::sync::Arc;

/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// Symmetric token cipher.
///
/// One instance is created at process start from the configured 32-byte key
/// and shared read-only by every request.
#[derive(Clone)]
pub struct TokenCipher {
    /// AES-256-GCM cipher. Wrapped in `Arc` for cheap cloning; each
    /// `encrypt` call generates a fresh nonce, so sharing is safe.
    cipher: Arc<Aes256Gcm>,
}

impl TokenCipher {
    /// Create a cipher from a 32-byte AES-256 key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if the key is not exactly
    /// 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != 32 {
            return Err(AuthError::InternalError(
                "encryption key must be exactly 32 bytes (256 bits)".to_string(),
            ));
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| {
            AuthError::InternalError(format!("failed to initialize AES-256-GCM cipher: {e}"))
        })?;

        Ok(Self {
            cipher: Arc::new(cipher),
        })
    }

    /// Encrypt a token for storage.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InternalError`] if encryption fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| AuthError::InternalError(format!("encryption failed: {e}")))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypt a stored token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DecryptionFailed`] on key mismatch, corrupted
    /// ciphertext, or malformed encoding. This is fatal for the token and
    /// forces re-connection of the platform.
    pub fn decrypt(&self, encrypted: &str) -> Result<String> {
        let combined = BASE64
            .decode(encrypted)
            .map_err(|_| AuthError::DecryptionFailed)?;

        if combined.len() < NONCE_LEN {
            return Err(AuthError::DecryptionFailed);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::clone_from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(&nonce, ciphertext)
            .map_err(|_| AuthError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| AuthError::DecryptionFailed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_cipher() -> TokenCipher {
        TokenCipher::new(&[42u8; 32]).unwrap()
    }

    #[test]
    fn test_key_must_be_32_bytes() {
        assert!(TokenCipher::new(&[0u8; 16]).is_err());
        assert!(TokenCipher::new(&[0u8; 33]).is_err());
        assert!(TokenCipher::new(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_round_trip() {
        let cipher = test_cipher();

        for token in ["", "x", "BQDa3…access-token", "a token with spaces"] {
            let encrypted = cipher.encrypt(token).unwrap();
            assert_eq!(cipher.decrypt(&encrypted).unwrap(), token);
        }
    }

    #[test]
    fn test_ciphertext_hides_plaintext() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("secret_access_token").unwrap();
        assert!(!encrypted.contains("secret_access_token"));
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let cipher = test_cipher();
        let a = cipher.encrypt("same input").unwrap();
        let b = cipher.encrypt("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("secret").unwrap();

        let mut bytes = BASE64.decode(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);

        assert_eq!(
            cipher.decrypt(&tampered),
            Err(AuthError::DecryptionFailed)
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let encrypted = test_cipher().encrypt("secret").unwrap();
        let other = TokenCipher::new(&[7u8; 32]).unwrap();

        assert_eq!(other.decrypt(&encrypted), Err(AuthError::DecryptionFailed));
    }

    #[test]
    fn test_garbage_input_rejected() {
        let cipher = test_cipher();
        assert_eq!(
            cipher.decrypt("not base64 at all!!!"),
            Err(AuthError::DecryptionFailed)
        );
        assert_eq!(cipher.decrypt("AAAA"), Err(AuthError::DecryptionFailed));
    }
}
