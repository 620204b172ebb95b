//! Per-request authentication tokens.
//!
//! Every request carries a token proving knowledge of the shared secret. The token is the
//! current Unix time in seconds, sealed with AES-256-GCM under the secret and laid out as
//! `base64(nonce ‖ tag ‖ ciphertext)`.

use std::time::{SystemTime, UNIX_EPOCH};

use aes_gcm::{
    Aes256Gcm,
    aead::{AeadCore, AeadInPlace, KeyInit, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use log::error;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

const KEY_LEN: usize = 32;

/// Generates authentication tokens from a base64-encoded shared secret.
///
/// # Example
///
/// ```
/// use amaran_lights_rs::TokenGenerator;
///
/// // 32 zero bytes
/// let tokens = TokenGenerator::new("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=");
/// assert!(!tokens.generate().is_empty());
///
/// let broken = TokenGenerator::new("c2hvcnQ=");
/// assert!(broken.generate().is_empty());
/// ```
#[derive(Clone)]
pub struct TokenGenerator {
    secret: String,
}

impl std::fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGenerator").finish_non_exhaustive()
    }
}

impl TokenGenerator {
    pub fn new(secret: &str) -> Self {
        TokenGenerator {
            secret: secret.to_string(),
        }
    }

    /// Generate a token for the current second.
    ///
    /// Returns an empty string if the secret is unusable or encryption fails. An empty token
    /// must never be sent.
    pub fn generate(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        match self.generate_at(now) {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to generate token: {e}");
                String::new()
            }
        }
    }

    /// Generate a token for the given Unix timestamp (seconds).
    pub fn generate_at(&self, unix_secs: u64) -> Result<String> {
        let key = self.key()?;
        let cipher = Aes256Gcm::new(&key.into());
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let mut buffer = unix_secs.to_string().into_bytes();
        let tag = cipher
            .encrypt_in_place_detached(&nonce, b"", &mut buffer)
            .map_err(|_| Error::Encryption)?;

        let mut combined = Vec::with_capacity(nonce.len() + tag.len() + buffer.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&tag);
        combined.extend_from_slice(&buffer);

        Ok(BASE64.encode(combined))
    }

    fn key(&self) -> Result<[u8; KEY_LEN]> {
        let raw = BASE64
            .decode(self.secret.trim())
            .map_err(Error::InvalidSecret)?;
        <[u8; KEY_LEN]>::try_from(raw.as_slice()).map_err(|_| Error::InvalidKeyLength(raw.len()))
    }
}
