//! Token encryption.
//!
//! User tokens are encrypted with AES-256-GCM. The stored form is
//! `base64(nonce || ciphertext)` with a fresh 12-byte nonce per call, so two
//! encryptions of the same token never match.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;
use thiserror::Error;

/// AES-256-GCM nonce size (96 bits = 12 bytes)
const NONCE_SIZE: usize = 12;
/// AES-256 key size (256 bits = 32 bytes)
const KEY_SIZE: usize = 32;

/// Errors raised while encrypting or decrypting tokens.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The key is not 32 bytes of hex.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Encryption failed.
    #[error("encryption failed")]
    Encrypt,

    /// The ciphertext is malformed or was not produced with this key.
    #[error("decryption failed: {0}")]
    Decrypt(String),
}

/// Encrypts and decrypts user tokens with a fixed key.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Creates a cipher from a 32-byte key.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                key.len()
            )));
        }
        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Creates a cipher from a key given as 64 hex characters.
    pub fn from_hex_key(key_hex: &str) -> Result<Self, CryptoError> {
        let key = hex::decode(key_hex).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Self::new(&key)
    }

    /// Generates a random key, hex encoded.
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        hex::encode(key)
    }

    /// Encrypts `plaintext`, returning `base64(nonce || ciphertext)`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(sealed))
    }

    /// Decrypts a value produced by [`TokenCipher::encrypt`].
    pub fn decrypt(&self, sealed_b64: &str) -> Result<String, CryptoError> {
        let sealed = BASE64
            .decode(sealed_b64)
            .map_err(|e| CryptoError::Decrypt(format!("invalid base64: {}", e)))?;

        if sealed.len() < NONCE_SIZE {
            return Err(CryptoError::Decrypt(format!(
                "expected at least {} bytes, got {}",
                NONCE_SIZE,
                sealed.len()
            )));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::Decrypt("authentication failed".to_string()))?;

        String::from_utf8(plaintext).map_err(|e| CryptoError::Decrypt(e.to_string()))
    }
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher")
            .field("cipher", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = TokenCipher::from_hex_key(KEY).unwrap();
        let sealed = cipher.encrypt("my-oauth-token").unwrap();

        assert_ne!(sealed, "my-oauth-token");
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "my-oauth-token");
    }

    #[test]
    fn test_layout_is_nonce_then_ciphertext() {
        let cipher = TokenCipher::from_hex_key(KEY).unwrap();
        let sealed = BASE64.decode(cipher.encrypt("abc").unwrap()).unwrap();
        // 12-byte nonce, 3-byte ciphertext, 16-byte tag
        assert_eq!(sealed.len(), NONCE_SIZE + 3 + 16);
    }

    #[test]
    fn test_nonce_is_fresh() {
        let cipher = TokenCipher::from_hex_key(KEY).unwrap();
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = TokenCipher::from_hex_key(KEY).unwrap().encrypt("secret").unwrap();
        let other = TokenCipher::from_hex_key(&TokenCipher::generate_key()).unwrap();
        assert!(matches!(other.decrypt(&sealed), Err(CryptoError::Decrypt(_))));
    }

    #[test]
    fn test_malformed_input_fails() {
        let cipher = TokenCipher::from_hex_key(KEY).unwrap();
        assert!(cipher.decrypt("not base64!").is_err());
        assert!(cipher.decrypt(&BASE64.encode([1u8; 4])).is_err());
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(TokenCipher::from_hex_key("xyz"), Err(CryptoError::InvalidKey(_))));
        assert!(matches!(TokenCipher::new(&[0u8; 16]), Err(CryptoError::InvalidKey(_))));
        assert_eq!(TokenCipher::generate_key().len(), 64);
    }
}
