//! AES-256-GCM encryption with per-install key derivation.
//!
//! - [`EncryptionService`]: AES-256-GCM encryption/decryption
//! - [`EncryptedData`]: serializable sealed payload
//! - Argon2 key derivation from an install secret and a persisted salt
//!
//! ## Usage
//!
//! ```rust
//! use linesdk_common::crypto::encryption::EncryptionService;
//! use linesdk_common::crypto::StringCipher;
//!
//! let salt = EncryptionService::generate_salt();
//! let service = EncryptionService::from_install_secret("device-secret", &salt)?;
//!
//! let sealed = service.encrypt("access-token")?;
//! assert_eq!(service.decrypt(&sealed)?, "access-token");
//! # Ok::<(), linesdk_common::error::CommonError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::Argon2;
use base64::engine::general_purpose::{STANDARD as BASE64, STANDARD_NO_PAD};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::StringCipher;
use crate::error::{CommonError, CommonResult};

const ALGORITHM: &str = "AES-256-GCM";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const SALT_LEN: usize = 16;

/// Sealed payload: nonce + ciphertext (tag appended by AES-GCM).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub algorithm: String,
}

/// AES-GCM encryption service keyed once per install.
pub struct EncryptionService {
    key: Vec<u8>,
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("key", &"[REDACTED]")
            .field("algorithm", &ALGORITHM)
            .finish()
    }
}

impl Drop for EncryptionService {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl EncryptionService {
    /// Create a new encryption service from a raw 32-byte key.
    pub fn new(key: Vec<u8>) -> CommonResult<Self> {
        if key.len() != KEY_LEN {
            return Err(CommonError::validation("key", "Encryption key must be exactly 32 bytes"));
        }

        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|e| {
            CommonError::crypto("init", format!("Failed to create encryption cipher: {e}"))
        })?;

        Ok(Self { key, cipher })
    }

    /// Derive the key from an install secret and a base64 salt using Argon2.
    ///
    /// The same secret and salt always yield the same key, so the salt must be
    /// persisted next to the data it protects.
    pub fn from_install_secret(secret: &str, salt: &str) -> CommonResult<Self> {
        let salt_bytes = STANDARD_NO_PAD
            .decode(salt)
            .map_err(|e| CommonError::validation("salt", format!("Invalid salt encoding: {e}")))?;
        if salt_bytes.len() < 8 {
            return Err(CommonError::validation("salt", "Salt must be at least 8 bytes"));
        }

        let mut key = vec![0u8; KEY_LEN];
        Argon2::default()
            .hash_password_into(secret.as_bytes(), &salt_bytes, &mut key)
            .map_err(|e| CommonError::crypto("derive", format!("Key derivation failed: {e}")))?;

        Self::new(key)
    }

    /// Generate a random 32-byte symmetric key.
    pub fn generate_key() -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    /// Generate a fresh base64 salt for [`Self::from_install_secret`].
    pub fn generate_salt() -> String {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        STANDARD_NO_PAD.encode(salt)
    }

    /// Encrypt bytes into an `EncryptedData` payload.
    pub fn encrypt_bytes(&self, data: &[u8]) -> CommonResult<EncryptedData> {
        let nonce_bytes = Self::generate_nonce();
        let ciphertext = self
            .cipher
            .encrypt(&Nonce::from(nonce_bytes), data)
            .map_err(|e| CommonError::crypto("encrypt", format!("Encryption failed: {e}")))?;

        Ok(EncryptedData {
            nonce: nonce_bytes.to_vec(),
            ciphertext,
            algorithm: ALGORITHM.to_string(),
        })
    }

    /// Decrypt an [`EncryptedData`] payload back into raw bytes.
    pub fn decrypt_bytes(&self, encrypted: &EncryptedData) -> CommonResult<Vec<u8>> {
        if encrypted.algorithm != ALGORITHM {
            return Err(CommonError::crypto(
                "decrypt",
                format!("Unsupported algorithm: {}", encrypted.algorithm),
            ));
        }

        let nonce_array: [u8; NONCE_LEN] = encrypted.nonce.as_slice().try_into().map_err(|_| {
            CommonError::crypto("decrypt", "Nonce must be exactly 12 bytes for AES-256-GCM")
        })?;

        self.cipher
            .decrypt(&Nonce::from(nonce_array), encrypted.ciphertext.as_ref())
            .map_err(|e| CommonError::crypto("decrypt", format!("Decryption failed: {e}")))
    }

    fn generate_nonce() -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }
}

impl StringCipher for EncryptionService {
    fn encrypt(&self, plain_text: &str) -> CommonResult<String> {
        let encrypted = self.encrypt_bytes(plain_text.as_bytes())?;
        let serialized = serde_json::to_vec(&encrypted).map_err(|e| {
            CommonError::crypto("encrypt", format!("Failed to serialize sealed payload: {e}"))
        })?;
        Ok(BASE64.encode(serialized))
    }

    fn decrypt(&self, cipher_text: &str) -> CommonResult<String> {
        let decoded = BASE64
            .decode(cipher_text)
            .map_err(|e| CommonError::crypto("decrypt", format!("Base64 decode failed: {e}")))?;
        let encrypted: EncryptedData = serde_json::from_slice(&decoded).map_err(|e| {
            CommonError::crypto("decrypt", format!("Malformed sealed payload: {e}"))
        })?;
        let bytes = self.decrypt_bytes(&encrypted)?;
        String::from_utf8(bytes)
            .map_err(|e| CommonError::crypto("decrypt", format!("Plaintext is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for crypto::encryption.
    use super::*;

    /// Validates `EncryptionService::generate_key` behavior for the generate
    /// key has correct length scenario.
    ///
    /// Assertions:
    /// - Confirms `key.len()` equals `32`.
    #[test]
    fn generate_key_has_correct_length() {
        let key = EncryptionService::generate_key();
        assert_eq!(key.len(), 32);
    }

    /// Validates `EncryptionService::new` behavior for the new service rejects
    /// invalid key size scenario.
    ///
    /// Assertions:
    /// - Ensures `result.is_err()` evaluates to true.
    #[test]
    fn new_service_rejects_invalid_key_size() {
        let result = EncryptionService::new(vec![0; 16]);
        assert!(result.is_err());
    }

    /// Validates the string round trip through the `StringCipher` surface.
    ///
    /// Assertions:
    /// - Confirms `decrypted` equals the original text.
    /// - Ensures the sealed form does not leak the plaintext.
    #[test]
    fn string_round_trip() {
        let service = EncryptionService::new(EncryptionService::generate_key()).unwrap();

        let sealed = service.encrypt("refresh-token-value").unwrap();
        assert!(!sealed.contains("refresh-token-value"));
        assert_eq!(service.decrypt(&sealed).unwrap(), "refresh-token-value");
    }

    /// Validates that the same secret and salt derive the same key.
    ///
    /// Assertions:
    /// - Confirms data sealed by one derived service opens with a second one.
    #[test]
    fn install_secret_derivation_is_deterministic() {
        let salt = EncryptionService::generate_salt();
        let first = EncryptionService::from_install_secret("secret", &salt).unwrap();
        let second = EncryptionService::from_install_secret("secret", &salt).unwrap();

        let sealed = first.encrypt("payload").unwrap();
        assert_eq!(second.decrypt(&sealed).unwrap(), "payload");
    }

    /// Validates that a foreign key cannot open a payload.
    ///
    /// Assertions:
    /// - Ensures the error is classified as a crypto failure.
    #[test]
    fn decrypt_with_other_key_is_crypto_error() {
        let service1 = EncryptionService::new(EncryptionService::generate_key()).unwrap();
        let service2 = EncryptionService::new(EncryptionService::generate_key()).unwrap();

        let sealed = service1.encrypt("payload").unwrap();
        let err = service2.decrypt(&sealed).unwrap_err();
        assert!(matches!(err, CommonError::Crypto { .. }));
    }

    /// Validates rejection of garbage input.
    ///
    /// Assertions:
    /// - Ensures non-base64 input is a crypto failure.
    #[test]
    fn decrypt_rejects_garbage() {
        let service = EncryptionService::new(EncryptionService::generate_key()).unwrap();
        assert!(matches!(service.decrypt("not base64 !!").unwrap_err(), CommonError::Crypto { .. }));
    }

    #[test]
    fn short_salt_is_rejected() {
        let salt = STANDARD_NO_PAD.encode([1u8; 4]);
        assert!(EncryptionService::from_install_secret("secret", &salt).is_err());
    }
}
