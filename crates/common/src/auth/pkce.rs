//! PKCE (Proof Key for Code Exchange) for the LINE authorization code flow.
//!
//! Implements RFC 7636 with the `S256` method only. A fresh [`PkceCode`] is
//! generated per login attempt; the challenge goes out with the authorization
//! request and the verifier is sent with the token exchange.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::random;

/// Verifier length; RFC 7636 allows 43 to 128 characters.
pub const VERIFIER_LENGTH: usize = 64;

/// Transform applied to the verifier. `plain` is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeChallengeMethod {
    S256,
}

impl CodeChallengeMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
        }
    }
}

/// Compute `BASE64URL(SHA256(ASCII(verifier)))` without padding.
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    let hash = hasher.finalize();
    URL_SAFE_NO_PAD.encode(hash)
}

/// Verifier/challenge pair, immutable once created.
///
/// Serializes as the bare verifier; the challenge is recomputed on restore.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PkceCode {
    verifier: String,
    challenge: String,
}

impl PkceCode {
    /// Generate a new code with a random alphanumeric verifier.
    #[must_use]
    pub fn new_code() -> Self {
        Self::from_verifier(random::alphanumeric(VERIFIER_LENGTH))
    }

    /// Rebuild a code from a previously issued verifier.
    #[must_use]
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = generate_code_challenge(&verifier);
        Self { verifier, challenge }
    }

    #[must_use]
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    #[must_use]
    pub fn challenge_method(&self) -> CodeChallengeMethod {
        CodeChallengeMethod::S256
    }
}

impl fmt::Debug for PkceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkceCode")
            .field("verifier", &"[REDACTED]")
            .field("challenge", &self.challenge)
            .finish()
    }
}

impl From<String> for PkceCode {
    fn from(verifier: String) -> Self {
        Self::from_verifier(verifier)
    }
}

impl From<PkceCode> for String {
    fn from(code: PkceCode) -> Self {
        code.verifier
    }
}
