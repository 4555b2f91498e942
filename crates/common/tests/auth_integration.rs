//! Integration tests for the PKCE primitives.

#![cfg(feature = "platform")]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use linesdk_common::auth::generate_code_challenge;
use linesdk_common::PkceCode;
use sha2::{Digest, Sha256};

/// For every generated code the challenge is the unpadded base64url SHA-256
/// of the verifier.
#[test]
fn challenge_matches_sha256_of_verifier() {
    for _ in 0..32 {
        let code = PkceCode::new_code();
        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(code.verifier().as_bytes()));
        assert_eq!(code.challenge(), expected);
        assert_eq!(generate_code_challenge(code.verifier()), expected);
        assert!(!code.challenge().contains('='));
    }
}

/// The verifier stays inside the RFC 7636 character set and length bounds.
#[test]
fn verifier_respects_rfc7636_bounds() {
    for _ in 0..32 {
        let code = PkceCode::new_code();
        assert!((43..=128).contains(&code.verifier().len()));
        assert!(code.verifier().bytes().all(|b| b.is_ascii_alphanumeric()));
    }
}
