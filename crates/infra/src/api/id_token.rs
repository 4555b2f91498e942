//! ID token signature verification and claim decoding.
//!
//! Only the signature is checked here; claim values and timestamps are
//! validated later against the login attempt by the core validator.

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use linesdk_domain::{IdTokenClaims, JwkSet, LineIdToken};
use thiserror::Error;

/// Why an ID token could not be turned into a [`LineIdToken`].
#[derive(Debug, Error)]
pub enum IdTokenError {
    #[error("Malformed ID token: {0}")]
    Malformed(String),

    #[error("No signing key found for kid '{0}'")]
    KeyNotFound(String),

    #[error("Unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("ID token signature verification failed: {0}")]
    InvalidSignature(String),

    #[error("Failed to get JWK set: {0}")]
    JwkSetUnavailable(String),
}

/// Pick the published key that signed `raw_token`.
pub fn signing_key(jwk_set: &JwkSet, raw_token: &str) -> Result<DecodingKey, IdTokenError> {
    let header = decode_header(raw_token).map_err(|e| IdTokenError::Malformed(e.to_string()))?;
    let key_id = header.kid.unwrap_or_default();
    let jwk = jwk_set
        .find_by_key_id(&key_id)
        .ok_or_else(|| IdTokenError::KeyNotFound(key_id.clone()))?;

    match jwk.alg.as_deref() {
        Some("ES256") => {
            let (Some(x), Some(y)) = (jwk.x.as_deref(), jwk.y.as_deref()) else {
                return Err(IdTokenError::InvalidKey(format!("EC key '{key_id}' lacks x/y")));
            };
            DecodingKey::from_ec_components(x, y)
                .map_err(|e| IdTokenError::InvalidKey(e.to_string()))
        }
        other => Err(IdTokenError::UnsupportedAlgorithm(other.unwrap_or_default().to_owned())),
    }
}

/// Verify the ES256 signature of `raw_token` and map its claims.
pub fn verify_and_decode(raw_token: &str, key: &DecodingKey) -> Result<LineIdToken, IdTokenError> {
    let mut validation = Validation::new(Algorithm::ES256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<IdTokenClaims>(raw_token, key, &validation)
        .map_err(|e| IdTokenError::InvalidSignature(e.to_string()))?;

    LineIdToken::from_claims(raw_token, data.claims)
        .map_err(|e| IdTokenError::Malformed(e.to_string()))
}
