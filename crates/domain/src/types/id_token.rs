//! OpenID Connect ID token values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LineSdkError, Result};

/// Postal address claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Raw JWT claim set as it appears in the token payload.
///
/// Timestamps are seconds since the epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amr: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name_pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name_pronunciation: Option<String>,
}

/// Decoded, signature-checked ID token. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineIdToken {
    /// The compact JWS the claims were decoded from.
    pub raw_string: String,
    pub issuer: String,
    pub subject: String,
    pub audience: String,
    pub expires_at: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
    pub auth_time: Option<DateTime<Utc>>,
    pub nonce: Option<String>,
    pub amr: Vec<String>,
    pub name: Option<String>,
    pub picture_url: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<String>,
    pub address: Option<Address>,
    pub given_name: Option<String>,
    pub given_name_pronunciation: Option<String>,
    pub middle_name: Option<String>,
    pub family_name: Option<String>,
    pub family_name_pronunciation: Option<String>,
}

fn timestamp(claim: &str, seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or_else(|| LineSdkError::InvalidInput(format!("'{claim}' is out of range: {seconds}")))
}

impl LineIdToken {
    /// Build the token value from its compact form and decoded claims.
    pub fn from_claims(raw_string: impl Into<String>, claims: IdTokenClaims) -> Result<Self> {
        Ok(Self {
            raw_string: raw_string.into(),
            expires_at: timestamp("exp", claims.exp)?,
            issued_at: timestamp("iat", claims.iat)?,
            auth_time: claims.auth_time.map(|t| timestamp("auth_time", t)).transpose()?,
            issuer: claims.iss,
            subject: claims.sub,
            audience: claims.aud,
            nonce: claims.nonce,
            amr: claims.amr,
            name: claims.name,
            picture_url: claims.picture,
            phone_number: claims.phone_number,
            email: claims.email,
            gender: claims.gender,
            birthdate: claims.birthdate,
            address: claims.address,
            given_name: claims.given_name,
            given_name_pronunciation: claims.given_name_pronunciation,
            middle_name: claims.middle_name,
            family_name: claims.family_name,
            family_name_pronunciation: claims.family_name_pronunciation,
        })
    }
}
