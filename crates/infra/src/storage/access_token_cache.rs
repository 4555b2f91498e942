//! Encrypted per-channel access token cache.
//!
//! Layout: namespace `com.linecorp.linesdk.accesstoken.<channelId>` with the
//! fields `accessToken`, `expiresIn`, `issuedClientTime` and `refreshToken`,
//! each encrypted on its own.

use std::collections::BTreeMap;
use std::sync::Arc;

use linesdk_common::StringCipher;
use linesdk_core::AccessTokenStore;
use linesdk_domain::constants::ACCESS_TOKEN_CACHE_NAMESPACE_PREFIX;
use linesdk_domain::{InternalAccessToken, LineSdkError};
use thiserror::Error;
use tracing::{debug, warn};

use super::encryptor::EncryptorHolder;
use super::preferences::KeyValueStore;

const KEY_ACCESS_TOKEN: &str = "accessToken";
const KEY_EXPIRES_IN: &str = "expiresIn";
const KEY_ISSUED_CLIENT_TIME: &str = "issuedClientTime";
const KEY_REFRESH_TOKEN: &str = "refreshToken";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Access token storage failed: {0}")]
    Storage(#[from] LineSdkError),

    #[error("Cached access token could not be decrypted: {0}")]
    Corrupted(String),

    #[error("Access token could not be encrypted: {0}")]
    Encrypt(String),
}

impl From<CacheError> for LineSdkError {
    fn from(value: CacheError) -> Self {
        match value {
            CacheError::Storage(err) => err,
            other @ (CacheError::Corrupted(_) | CacheError::Encrypt(_)) => {
                LineSdkError::Security(other.to_string())
            }
        }
    }
}

pub struct AccessTokenCache {
    namespace: String,
    store: Arc<dyn KeyValueStore>,
    encryptor: Arc<EncryptorHolder>,
}

impl AccessTokenCache {
    pub fn new(
        channel_id: &str,
        store: Arc<dyn KeyValueStore>,
        encryptor: Arc<EncryptorHolder>,
    ) -> Self {
        Self { namespace: format!("{ACCESS_TOKEN_CACHE_NAMESPACE_PREFIX}{channel_id}"), store, encryptor }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn cipher(&self) -> Result<Arc<dyn StringCipher>, CacheError> {
        Ok(self.encryptor.initialize()?)
    }

    pub fn save_token(&self, access_token: &InternalAccessToken) -> Result<(), CacheError> {
        let cipher = self.cipher()?;
        let encrypt = |value: &str| cipher.encrypt(value).map_err(|e| CacheError::Encrypt(e.to_string()));

        let entries = BTreeMap::from([
            (KEY_ACCESS_TOKEN.to_owned(), encrypt(&access_token.access_token)?),
            (KEY_EXPIRES_IN.to_owned(), encrypt(&access_token.expires_in_millis.to_string())?),
            (
                KEY_ISSUED_CLIENT_TIME.to_owned(),
                encrypt(&access_token.issued_client_time_millis.to_string())?,
            ),
            (KEY_REFRESH_TOKEN.to_owned(), encrypt(&access_token.refresh_token)?),
        ]);
        self.store.replace(&self.namespace, entries)?;
        debug!("Access token cached");
        Ok(())
    }

    /// Cached token, or `None` when any required field is missing.
    ///
    /// A field that fails to decrypt wipes the namespace before the error is
    /// returned.
    pub fn load_token(&self) -> Result<Option<InternalAccessToken>, CacheError> {
        match self.read_fields() {
            Err(CacheError::Corrupted(message)) => {
                warn!("Cached access token is corrupted, clearing cache");
                self.clear_token()?;
                Err(CacheError::Corrupted(message))
            }
            other => other,
        }
    }

    fn read_fields(&self) -> Result<Option<InternalAccessToken>, CacheError> {
        let cipher = self.cipher()?;
        let read = |key: &str| -> Result<Option<String>, CacheError> {
            match self.store.get(&self.namespace, key)? {
                Some(sealed) => cipher
                    .decrypt(&sealed)
                    .map(Some)
                    .map_err(|e| CacheError::Corrupted(e.to_string())),
                None => Ok(None),
            }
        };
        let read_millis = |key: &str| -> Result<Option<i64>, CacheError> {
            Ok(read(key)?.and_then(|value| value.parse().ok()))
        };

        let access_token = read(KEY_ACCESS_TOKEN)?.filter(|token| !token.is_empty());
        let expires_in = read_millis(KEY_EXPIRES_IN)?;
        let issued_client_time = read_millis(KEY_ISSUED_CLIENT_TIME)?;
        let (Some(access_token), Some(expires_in), Some(issued_client_time)) =
            (access_token, expires_in, issued_client_time)
        else {
            return Ok(None);
        };

        let refresh_token = read(KEY_REFRESH_TOKEN)?.unwrap_or_default();
        Ok(Some(InternalAccessToken::new(access_token, expires_in, issued_client_time, refresh_token)))
    }

    pub fn clear_token(&self) -> Result<(), CacheError> {
        self.store.clear(&self.namespace)?;
        Ok(())
    }
}

impl AccessTokenStore for AccessTokenCache {
    fn save(&self, access_token: &InternalAccessToken) -> linesdk_domain::Result<()> {
        Ok(self.save_token(access_token)?)
    }

    fn load(&self) -> linesdk_domain::Result<Option<InternalAccessToken>> {
        Ok(self.load_token()?)
    }

    fn clear(&self) -> linesdk_domain::Result<()> {
        Ok(self.clear_token()?)
    }
}
