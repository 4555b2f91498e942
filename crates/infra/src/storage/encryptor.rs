//! Lazily derived per-install cipher.
//!
//! Key derivation is deliberately slow, so the cipher is built once per
//! holder and can be warmed up off the caller's thread.

use std::collections::BTreeMap;
use std::sync::Arc;

use linesdk_common::{EncryptionService, StringCipher};
use linesdk_domain::Result;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use super::preferences::KeyValueStore;
use crate::errors::InfraError;

const SALT_NAMESPACE: &str = "com.linecorp.linesdk.sharedpreference.encryptionsalt";
const SALT_KEY: &str = "salt";

pub struct EncryptorHolder {
    store: Arc<dyn KeyValueStore>,
    install_secret: String,
    cipher: OnceCell<Arc<dyn StringCipher>>,
}

impl EncryptorHolder {
    pub fn new(store: Arc<dyn KeyValueStore>, install_secret: impl Into<String>) -> Self {
        Self { store, install_secret: install_secret.into(), cipher: OnceCell::new() }
    }

    /// Holder around an already built cipher.
    pub fn with_cipher(store: Arc<dyn KeyValueStore>, cipher: Arc<dyn StringCipher>) -> Self {
        Self { store, install_secret: String::new(), cipher: OnceCell::with_value(cipher) }
    }

    /// Derive the key, creating and persisting the install salt on first use.
    pub fn initialize(&self) -> Result<Arc<dyn StringCipher>> {
        self.cipher.get_or_try_init(|| self.derive()).map(Arc::clone)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cipher.get().is_some()
    }

    fn derive(&self) -> Result<Arc<dyn StringCipher>> {
        let salt = match self.store.get(SALT_NAMESPACE, SALT_KEY)? {
            Some(salt) => salt,
            None => {
                let salt = EncryptionService::generate_salt();
                self.store.replace(
                    SALT_NAMESPACE,
                    BTreeMap::from([(SALT_KEY.to_owned(), salt.clone())]),
                )?;
                info!("Generated install salt for access token encryption");
                salt
            }
        };

        let service = EncryptionService::from_install_secret(&self.install_secret, &salt)
            .map_err(InfraError::from)?;
        debug!("Access token cipher ready");
        Ok(Arc::new(service))
    }
}
