//! Local persistence: preference store, install cipher and token cache.

pub mod access_token_cache;
pub mod encryptor;
pub mod preferences;

pub use access_token_cache::{AccessTokenCache, CacheError};
pub use encryptor::EncryptorHolder;
pub use preferences::{JsonFileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
