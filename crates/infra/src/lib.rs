//! # LINE SDK Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP clients for the LINE auth and talk APIs
//! - ID token signature verification against the published JWK set
//! - The encrypted access token cache and its key-value stores
//! - Configuration loading from the environment or files
//! - Optional tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `linesdk-core`
//! - Depends on `linesdk-common`, `linesdk-domain` and `linesdk-core`
//! - Contains all "impure" code (network, file system)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod sdk;
pub mod storage;

// Re-export commonly used items
pub use api::{IdTokenError, LineAuthApiClient, TalkApiClient};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
pub use sdk::LineSdk;
pub use storage::{
    AccessTokenCache, CacheError, EncryptorHolder, JsonFileKeyValueStore, KeyValueStore,
    MemoryKeyValueStore,
};
