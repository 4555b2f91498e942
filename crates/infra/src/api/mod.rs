//! LINE platform API clients
//!
//! Implementations of the `linesdk-core` API ports over HTTP:
//!
//! - [`LineAuthApiClient`]: token issue/refresh/verify/revoke plus the
//!   OpenID discovery document and JWK set
//! - [`TalkApiClient`]: profile and friendship status
//! - [`id_token`]: ES256 signature verification for issued ID tokens
//!
//! Every call returns a `LineApiResponse`; nothing here retries.

pub mod auth_client;
pub mod id_token;
pub mod talk_client;

pub use auth_client::LineAuthApiClient;
pub use id_token::IdTokenError;
pub use talk_client::TalkApiClient;
