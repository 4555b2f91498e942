//! Domain value types

pub mod id_token;
pub mod login;
pub mod openid;
pub mod profile;
pub mod response;
pub mod scope;
pub mod token;

pub use id_token::{Address, IdTokenClaims, LineIdToken};
pub use login::{AuthenticationParams, BotPrompt, LoginResult};
pub use openid::{Jwk, JwkSet, OpenIdDiscoveryDocument};
pub use profile::{LineFriendshipStatus, LineProfile};
pub use response::{LineApiError, LineApiResponse, LineApiResponseCode};
pub use scope::Scope;
pub use token::{
    AccessTokenVerificationResult, InternalAccessToken, IssueAccessTokenResult, LineAccessToken,
    LineCredential, RefreshTokenResult,
};
