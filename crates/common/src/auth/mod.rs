//! Login primitives shared by the authentication flow.
//!
//! Only the pieces that need a CSPRNG or a hash live here; the flow itself is
//! in `linesdk-core`.
//!
//! ```text
//! ┌───────────────┐  challenge   ┌────────────────────┐
//! │   PkceCode    │─────────────▶│ authorization URL  │
//! │ (per attempt) │              └────────────────────┘
//! │               │  verifier    ┌────────────────────┐
//! │               │─────────────▶│  token exchange    │
//! └───────────────┘              └────────────────────┘
//! ```

pub mod pkce;

pub use pkce::{generate_code_challenge, CodeChallengeMethod, PkceCode};
