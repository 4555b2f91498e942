//! Cipher primitives used to keep credentials encrypted at rest.

pub mod encryption;

pub use encryption::{EncryptedData, EncryptionService};

use crate::error::CommonResult;

/// Opaque string cipher: plain text in, printable cipher text out.
///
/// Implementations must be deterministic in key but not in output, and a
/// failed [`StringCipher::decrypt`] must return a crypto error so callers can
/// tell corruption apart from I/O trouble.
pub trait StringCipher: Send + Sync {
    /// Seal `plain_text`.
    fn encrypt(&self, plain_text: &str) -> CommonResult<String>;

    /// Open a value produced by [`StringCipher::encrypt`].
    fn decrypt(&self, cipher_text: &str) -> CommonResult<String>;
}
