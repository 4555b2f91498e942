//! Random identifier helpers.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate a random `[A-Za-z0-9]` string of `len` characters from the
/// thread-local CSPRNG.
#[must_use]
pub fn alphanumeric(len: usize) -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}
