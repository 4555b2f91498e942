//! Shared error type for the utility tier.
//!
//! [`CommonError`] covers the failures the cipher can produce: a bad key or
//! salt supplied by the caller, and cipher operations that fail because the
//! payload is corrupted or was sealed under another key.
//!
//! ```rust
//! use linesdk_common::error::CommonError;
//!
//! let err = CommonError::crypto("decrypt", "authentication tag mismatch");
//! assert_eq!(err.to_string(), "Crypto error during 'decrypt': authentication tag mismatch");
//! ```

use std::fmt;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Failures of the shared cipher helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Cipher failures; a failed decrypt usually means corrupted or foreign data
    Crypto { operation: String, message: String },

    /// Caller-supplied key material was rejected
    Validation { field: String, message: String },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crypto { operation, message } => {
                write!(f, "Crypto error during '{}': {}", operation, message)
            }
            Self::Validation { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl CommonError {
    /// Create a cipher error for the named operation (`encrypt`, `decrypt`, ...)
    pub fn crypto<O: Into<String>, M: Into<String>>(operation: O, message: M) -> Self {
        Self::Crypto { operation: operation.into(), message: message.into() }
    }

    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }
}
