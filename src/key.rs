//! [`SecretKey`]: the process-wide AES-256 key, validated once at startup.
//!
//! The key arrives as a 64-character hexadecimal string (see
//! [`crate::config`]). It is decoded exactly once; every later encrypt or
//! decrypt call borrows the same immutable 32-byte buffer, so no locking is
//! needed anywhere in the crate.

use thiserror::Error;

use crate::crypto::KEY_LEN;

/// Number of hexadecimal characters in a valid key string.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// Errors produced while materialising a [`SecretKey`].
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key string is not exactly [`KEY_HEX_LEN`] characters.
    #[error("secret key must be exactly {KEY_HEX_LEN} hex characters, got {0}")]
    InvalidLength(usize),

    /// The key string contains characters outside `[0-9a-fA-F]`.
    #[error("secret key contains non-hexadecimal characters")]
    InvalidHex,
}

/// Fixed-size key buffer that holds exactly [`KEY_LEN`] bytes.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
#[derive(Clone)]
pub struct SecretKey(Box<[u8; KEY_LEN]>);

impl SecretKey {
    /// Decode a key from its 64-character hexadecimal representation.
    ///
    /// Hex digits may be upper- or lower-case. Anything else — wrong length,
    /// non-hex characters — is rejected; there is no fallback key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] or [`KeyError::InvalidHex`].
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        if s.len() != KEY_HEX_LEN {
            return Err(KeyError::InvalidLength(s.len()));
        }
        let decoded = hex::decode(s).map_err(|_| KeyError::InvalidHex)?;
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(&decoded);
        Ok(Self(buf))
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}
