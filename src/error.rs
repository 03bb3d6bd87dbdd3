//! Per-call error types for envelope encryption and decryption.
//!
//! Startup-time key errors live in [`crate::key`]; everything here is a
//! terminal result for a single call, never something to retry with the same
//! input.
//!
//! Hardening note: callers that expose decryption failures to untrusted
//! parties should report every variant as one generic failure. Keeping
//! [`EnvelopeError::Decode`] and [`EnvelopeError::Authentication`] observably
//! distinct on an external surface gives an attacker an oracle separating
//! "bad format" from "bad tag". Neither variant ever carries plaintext, key,
//! or tag material.

use thiserror::Error;

use crate::crypto::cipher::CipherError;

/// Errors produced while building or opening an [`crate::Envelope`].
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// A base64/hex field is malformed, or decodes to the wrong length.
    #[error("malformed envelope field: {0}")]
    Decode(String),

    /// Tag verification failed — the envelope was tampered with, corrupted,
    /// or sealed under a different key. No plaintext was released.
    #[error("envelope authentication failed")]
    Authentication,

    /// A structured payload could not be serialised before encryption.
    #[error("payload serialisation failed: {0}")]
    Serialisation(#[from] serde_json::Error),

    /// The cipher layer failed during encryption. Unreachable with a key
    /// that came from [`crate::SecretKey`].
    #[error("cipher failure")]
    Cipher(#[source] CipherError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_display_includes_detail() {
        let e = EnvelopeError::Decode("iv is not valid hex".into());
        assert!(e.to_string().contains("iv is not valid hex"));
    }

    #[test]
    fn authentication_display_is_generic() {
        let e = EnvelopeError::Authentication;
        assert_eq!(e.to_string(), "envelope authentication failed");
    }
}
