//! AES-256-GCM encryption and decryption of raw byte payloads.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// The raw output of one encryption call: nonce, ciphertext, and detached tag.
///
/// The ciphertext is exactly as long as the plaintext — GCM is a stream
/// construction, no padding. The tag is kept separate so the envelope layer
/// can encode the three parts in distinct fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBytes {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// AES-GCM encryption failed, or decryption failed tag verification.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Encrypt a byte payload using AES-256-GCM.
///
/// A random 96-bit nonce is generated per call via the OS CSPRNG; the 128-bit
/// tag produced over the ciphertext is split off and returned separately.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`]
/// bytes. Returns [`CipherError::AeadFailure`] on an internal AEAD error
/// (should be unreachable with a valid key and nonce).
pub fn encrypt_detached(plaintext: &[u8], key: &[u8]) -> Result<SealedBytes, CipherError> {
    let cipher = build_cipher(key)?;

    // Use OsRng for a cryptographically secure random nonce.
    use aes_gcm::aead::rand_core::RngCore;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    // The aead API appends the tag to the ciphertext; split it back off.
    let mut ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CipherError::AeadFailure)?;
    let tag_vec = ciphertext.split_off(ciphertext.len() - TAG_LEN);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&tag_vec);

    Ok(SealedBytes {
        nonce: nonce_bytes,
        ciphertext,
        tag,
    })
}

/// Decrypt a [`SealedBytes`] back to plaintext, verifying the tag first.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`]
/// bytes. Returns [`CipherError::AeadFailure`] if tag verification fails
/// (wrong key, or tampered nonce/ciphertext/tag) — no plaintext is released
/// in that case.
pub fn decrypt_detached(sealed: &SealedBytes, key: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    let nonce = Nonce::from_slice(&sealed.nonce);

    let mut combined = Vec::with_capacity(sealed.ciphertext.len() + TAG_LEN);
    combined.extend_from_slice(&sealed.ciphertext);
    combined.extend_from_slice(&sealed.tag);

    cipher
        .decrypt(nonce, combined.as_ref())
        .map_err(|_| CipherError::AeadFailure)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> Vec<u8> {
        use aes_gcm::aead::rand_core::RngCore;
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = random_key();
        let plaintext = b"hello world";
        let sealed = encrypt_detached(plaintext, &key).unwrap();
        let decrypted = decrypt_detached(&sealed, &key).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn ciphertext_length_equals_plaintext_length() {
        let key = random_key();
        let plaintext = b"no padding in gcm";
        let sealed = encrypt_detached(plaintext, &key).unwrap();
        assert_eq!(sealed.ciphertext.len(), plaintext.len());
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let key = random_key();
        let sealed = encrypt_detached(b"", &key).unwrap();
        assert!(sealed.ciphertext.is_empty());
        assert_eq!(decrypt_detached(&sealed, &key).unwrap(), b"");
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let key1 = random_key();
        let key2 = random_key();
        let sealed = encrypt_detached(b"secret", &key1).unwrap();
        assert!(decrypt_detached(&sealed, &key2).is_err());
    }

    #[test]
    fn invalid_key_length_rejected() {
        let short_key = vec![0u8; 16];
        assert!(matches!(
            encrypt_detached(b"x", &short_key),
            Err(CipherError::InvalidKeyLength)
        ));
    }

    #[test]
    fn fresh_nonce_per_call() {
        let key = random_key();
        let a = encrypt_detached(b"same input", &key).unwrap();
        let b = encrypt_detached(b"same input", &key).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let key = random_key();
        let mut sealed = encrypt_detached(b"tamper me", &key).unwrap();
        // Flip a single bit to simulate corruption in transit.
        sealed.ciphertext[0] ^= 0x01;
        assert!(decrypt_detached(&sealed, &key).is_err());
    }

    #[test]
    fn tampered_nonce_fails_auth() {
        let key = random_key();
        let mut sealed = encrypt_detached(b"tamper me", &key).unwrap();
        sealed.nonce[0] ^= 0x01;
        assert!(decrypt_detached(&sealed, &key).is_err());
    }

    #[test]
    fn tampered_tag_fails_auth() {
        let key = random_key();
        let mut sealed = encrypt_detached(b"tamper me", &key).unwrap();
        sealed.tag[TAG_LEN - 1] ^= 0x01;
        assert!(decrypt_detached(&sealed, &key).is_err());
    }
}
