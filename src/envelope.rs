//! The envelope format and the seal/open operations over it.
//!
//! # Envelope format
//!
//! ```text
//! {
//!   "encrypted": true,
//!   "data": {
//!     "data":    "<base64 ciphertext>",
//!     "iv":      "<24-hex-char nonce>",
//!     "authTag": "<32-hex-char tag>"
//!   },
//!   "timestamp": <integer milliseconds since epoch>
//! }
//! ```
//!
//! This shape is a byte-for-byte contract: any consumer that stores or
//! forwards an envelope must preserve all three text fields unchanged to stay
//! decryptable. The envelope is self-describing — it carries its own nonce
//! and tag — and holds no reference to the key.
//!
//! # Known limitations
//!
//! The format carries no record of the original input kind. Decryption
//! recovers UTF-8 text and then attempts a JSON parse, so:
//!
//! - plain text that happens to parse as JSON (`"123"`, `"true"`) comes back
//!   as [`Decrypted::Structured`], not [`Decrypted::Text`];
//! - raw byte inputs come back as text, lossily (invalid UTF-8 sequences are
//!   replaced) — only UTF-8-decodable bytes round-trip faithfully.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::crypto::cipher::{decrypt_detached, encrypt_detached, SealedBytes};
use crate::crypto::{NONCE_LEN, TAG_LEN};
use crate::error::EnvelopeError;
use crate::key::SecretKey;

/// The three text-encoded cipher outputs carried inside an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeData {
    /// Base64 (standard alphabet, padded) encoding of the ciphertext.
    pub data: String,
    /// Lowercase hex encoding of the 12-byte nonce.
    pub iv: String,
    /// Lowercase hex encoding of the 16-byte authentication tag.
    #[serde(rename = "authTag")]
    pub auth_tag: String,
}

/// A sealed payload, safe to store or transmit.
///
/// Value type: freely cloneable and serialisable, no key reference. The
/// caller owns storage and transmission after [`EnvelopeCipher::encrypt`]
/// returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Marker distinguishing envelopes from plain stored values. Always
    /// `true` for envelopes produced by this crate.
    pub encrypted: bool,
    /// The ciphertext, nonce, and tag.
    pub data: EnvelopeData,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Input to [`EnvelopeCipher::encrypt`]: the three representable kinds.
///
/// Normalisation before encryption: bytes pass through unchanged, text is
/// UTF-8 encoded, structured values are serialised as JSON then UTF-8
/// encoded. Note that `Bytes` input is recovered as (lossy) text on
/// decryption — see the module docs.
#[derive(Debug, Clone, PartialEq)]
pub enum Plaintext {
    /// A raw byte sequence.
    Bytes(Vec<u8>),
    /// A text string.
    Text(String),
    /// A structured, JSON-serialisable value.
    Structured(Value),
}

impl Plaintext {
    /// Normalise to the byte sequence that gets encrypted.
    fn into_bytes(self) -> Result<Vec<u8>, EnvelopeError> {
        match self {
            Plaintext::Bytes(b) => Ok(b),
            Plaintext::Text(s) => Ok(s.into_bytes()),
            Plaintext::Structured(v) => Ok(serde_json::to_string(&v)?.into_bytes()),
        }
    }
}

impl From<&str> for Plaintext {
    fn from(s: &str) -> Self {
        Plaintext::Text(s.to_owned())
    }
}

impl From<String> for Plaintext {
    fn from(s: String) -> Self {
        Plaintext::Text(s)
    }
}

impl From<Vec<u8>> for Plaintext {
    fn from(b: Vec<u8>) -> Self {
        Plaintext::Bytes(b)
    }
}

impl From<&[u8]> for Plaintext {
    fn from(b: &[u8]) -> Self {
        Plaintext::Bytes(b.to_owned())
    }
}

impl From<Value> for Plaintext {
    fn from(v: Value) -> Self {
        Plaintext::Structured(v)
    }
}

/// Result of a successful decryption.
///
/// Mirrors the two shapes an original input can come back as: a parsed JSON
/// value when the recovered text is valid JSON, plain text otherwise. Callers
/// must be prepared for either.
#[derive(Debug, Clone, PartialEq)]
pub enum Decrypted {
    /// The recovered text parsed as JSON.
    Structured(Value),
    /// The recovered text as-is.
    Text(String),
}

impl Decrypted {
    /// The recovered text, if this is the [`Decrypted::Text`] shape.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Decrypted::Text(s) => Some(s),
            Decrypted::Structured(_) => None,
        }
    }

    /// The parsed value, if this is the [`Decrypted::Structured`] shape.
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Decrypted::Structured(v) => Some(v),
            Decrypted::Text(_) => None,
        }
    }
}

/// Seals and opens envelopes under one injected [`SecretKey`].
///
/// Holds only the immutable key, so a single instance can be shared freely
/// across threads; every operation is a pure function of (key, input) plus
/// one draw of nonce entropy. Construct one per process from
/// [`crate::Config`], or one per test with a throwaway key.
#[derive(Debug, Clone)]
pub struct EnvelopeCipher {
    key: SecretKey,
}

impl EnvelopeCipher {
    /// Create a cipher over `key`.
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    /// Seal a payload into an [`Envelope`].
    ///
    /// Accepts anything convertible to [`Plaintext`]: `&str`, `String`,
    /// `Vec<u8>`, `&[u8]`, or a [`serde_json::Value`]. A fresh random nonce
    /// is drawn per call, so sealing the same payload twice yields different
    /// envelopes. The envelope reveals nothing about the payload beyond its
    /// byte length.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Serialisation`] if a structured payload
    /// cannot be serialised. No other failure occurs under a valid key.
    pub fn encrypt(&self, input: impl Into<Plaintext>) -> Result<Envelope, EnvelopeError> {
        let plaintext = input.into().into_bytes()?;
        debug!(bytes = plaintext.len(), "sealing payload");

        let sealed =
            encrypt_detached(&plaintext, self.key.as_bytes()).map_err(EnvelopeError::Cipher)?;

        Ok(Envelope {
            encrypted: true,
            data: EnvelopeData {
                data: BASE64.encode(&sealed.ciphertext),
                iv: hex::encode(sealed.nonce),
                auth_tag: hex::encode(sealed.tag),
            },
            timestamp: Utc::now().timestamp_millis(),
        })
    }

    /// Open an [`Envelope`], verifying its tag before releasing anything.
    ///
    /// The recovered text is returned as [`Decrypted::Structured`] when it
    /// parses as JSON and [`Decrypted::Text`] otherwise — see the module docs
    /// for the ambiguity this inherits from the envelope format.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Decode`] for malformed base64/hex fields or
    /// wrong decoded nonce/tag lengths, and [`EnvelopeError::Authentication`]
    /// when tag verification fails (tampering, corruption, or a different
    /// key). Neither case releases any plaintext. Failures are terminal for
    /// the call; retrying with the same input cannot succeed.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<Decrypted, EnvelopeError> {
        self.open(&envelope.data)
    }

    /// Open any JSON value presenting the envelope fields.
    ///
    /// Accepts either a full envelope (`{"encrypted": ..., "data": {...},
    /// "timestamp": ...}`) or the bare inner object (`{"data": ..., "iv":
    /// ..., "authTag": ...}`), so payloads read back from storage or an API
    /// body can be opened without first binding them to [`Envelope`].
    ///
    /// # Errors
    ///
    /// As [`EnvelopeCipher::decrypt`], plus [`EnvelopeError::Decode`] when
    /// the value is missing any of the three fields.
    pub fn decrypt_value(&self, value: &Value) -> Result<Decrypted, EnvelopeError> {
        // A full envelope nests the fields under an object at "data"; the
        // bare shape has a base64 string there instead.
        let fields = match value.get("data") {
            Some(inner) if inner.is_object() => inner,
            _ => value,
        };
        let data: EnvelopeData = serde_json::from_value(fields.clone())
            .map_err(|_| EnvelopeError::Decode("missing or malformed envelope fields".into()))?;
        self.open(&data)
    }

    fn open(&self, data: &EnvelopeData) -> Result<Decrypted, EnvelopeError> {
        let sealed = match decode_fields(data) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "envelope rejected before decryption");
                return Err(e);
            }
        };

        let plaintext = decrypt_detached(&sealed, self.key.as_bytes()).map_err(|_| {
            warn!("envelope failed authentication");
            EnvelopeError::Authentication
        })?;

        // Lossy for non-UTF-8 byte payloads; see the module docs.
        let text = String::from_utf8_lossy(&plaintext).into_owned();
        match serde_json::from_str::<Value>(&text) {
            Ok(v) => Ok(Decrypted::Structured(v)),
            Err(_) => Ok(Decrypted::Text(text)),
        }
    }
}

/// Decode the three text fields back into raw cipher inputs.
fn decode_fields(data: &EnvelopeData) -> Result<SealedBytes, EnvelopeError> {
    let ciphertext = BASE64
        .decode(&data.data)
        .map_err(|_| EnvelopeError::Decode("ciphertext is not valid base64".into()))?;

    let nonce_bytes = hex::decode(&data.iv)
        .map_err(|_| EnvelopeError::Decode("iv is not valid hex".into()))?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(EnvelopeError::Decode(format!(
            "iv decodes to {} bytes, expected {NONCE_LEN}",
            nonce_bytes.len()
        )));
    }
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&nonce_bytes);

    let tag_bytes = hex::decode(&data.auth_tag)
        .map_err(|_| EnvelopeError::Decode("authTag is not valid hex".into()))?;
    if tag_bytes.len() != TAG_LEN {
        return Err(EnvelopeError::Decode(format!(
            "authTag decodes to {} bytes, expected {TAG_LEN}",
            tag_bytes.len()
        )));
    }
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&tag_bytes);

    Ok(SealedBytes {
        nonce,
        ciphertext,
        tag,
    })
}
