//! `envelope-seal` — authenticated envelope encryption for application payloads.
//!
//! Turns bytes, text, or structured JSON values into self-contained encrypted
//! envelopes (AES-256-GCM: 256-bit key, 96-bit random nonce, 128-bit tag) and
//! opens them again, rejecting anything tampered with or corrupted before a
//! single plaintext byte is released.
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
//! # Usage
//!
//! The key is provisioned once per process via the `ENCRYPTION_SECRET_KEY`
//! environment variable (64 hex characters) and injected explicitly — no
//! global state, so tests can run isolated ciphers with distinct keys.
//!
//! ```no_run
//! use envelope_seal::{Config, Decrypted, EnvelopeCipher};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::from_env()?; // fatal if the key is missing or malformed
//! let cipher = EnvelopeCipher::new(cfg.secret_key()?);
//!
//! let envelope = cipher.encrypt("hello world")?;
//! match cipher.decrypt(&envelope)? {
//!     Decrypted::Text(s) => assert_eq!(s, "hello world"),
//!     Decrypted::Structured(v) => println!("parsed as JSON: {v}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Encryption and decryption are synchronous, CPU-bound, and lock-free; the
//! only shared state is the immutable key, so one [`EnvelopeCipher`] serves
//! any number of threads.

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod key;

pub use config::Config;
pub use crypto::{KEY_LEN, NONCE_LEN, TAG_LEN};
pub use envelope::{Decrypted, Envelope, EnvelopeCipher, EnvelopeData, Plaintext};
pub use error::EnvelopeError;
pub use key::{KeyError, SecretKey, KEY_HEX_LEN};
