//! AES-256-GCM authenticated-encryption primitives.
//!
//! This module is intentionally free of envelope-format and configuration
//! dependencies. It provides the low-level seal/open operations used by the
//! [`crate::envelope`] layer: one fresh random 96-bit nonce per call, a
//! 128-bit authentication tag kept detached from the ciphertext so the
//! envelope format can carry the two in separate fields.
//!
//! **Nonce discipline:** GCM nonce reuse under one key is catastrophic — it
//! breaks both confidentiality and authentication. Every call draws its nonce
//! from the OS CSPRNG; nothing in this crate ever accepts a caller-supplied
//! nonce for encryption.

pub mod cipher;

pub use cipher::{KEY_LEN, NONCE_LEN, TAG_LEN};
