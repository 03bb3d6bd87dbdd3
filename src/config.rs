//! Configuration loading and validation.
//!
//! All values are read from environment variables at startup. Loading fails
//! with a clear error message if the secret key is missing or malformed — the
//! embedding process must treat that as fatal and never fall back to a
//! default or derived key. There is no runtime reload path; rotating the key
//! requires a process restart.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::key::{KeyError, SecretKey};

/// Validated envelope-encryption configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// 64-character hex encoding of the 256-bit AES key. **Required.**
    ///
    /// Environment variable: `ENCRYPTION_SECRET_KEY`.
    pub encryption_secret_key: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_SECRET_KEY` is absent, not exactly
    /// [`crate::key::KEY_HEX_LEN`] characters, or not valid hexadecimal.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("ENCRYPTION_SECRET_KEY is required and was not found in the environment")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        SecretKey::from_hex(&self.encryption_secret_key)
            .context("ENCRYPTION_SECRET_KEY must be a 64-character hex string (32 bytes)")?;
        Ok(())
    }

    /// Materialise the [`SecretKey`] from the validated hex string.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] if the string is malformed. Infallible on a
    /// `Config` produced by [`Config::from_env`], which validates first.
    pub fn secret_key(&self) -> Result<SecretKey, KeyError> {
        SecretKey::from_hex(&self.encryption_secret_key)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.debug_struct("Config")
            .field("encryption_secret_key", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_HEX: &str = "9f2d4c6b8a0e1f3d5c7b9a8e6f4d2c0b1a3e5d7c9b8f6e4d2c0a1b3d5e7f9c8b";

    fn config_with_key(key: &str) -> Config {
        Config {
            encryption_secret_key: key.into(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_64_hex_chars() {
        assert!(config_with_key(VALID_HEX).validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_key() {
        assert!(config_with_key("").validate().is_err());
    }

    #[test]
    fn validate_rejects_63_chars() {
        assert!(config_with_key(&VALID_HEX[..63]).validate().is_err());
    }

    #[test]
    fn validate_rejects_65_chars() {
        let long = format!("{VALID_HEX}0");
        assert!(config_with_key(&long).validate().is_err());
    }

    #[test]
    fn validate_rejects_non_hex() {
        let bad = format!("zz{}", &VALID_HEX[2..]);
        assert!(config_with_key(&bad).validate().is_err());
    }

    #[test]
    fn secret_key_materialises() {
        let cfg = config_with_key(VALID_HEX);
        let key = cfg.secret_key().unwrap();
        assert_eq!(key.as_bytes().len(), crate::crypto::KEY_LEN);
    }

    #[test]
    fn key_redacted_in_debug() {
        let cfg = config_with_key(VALID_HEX);
        let repr = format!("{cfg:?}");
        assert!(repr.contains("REDACTED"));
        assert!(!repr.contains(VALID_HEX));
    }
}
