//! TestPG connection settings.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use url::Url;

use crate::error::{GatewayError, Result};

/// Sandbox defaults published by TestPG.
const DEFAULT_API_KEY: &str = "11111111-1111-4111-8111-111111111111";
const DEFAULT_BASE_URL: &str = "https://api-test-pg.bigs.im";
/// base64url encoding of twelve zero bytes.
const DEFAULT_IV: &str = "AAAAAAAAAAAAAAAA";
const DEFAULT_PARTNER_ID: i64 = 2;

/// TestPG adapter configuration.
///
/// All fields carry the sandbox defaults, so `TestPgConfig::default()` is a
/// working configuration against the hosted test environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestPgConfig {
    /// API key; also the input to request-encryption key derivation.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Gateway base URL, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// base64url (unpadded) encoding of the 12-byte AES-GCM IV.
    #[serde(default = "default_iv")]
    pub iv_base64url: String,
    /// The partner this adapter serves.
    #[serde(default = "default_partner_id")]
    pub partner_id: i64,
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_owned()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_iv() -> String {
    DEFAULT_IV.to_owned()
}

fn default_partner_id() -> i64 {
    DEFAULT_PARTNER_ID
}

impl Default for TestPgConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            iv_base64url: default_iv(),
            partner_id: default_partner_id(),
        }
    }
}

impl TestPgConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// Missing fields fall back to the sandbox defaults. The parsed
    /// configuration is validated before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the TOML is malformed or
    /// validation fails.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| GatewayError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the API key is empty, the
    /// base URL does not parse, or the IV is not a 12-byte base64url value.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(GatewayError::ConfigError("api_key must not be empty".to_owned()));
        }

        Url::parse(&self.base_url)
            .map_err(|e| GatewayError::ConfigError(format!("invalid base_url: {e}")))?;

        let iv = URL_SAFE_NO_PAD
            .decode(&self.iv_base64url)
            .map_err(|e| GatewayError::ConfigError(format!("invalid iv_base64url: {e}")))?;
        if iv.len() != 12 {
            return Err(GatewayError::ConfigError(format!(
                "iv_base64url must decode to 12 bytes, got {}",
                iv.len()
            )));
        }

        Ok(())
    }
}
