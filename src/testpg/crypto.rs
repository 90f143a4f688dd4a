//! Request encryption for the TestPG protocol.
//!
//! The gateway derives a 256-bit AES key by hashing the API key with
//! SHA-256, then encrypts the JSON card payload with AES-256-GCM under a
//! fixed IV shipped out-of-band. The ciphertext (with the 16-byte GCM tag
//! appended) is transmitted as unpadded base64url.
//!
//! The fixed IV is part of the gateway's published protocol. Reusing a GCM
//! nonce across messages under the same key is cryptographically unsound;
//! the scheme is only acceptable because this gateway handles synthetic
//! sandbox data.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

use crate::error::{GatewayError, Result};

/// Derives the AES-256 key from the API key.
#[must_use]
pub fn derive_key(api_key: &str) -> [u8; 32] {
    Sha256::digest(api_key.as_bytes()).into()
}

/// Decodes the configured IV into its 12 raw bytes.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the value is not valid
/// base64url or does not decode to exactly 12 bytes.
pub fn decode_iv(iv_base64url: &str) -> Result<Vec<u8>> {
    let iv = URL_SAFE_NO_PAD
        .decode(iv_base64url)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid IV encoding: {e}")))?;
    if iv.len() != 12 {
        return Err(GatewayError::InvalidRequest(format!(
            "IV must be 12 bytes, got {}",
            iv.len()
        )));
    }
    Ok(iv)
}

/// Encrypts `plaintext` per the TestPG scheme and returns unpadded
/// base64url ciphertext.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed IV and
/// [`GatewayError::CryptoError`] if encryption itself fails.
pub fn encrypt(plaintext: &str, api_key: &str, iv_base64url: &str) -> Result<String> {
    let key = derive_key(api_key);
    let iv = decode_iv(iv_base64url)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|e| GatewayError::CryptoError(format!("AES-GCM encryption failed: {e}")))?;

    Ok(URL_SAFE_NO_PAD.encode(ciphertext))
}
