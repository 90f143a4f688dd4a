//! TestPG provider adapter.
//!
//! TestPG is a sandbox card-payment gateway with an encrypted request
//! protocol: the card payload is serialized to JSON, encrypted with
//! AES-256-GCM under a key derived from the API key, and shipped as a
//! base64url envelope. Submodules:
//!
//! - [`config`]: connection settings and validation.
//! - [`crypto`]: key derivation and payload encryption.
//! - [`dto`]: wire-format request/response types and decline codes.
//! - [`client`]: the [`PgProvider`](crate::provider::PgProvider)
//!   implementation.

pub mod client;
pub mod config;
pub mod crypto;
pub mod dto;

pub use client::TestPgProvider;
pub use config::TestPgConfig;
