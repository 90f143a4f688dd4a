//! HTTP transport for provider adapters.
//!
//! Adapters do not talk to [`reqwest`] directly; they go through the
//! [`PgTransport`] trait so tests can substitute a stub and so all outbound
//! calls share one pooled client with bounded timeouts. Non-2xx responses are
//! surfaced as a typed error carrying the raw status and body, which the
//! adapter then classifies into the domain taxonomy.

use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::error::{GatewayError, Result};

/// Default pooled HTTP client.
///
/// A singleton keeps connection pooling effective across all default
/// transport instances.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(HttpConfig::DEFAULT.pool_max_idle_per_host)
        .timeout(HttpConfig::DEFAULT.read_timeout())
        .connect_timeout(HttpConfig::DEFAULT.connect_timeout())
        .build()
        .expect("default HTTP client construction is infallible with static settings")
});

/// Transport configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall request (read) timeout in seconds.
    pub read_timeout_secs: u64,
    /// Max idle pooled connections per host.
    pub pool_max_idle_per_host: usize,
}

impl HttpConfig {
    /// Reference configuration: 10s connect, 15s read.
    pub const DEFAULT: Self =
        Self { connect_timeout_secs: 10, read_timeout_secs: 15, pool_max_idle_per_host: 100 };

    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Read timeout as a [`Duration`].
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A 2xx response: status plus raw body bytes.
#[derive(Debug, Clone)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Outbound JSON POST abstraction used by provider adapters.
#[async_trait]
pub trait PgTransport: Send + Sync {
    /// Executes a JSON POST.
    ///
    /// Returns the reply for any 2xx status.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::UnexpectedProvider`] with the raw status and body
    ///   for every non-2xx response (adapters reclassify 400/401/422).
    /// - [`GatewayError::HttpError`] for timeouts and transport failures.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<TransportReply>;
}

/// [`reqwest`]-backed transport with connection pooling.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport over the shared default client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: DEFAULT_HTTP_CLIENT.clone() }
    }

    /// Creates a transport with its own client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::HttpError`] if client construction fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.read_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(GatewayError::HttpError)?;

        Ok(Self { client })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PgTransport for HttpTransport {
    #[instrument(skip(self, headers, body))]
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<TransportReply> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let success = response.status().is_success();
        let bytes = response.bytes().await.map_err(GatewayError::HttpError)?.to_vec();

        if !success {
            return Err(GatewayError::UnexpectedProvider {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(TransportReply { status, body: bytes })
    }
}
