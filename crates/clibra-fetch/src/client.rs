//! HTTP client for downloading daily trade archives.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration for the download client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum idle connections kept per host.
    pub concurrency: usize,
    /// Request timeout. Daily archives can be tens of megabytes.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(300),
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            user_agent: format!("clibra/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur during downloads.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server kept failing after all retries.
    #[error("Server error: {status} after {attempts} attempts")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Number of attempts made.
        attempts: u32,
    },
}

/// HTTP client with connection pooling and retry logic.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a new download client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Downloads one file, returning its body.
    ///
    /// Returns `Ok(None)` if the server answers 404 (no data for that day).
    /// Server errors, rate limiting and transient transport errors are
    /// retried with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails after all retries.
    pub async fn download(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        let mut attempts = 0;

        loop {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        debug!(url, "not found");
                        return Ok(None);
                    }

                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.backoff_delay(attempts);
                            warn!(url, %status, attempt = attempts, ?delay, "retrying");
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(DownloadError::ServerError {
                            status: status.as_u16(),
                            attempts: attempts + 1,
                        });
                    }

                    response.error_for_status_ref()?;
                    let body = response.bytes().await?;
                    debug!(url, bytes = body.len(), "downloaded");
                    return Ok(Some(body));
                }
                Err(e) if Self::is_retryable(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.backoff_delay(attempts);
                    warn!(url, error = %e, attempt = attempts, ?delay, "retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Exponential backoff capped at `max_delay_ms`, with ±25% jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter spread over [-capped/4, +capped/4).
        let range = capped / 4;
        let delay = if range > 0 {
            let offset = (u64::from(attempt) * 17) % (range * 2);
            (capped + offset).saturating_sub(range)
        } else {
            capped
        };

        Duration::from_millis(delay.max(100))
    }

    fn is_retryable(error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect() || error.is_request() || error.is_body()
    }
}
