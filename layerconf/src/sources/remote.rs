//! Remote layer: one blocking GET with a timeout and bounded retries.
//!
//! Transport timeouts, connection failures, HTTP 429 and 5xx responses are
//! retried with exponential backoff. Any other failure, or running out of
//! retries, yields [`LoadError::RemoteExhausted`].

use std::time::Duration;

use crate::{LoadError, LoadResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 2;
const RETRY_BASE_DELAY_MS: u64 = 200;
const RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Remote configuration endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteSource {
    address: String,
    timeout: Duration,
    max_retries: u32,
}

impl RemoteSource {
    /// Create a source for `address` with the default timeout and retries.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override how many times a failed request is retried.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The configured address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The retry budget.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetch the response body.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::RemoteExhausted`] when every attempt fails or a
    /// non-retryable failure occurs.
    #[cfg(feature = "remote")]
    pub fn fetch(&self) -> LoadResult<Vec<u8>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| LoadError::remote_exhausted(&self.address, 0, err.to_string()))?;

        let mut last_error = String::new();
        let mut attempts = 0;
        while attempts <= self.max_retries {
            if attempts > 0 {
                let delay = backoff_delay(attempts - 1);
                tracing::debug!(
                    address = %self.address,
                    attempt = attempts,
                    max_retries = self.max_retries,
                    ?delay,
                    "retrying remote configuration fetch"
                );
                std::thread::sleep(delay);
            }
            attempts += 1;
            match client.get(&self.address).send() {
                Ok(response) if response.status().is_success() => match response.bytes() {
                    Ok(body) => return Ok(body.to_vec()),
                    Err(err) => last_error = err.to_string(),
                },
                Ok(response) => {
                    let status = response.status().as_u16();
                    last_error = format!("HTTP {status}");
                    if !should_retry_status(status) {
                        break;
                    }
                }
                Err(err) => {
                    last_error = err.to_string();
                    if !(err.is_timeout() || err.is_connect()) {
                        break;
                    }
                }
            }
        }
        Err(LoadError::remote_exhausted(&self.address, attempts, last_error))
    }

    /// Fetch the response body.
    ///
    /// # Errors
    ///
    /// Always fails: the `remote` feature is disabled.
    #[cfg(not(feature = "remote"))]
    pub fn fetch(&self) -> LoadResult<Vec<u8>> {
        Err(LoadError::remote_exhausted(
            &self.address,
            0,
            "remote feature disabled: enable the 'remote' feature to fetch configuration",
        ))
    }
}

/// Delay before retry number `attempt + 1`: 200 ms doubling, capped at 5 s.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use layerconf::sources::backoff_delay;
///
/// assert_eq!(backoff_delay(0), Duration::from_millis(200));
/// assert_eq!(backoff_delay(2), Duration::from_millis(800));
/// assert_eq!(backoff_delay(20), Duration::from_secs(5));
/// ```
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    let delay_ms = RETRY_BASE_DELAY_MS.saturating_mul(2_u64.saturating_pow(attempt));
    Duration::from_millis(delay_ms.min(RETRY_MAX_DELAY_MS))
}

#[cfg(any(feature = "remote", test))]
const fn should_retry_status(status: u16) -> bool {
    status == 429 || matches!(status, 500..=599)
}
