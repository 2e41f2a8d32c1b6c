//! Random fraction sources.
//!
//! The battle engine asks a [`RandomSource`] for one fresh fraction in
//! `[0, 1)` per resolution. [`RandomOrgClient`] fetches it from random.org
//! over HTTP; [`FixedRandomSource`] returns a preset value for deterministic
//! runs and tests.

use core::future::Future;
use std::time::Duration;

use crate::error::RandomSourceError;

/// random.org endpoint for one decimal fraction with two digits, plain text.
pub const DEFAULT_RANDOM_ORG_URL: &str =
    "https://www.random.org/decimal-fractions/?num=1&dec=2&col=1&format=plain&rnd=new";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// A source of random fractions in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    /// Fetch one fresh fraction. Values are never cached between calls.
    ///
    /// # Errors
    ///
    /// Returns [`RandomSourceError`] if the fraction cannot be obtained.
    fn fetch_fraction(&self) -> impl Future<Output = Result<f64, RandomSourceError>> + Send;
}

/// Parse a plain-text fraction, allowing surrounding whitespace.
///
/// # Errors
///
/// Returns [`RandomSourceError::Malformed`] if the body is not a number in
/// `[0, 1)`.
pub fn parse_fraction(body: &str) -> Result<f64, RandomSourceError> {
    let trimmed = body.trim();
    let value: f64 = trimmed
        .parse()
        .ok()
        .ok_or_else(|| RandomSourceError::Malformed(trimmed.to_owned()))?;
    if !(0.0..1.0).contains(&value) {
        return Err(RandomSourceError::Malformed(trimmed.to_owned()));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// random.org
// ---------------------------------------------------------------------------

/// Configuration for [`RandomOrgClient`].
#[derive(Debug, Clone)]
pub struct RandomOrgConfig {
    /// Full request URL.
    pub url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for RandomOrgConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RANDOM_ORG_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RandomOrgConfig {
    /// Point the client at a different URL.
    #[must_use]
    pub fn with_url(mut self, url: &str) -> Self {
        url.clone_into(&mut self.url);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fetches random fractions from random.org.
#[derive(Debug, Clone)]
pub struct RandomOrgClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl RandomOrgClient {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RandomSourceError::Unavailable`] if the HTTP client cannot
    /// be initialised.
    pub fn new(config: &RandomOrgConfig) -> Result<Self, RandomSourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RandomSourceError::Unavailable(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout: config.timeout,
        })
    }

    fn classify(&self, err: &reqwest::Error) -> RandomSourceError {
        if err.is_timeout() {
            tracing::error!(url = %self.url, "Request to random.org timed out");
            RandomSourceError::Timeout {
                timeout_ms: self.timeout.as_millis(),
            }
        } else {
            tracing::error!(url = %self.url, error = %err, "Request to random.org failed");
            RandomSourceError::Unavailable(format!("request to random.org failed: {err}"))
        }
    }
}

impl RandomSource for RandomOrgClient {
    async fn fetch_fraction(&self) -> Result<f64, RandomSourceError> {
        tracing::debug!(url = %self.url, "Fetching random number from random.org");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RandomSourceError::Unavailable(format!(
                "random.org returned {status}"
            )));
        }

        let body = response.text().await.map_err(|e| self.classify(&e))?;
        let value = parse_fraction(&body).inspect_err(|_| {
            tracing::error!(body = body.trim(), "Invalid response from random.org");
        })?;

        tracing::info!(value, "Received random number");
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Fixed source
// ---------------------------------------------------------------------------

/// A source that always returns the same fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandomSource {
    value: f64,
}

impl FixedRandomSource {
    /// Create a source returning `value` on every draw.
    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

impl RandomSource for FixedRandomSource {
    async fn fetch_fraction(&self) -> Result<f64, RandomSourceError> {
        Ok(self.value)
    }
}
