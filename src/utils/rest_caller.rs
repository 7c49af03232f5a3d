use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::cancellation::{await_or_cancel, sleep_or_cancel, CancelAware};

#[derive(Debug, Error)]
pub enum CallerError {
    #[error("failed to create request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("failed to make request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to read response: {0}")]
    Read(#[source] reqwest::Error),
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: usize,
        #[source]
        source: Box<CallerError>,
    },
    #[error("request cancelled")]
    Cancelled,
}

/// A single logical GET. Implementations own retrying; callers only see the
/// final outcome.
#[async_trait]
pub trait Caller: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, CallerError>;
}

#[derive(Clone, Debug)]
pub struct RestCallerConfig {
    /// Extra attempts after the first one.
    pub retries: usize,
    pub backoff_base: Duration,
    pub max_jitter: Duration,
}

impl Default for RestCallerConfig {
    fn default() -> Self {
        Self {
            retries: 0,
            backoff_base: Duration::from_millis(100),
            max_jitter: Duration::from_millis(100),
        }
    }
}

#[derive(Clone)]
pub struct RestCaller {
    config: RestCallerConfig,
    client: reqwest::Client,
    cancel: CancellationToken,
}

impl RestCaller {
    pub fn new(config: RestCallerConfig, cancel: CancellationToken) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            cancel,
        }
    }

    async fn do_request(&self, url: &str) -> Result<Vec<u8>, CallerError> {
        let request = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .build()
            .map_err(|e| CallerError::Request(e.without_url()))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| CallerError::Transport(e.without_url()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CallerError::Read(e.without_url()))?;

        if !status.is_success() {
            return Err(CallerError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let max_jitter_ms = self.config.max_jitter.as_millis() as u64;
        let jitter = if max_jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..max_jitter_ms))
        };

        exponential_backoff(self.config.backoff_base, attempt, jitter)
    }
}

/// Replaces the value of the `key` query parameter so URLs can be logged.
fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("key", _)) => "key=REDACTED",
            _ => pair,
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{base}?{query}")
}

/// `base * 2^attempt + jitter`, saturating instead of overflowing.
fn exponential_backoff(base: Duration, attempt: usize, jitter: Duration) -> Duration {
    let factor = u32::try_from(attempt)
        .ok()
        .and_then(|shift| 1u32.checked_shl(shift))
        .unwrap_or(u32::MAX);

    base.saturating_mul(factor).saturating_add(jitter)
}

#[async_trait]
impl Caller for RestCaller {
    async fn get(&self, url: &str) -> Result<Vec<u8>, CallerError> {
        let attempts = self.config.retries + 1;
        let redacted = redact_key(url);
        let mut attempt = 0;

        loop {
            debug!(attempt, url = %redacted, "sending request");

            let err = match await_or_cancel(&self.cancel, self.do_request(url)).await {
                CancelAware::Cancelled => return Err(CallerError::Cancelled),
                CancelAware::Value(Ok(body)) => return Ok(body),
                CancelAware::Value(Err(e)) => e,
            };

            if attempt + 1 >= attempts {
                return Err(CallerError::Exhausted {
                    attempts,
                    source: Box::new(err),
                });
            }

            let backoff = self.calculate_backoff(attempt);
            warn!(
                "attempt {} of {} failed, retrying in {}ms: {}",
                attempt + 1,
                attempts,
                backoff.as_millis(),
                err
            );

            if !sleep_or_cancel(&self.cancel, backoff).await {
                return Err(CallerError::Cancelled);
            }

            attempt += 1;
        }
    }
}
