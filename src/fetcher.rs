use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{FollowersResponse, Page};

/// Header carrying the Unix timestamp at which the rate-limit window resets.
pub const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Longest error body kept in [`Error::HttpStatus`].
const MAX_ERROR_BODY: usize = 512;

/// What a single page request produced.
#[derive(Debug)]
pub enum FetchOutcome {
    Page(Page),
    /// HTTP 429. `reset_at` is `None` when the reset header was absent or
    /// unreadable.
    RateLimited { reset_at: Option<DateTime<Utc>> },
}

/// One round-trip against the followers endpoint.
///
/// Implementations perform exactly one request per call and never retry;
/// retry policy belongs to the crawler.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome>;
}

/// [`PageSource`] backed by reqwest, negotiating zstd for the body.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0")
            .default_headers(config.credentials.headers()?)
            .timeout(config.request_timeout)
            .zstd(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        debug!("Requesting URL: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(FetchOutcome::RateLimited {
                reset_at: rate_limit_reset(response.headers()),
            });
        }

        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response.bytes().await?;
        let envelope: FollowersResponse = serde_json::from_slice(&body)?;
        Ok(FetchOutcome::Page(envelope.into()))
    }
}

/// Read the reset timestamp from a 429 response.
pub fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let raw = headers.get(RATE_LIMIT_RESET)?;
    let parsed = raw
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    if parsed.is_none() {
        warn!("Unreadable {} header: {:?}", RATE_LIMIT_RESET, raw);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_rate_limit_reset_parses_epoch() {
        let mut headers = HeaderMap::new();
        headers.insert(RATE_LIMIT_RESET, HeaderValue::from_static("1700000000"));

        let reset = rate_limit_reset(&headers).unwrap();
        assert_eq!(reset.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_rate_limit_reset_missing_or_garbage() {
        assert!(rate_limit_reset(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(RATE_LIMIT_RESET, HeaderValue::from_static("soon"));
        assert!(rate_limit_reset(&headers).is_none());
    }
}
