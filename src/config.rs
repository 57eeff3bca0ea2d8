//! Run configuration and credentials.
//!
//! Everything the crawl needs from the environment is read once, up front,
//! into a [`Config`]. A missing value fails the run before any request is
//! made.

use std::env;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{Error, Result};
use crate::model::Cursor;
use crate::query::DEFAULT_ENDPOINT;
use crate::Args;

pub const USER_ID: &str = "X_USER_ID";
pub const CURSOR_FLOOR: &str = "CURSOR_FLOOR";
pub const CURSOR_CEILING: &str = "CURSOR_CIEL";
pub const CSRF_TOKEN: &str = "X_CSRF_TOKEN";
pub const BEARER_TOKEN: &str = "X_BEARER_AUTH_TOKEN";
pub const AUTH_TOKEN: &str = "X_AUTH_TOKEN";
pub const KDT: &str = "X_KDT";

/// Variables that must be present and non-blank.
pub const REQUIRED_KEYS: [&str; 7] = [
    CURSOR_FLOOR,
    CURSOR_CEILING,
    CSRF_TOKEN,
    BEARER_TOKEN,
    AUTH_TOKEN,
    KDT,
    USER_ID,
];

/// Session secrets copied from a logged-in browser.
#[derive(Clone)]
pub struct Credentials {
    pub csrf_token: String,
    pub bearer_token: String,
    pub auth_token: String,
    pub kdt: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl Credentials {
    /// Headers sent with every page request.
    ///
    /// `Accept-Encoding` is left to the HTTP client, which negotiates zstd
    /// and decompresses the body itself.
    pub fn headers(&self) -> Result<HeaderMap> {
        let cookie = format!(
            "kdt={}; ct0={}; auth_token={}; lang=en",
            self.kdt, self.csrf_token, self.auth_token
        );
        let authorization = format!("Bearer {}", self.bearer_token);

        let pairs: [(&'static str, &str); 16] = [
            ("accept", "*/*"),
            ("accept-language", "en-US,en;q=0.5"),
            ("content-type", "application/json"),
            ("x-twitter-auth-type", "OAuth2Session"),
            ("x-csrf-token", self.csrf_token.as_str()),
            ("x-twitter-client-language", "en"),
            ("x-client-transaction-id", "en"),
            ("x-twitter-active-user", "yes"),
            ("sec-fetch-dest", "empty"),
            ("sec-fetch-mode", "cors"),
            ("sec-fetch-site", "same-origin"),
            ("authorization", authorization.as_str()),
            ("cookie", cookie.as_str()),
            ("pragma", "no-cache"),
            ("cache-control", "no-cache"),
            ("te", "trailers"),
        ];

        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader {
                name: name.to_string(),
            })?;
            headers.insert(HeaderName::from_static(name), value);
        }
        Ok(headers)
    }
}

/// Everything a run needs, resolved before the first request.
#[derive(Debug, Clone)]
pub struct Config {
    pub user_id: String,
    pub initial_cursor: Cursor,
    pub credentials: Credentials,
    pub endpoint: String,
    pub max_pages: u32,
    pub request_timeout: Duration,
    pub empty_page_wait: Duration,
    pub rate_limit_fallback: Duration,
}

impl Config {
    /// Resolve configuration through `lookup`, reporting every missing key
    /// at once. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| value(**key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::missing_config(missing));
        }

        let get = |key: &str| value(key).unwrap_or_default();

        Ok(Config {
            user_id: get(USER_ID),
            initial_cursor: Cursor::new(get(CURSOR_FLOOR), get(CURSOR_CEILING)),
            credentials: Credentials {
                csrf_token: get(CSRF_TOKEN),
                bearer_token: get(BEARER_TOKEN),
                auth_token: get(AUTH_TOKEN),
                kdt: get(KDT),
            },
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_pages: 1000,
            request_timeout: Duration::from_secs(30),
            empty_page_wait: Duration::from_secs(10),
            rate_limit_fallback: Duration::from_secs(60),
        })
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Apply command line overrides.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = endpoint.clone();
        }
        self.max_pages = args.max_pages;
        self.request_timeout = Duration::from_secs(args.timeout);
        self.empty_page_wait = Duration::from_secs(args.empty_page_wait);
        self.rate_limit_fallback = Duration::from_secs(args.rate_limit_fallback);
        self
    }
}
