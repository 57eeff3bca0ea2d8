//! Error types for the follower harvester.
//!
//! Rate limiting and empty pages are not errors: the fetcher reports the
//! former as a [`FetchOutcome`](crate::FetchOutcome) and the crawler handles
//! both by waiting. Everything in [`Error`] ends the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required environment variables: {}", .keys.join(", "))]
    MissingConfig { keys: Vec<String> },

    #[error("invalid header value for '{name}'")]
    InvalidHeader { name: String },

    #[error("failed to encode query: {0}")]
    Query(#[source] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("failed to decode page: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed cursor marker: {message}")]
    MalformedCursor { message: String },
}

impl Error {
    pub fn missing_config(keys: Vec<String>) -> Self {
        Self::MissingConfig { keys }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn malformed_cursor(message: impl Into<String>) -> Self {
        Self::MalformedCursor {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_config(vec!["X_KDT".to_string(), "CURSOR_CIEL".to_string()]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: X_KDT, CURSOR_CIEL"
        );

        let err = Error::http_status(403, "forbidden");
        assert_eq!(err.to_string(), "HTTP 403: forbidden");

        let err = Error::malformed_cursor("no separator in 'abc'");
        assert_eq!(
            err.to_string(),
            "malformed cursor marker: no separator in 'abc'"
        );
    }
}
