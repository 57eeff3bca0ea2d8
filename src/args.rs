use std::path::PathBuf;

use clap::Parser;

/// Follower harvester: walks an account's follower timeline page by page,
/// following the continuation cursor and waiting out rate limits.
///
/// Credentials and the starting cursor are read from the environment (or a
/// `.env` file): X_USER_ID, CURSOR_FLOOR, CURSOR_CIEL, X_CSRF_TOKEN,
/// X_BEARER_AUTH_TOKEN, X_AUTH_TOKEN and X_KDT.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Args {
    /// Number of pages to consume before stopping.
    /// Rate-limited and empty responses are retried and do not count.
    #[clap(short = 'p', long, value_name = "NUM", default_value = "1000")]
    pub max_pages: u32,

    /// Followers endpoint to query instead of the default GraphQL URL.
    #[clap(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds.
    #[clap(short, long, value_name = "SECS", default_value = "30")]
    pub timeout: u64,

    /// Seconds to wait before retrying a page that came back empty.
    #[clap(long, value_name = "SECS", default_value = "10")]
    pub empty_page_wait: u64,

    /// Seconds to wait after a rate limit that carries no reset time.
    #[clap(long, value_name = "SECS", default_value = "60")]
    pub rate_limit_fallback: u64,

    /// Load environment variables from this file instead of `./.env`.
    #[clap(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv).
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors; hide the progress bar.
    #[clap(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
