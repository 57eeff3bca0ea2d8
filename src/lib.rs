//! # Follower Harvest
//!
//! Harvests the follower list of an account from a cursor-paginated GraphQL
//! timeline, one page at a time, waiting out rate limits and transient empty
//! pages.
//!
//! ## Main Components
//!
//! - [`QueryBuilder`]: turns a [`Cursor`] into the request URL
//! - [`HttpPageFetcher`]: performs one request and decodes the page
//! - [`Crawler`]: the pagination loop, producing a [`RunState`]
//! - [`Config`]: credentials and run settings resolved at startup
//!
//! ## Example
//!
//! ```no_run
//! use follower_harvest::{Config, Crawler, HttpPageFetcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let fetcher = HttpPageFetcher::new(&config)?;
//!     let crawler = Crawler::new(fetcher, &config);
//!
//!     let state = crawler.run(config.initial_cursor.clone()).await?;
//!     for user in state.followers.iter() {
//!         println!("{}", user.id);
//!     }
//!     Ok(())
//! }
//! ```

mod args;
pub mod config;
mod crawler;
pub mod error;
mod fetcher;
pub mod model;
pub mod query;

pub use crate::args::Args;
pub use crate::config::{Config, Credentials};
pub use crate::crawler::{Crawler, Followers, RunState};
pub use crate::error::{Error, Result};
pub use crate::fetcher::{rate_limit_reset, FetchOutcome, HttpPageFetcher, PageSource};
pub use crate::model::{Cursor, Page, UserRecord};
pub use crate::query::QueryBuilder;
