use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::{FetchOutcome, PageSource};
use crate::model::{Cursor, Entry, UserRecord};
use crate::query::QueryBuilder;

/// Append-only list of harvested followers, in page order.
#[derive(Debug, Clone, Default)]
pub struct Followers {
    records: Vec<UserRecord>,
}

impl Followers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UserRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[UserRecord] {
        &self.records
    }
}

/// State of one crawl, handed back to the caller when the page bound is
/// reached.
#[derive(Debug, Clone)]
pub struct RunState {
    pub cursor: Cursor,
    pub followers: Followers,
    /// Pages successfully consumed. Retries do not count.
    pub pages: u32,
    pub rate_limit_waits: u32,
    pub empty_page_retries: u32,
}

impl RunState {
    pub fn new(cursor: Cursor) -> Self {
        Self {
            cursor,
            followers: Followers::new(),
            pages: 0,
            rate_limit_waits: 0,
            empty_page_retries: 0,
        }
    }

    /// Append the user records among `entries`, returning how many were
    /// added. Cursor markers and unavailable accounts are skipped.
    fn absorb(&mut self, entries: &[Entry]) -> usize {
        let before = self.followers.len();
        for entry in entries {
            match entry.user() {
                Some(user) => self.followers.push(user.clone()),
                None if entry.cursor_value().is_some() => {
                    debug!("Skipping cursor entry '{}' among users", entry.entry_id)
                }
                None => warn!("Skipping entry '{}' without a user record", entry.entry_id),
            }
        }
        self.followers.len() - before
    }
}

/// Drives the paginated crawl, one page at a time.
pub struct Crawler<S> {
    source: S,
    query: QueryBuilder,
    max_pages: u32,
    empty_page_wait: Duration,
    rate_limit_fallback: Duration,
    progress: ProgressBar,
}

impl<S: PageSource> Crawler<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            source,
            query: QueryBuilder::new(config.endpoint.clone(), config.user_id.clone()),
            max_pages: config.max_pages,
            empty_page_wait: config.empty_page_wait,
            rate_limit_fallback: config.rate_limit_fallback,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on `progress` instead of a hidden bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        progress.set_length(u64::from(self.max_pages));
        self.progress = progress;
        self
    }

    /// Crawl from `initial` until `max_pages` pages have been consumed.
    ///
    /// Rate-limited and empty responses are retried with the same cursor and
    /// do not count toward the bound. Any error ends the run.
    pub async fn run(&self, initial: Cursor) -> Result<RunState> {
        let mut state = RunState::new(initial);

        while state.pages < self.max_pages {
            let url = self.query.url(&state.cursor)?;
            self.progress
                .set_message(format!("Fetching page {}", state.pages + 1));

            let page = match self.source.fetch(&url).await? {
                FetchOutcome::Page(page) => page,
                FetchOutcome::RateLimited { reset_at } => {
                    let wait = self.rate_limit_wait(reset_at, Utc::now());
                    warn!(
                        "Rate limit reached on page {}. Waiting {} seconds...",
                        state.pages + 1,
                        wait.as_secs()
                    );
                    self.progress
                        .set_message(format!("Rate limited - waiting {}s", wait.as_secs()));
                    state.rate_limit_waits += 1;
                    sleep(wait).await;
                    continue;
                }
            };

            let Some((users, bottom, top)) = page.split_markers() else {
                warn!(
                    "Page {} came back with {} entries. Retrying in {} seconds",
                    state.pages + 1,
                    page.entries.len(),
                    self.empty_page_wait.as_secs()
                );
                state.empty_page_retries += 1;
                sleep(self.empty_page_wait).await;
                continue;
            };

            debug!(
                bottom = ?bottom.cursor_value(),
                top = ?top.cursor_value(),
                "Cursor markers"
            );
            let next = marker_cursor(bottom)?;

            let added = state.absorb(users);
            state.cursor = next;
            state.pages += 1;
            self.progress.inc(1);

            info!(
                "Collected {} followers from page {} ({} total)",
                added,
                state.pages,
                state.followers.len()
            );
        }

        self.progress.finish_with_message(format!(
            "Finished: {} followers over {} pages",
            state.followers.len(),
            state.pages
        ));
        Ok(state)
    }

    fn rate_limit_wait(&self, reset_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Duration {
        match reset_at {
            // Negative when the reset has already passed.
            Some(reset) => (reset - now).to_std().unwrap_or(Duration::ZERO),
            None => self.rate_limit_fallback,
        }
    }
}

/// Next cursor from the bottom marker.
fn marker_cursor(entry: &Entry) -> Result<Cursor> {
    let value = entry.cursor_value().ok_or_else(|| {
        Error::malformed_cursor(format!(
            "entry '{}' in marker position is not a cursor",
            entry.entry_id
        ))
    })?;
    Cursor::parse(value)
}
