use std::error::Error;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use follower_harvest::{Args, Config, Crawler, HttpPageFetcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    match &args.env_file {
        Some(path) => {
            dotenv::from_path(path)?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    // Fail before any request if a credential is missing.
    let config = match Config::from_env() {
        Ok(config) => config.with_args(&args),
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    info!(
        "Harvesting followers of {} for up to {} pages",
        config.user_id, config.max_pages
    );

    let fetcher = HttpPageFetcher::new(&config)?;
    let crawler = Crawler::new(fetcher, &config).with_progress(progress_bar(args.quiet));

    let state = match crawler.run(config.initial_cursor.clone()).await {
        Ok(state) => state,
        Err(e) => {
            error!("Crawl aborted: {}", e);
            return Err(e.into());
        }
    };

    for user in state.followers.iter() {
        info!("{}", user.id);
    }

    info!(
        "Collected {} followers over {} pages ({} rate-limit waits, {} empty-page retries); next cursor {}",
        state.followers.len(),
        state.pages,
        state.rate_limit_waits,
        state.empty_page_retries,
        state.cursor
    );
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
