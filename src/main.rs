//! # P2P Empire Feed
//!
//! A scheduled batch job that scrapes the P2P Empire newsfeed page and keeps
//! an Atom feed of its news items. Each run adds newly listed items to the
//! items already recorded in the feed file, never duplicating one.
//!
//! ## Usage
//!
//! ```sh
//! p2p_empire_feed                       # writes ./P2PEmpire.xml
//! RUST_LOG=debug p2p_empire_feed -o feeds/P2PEmpire.xml
//! ```
//!
//! ## Pipeline
//!
//! Everything runs once, in order, on a single thread:
//! 1. **Fetching**: GET the news page, failing on any status but 200
//! 2. **Extracting**: parse every `news-box-wrapper` into a [`models::NewsEntry`]
//! 3. **Loading**: read the entries stored by the previous run (none on the first run)
//! 4. **Merging**: existing entries first, then new ones, first occurrence wins
//! 5. **Writing**: overwrite the feed file with the merged Atom document
//!
//! Any failure aborts the run with a non-zero exit code. Every failure
//! before step 5 leaves the previous feed file as it was.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod error;
mod merge;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use models::FeedMetadata;
use outputs::atom::FeedStore;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("p2p_empire_feed starting up");

    let args = Cli::parse();
    debug!(url = %args.url, output = %args.output.display(), "Parsed CLI arguments");

    // Fail on an unwritable destination before touching the network.
    ensure_writable_dir(&args.output).await?;

    // ---- Fetch and extract ----
    let html = scrapers::p2pempire::fetch_page(args.url.as_str()).await?;
    let new_entries = scrapers::p2pempire::parse_news(&html)?;
    let scraped = new_entries.len();

    // ---- Merge into the stored feed ----
    let store = FeedStore::new(&args.output);
    let written = store.update(&FeedMetadata::default(), new_entries).await?;

    let elapsed = start_time.elapsed();
    info!(
        scraped,
        written,
        path = %store.path().display(),
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
