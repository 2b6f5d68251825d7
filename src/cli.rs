//! Command-line interface definitions for the P2P Empire feed job.
//!
//! Every argument is optional. Run without arguments, the job scrapes the
//! P2P Empire newsfeed and updates `P2PEmpire.xml` in the working directory.

use crate::models::{DEFAULT_FEED_PATH, NEWSFEED_URL};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for the feed job.
///
/// # Examples
///
/// ```sh
/// # Scheduled run with the built-in defaults
/// p2p_empire_feed
///
/// # Write the feed somewhere else
/// p2p_empire_feed -o /srv/www/feeds/P2PEmpire.xml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News page to scrape
    #[arg(short, long, default_value = NEWSFEED_URL)]
    pub url: Url,

    /// Atom feed file to read previous entries from and overwrite
    #[arg(short, long, default_value = DEFAULT_FEED_PATH)]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["p2p_empire_feed"]);

        assert_eq!(cli.url.as_str(), "https://p2pempire.com/en/newsfeed");
        assert_eq!(cli.output, PathBuf::from("P2PEmpire.xml"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "p2p_empire_feed",
            "-u",
            "http://localhost:8080/en/newsfeed",
            "-o",
            "/tmp/feeds/out.xml",
        ]);

        assert_eq!(cli.url.as_str(), "http://localhost:8080/en/newsfeed");
        assert_eq!(cli.output, PathBuf::from("/tmp/feeds/out.xml"));
    }

    #[test]
    fn test_cli_rejects_invalid_url() {
        let result = Cli::try_parse_from(["p2p_empire_feed", "--url", "not a url"]);
        assert!(result.is_err());
    }
}
