//! Error type shared by the fetch, extract, and feed stages.
//!
//! Nothing in the pipeline recovers from these; every variant aborts the run
//! before the feed file is touched (write failures excepted).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The news page answered with something other than `200 OK`.
    #[error("failed to fetch {url}: status code {status}")]
    Fetch { url: String, status: u16 },

    /// Transport-level failure (DNS, TLS, connection reset, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A news item date did not match `%d. %B %Y`.
    #[error("news date {input:?} does not match \"%d. %B %Y\"")]
    DateParse {
        input: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// A news item container lacked one of its required parts.
    #[error("news item is missing its {0}")]
    MissingElement(&'static str),

    #[error("could not parse existing feed: {0}")]
    FeedParse(#[source] atom_syndication::Error),

    /// A stored entry has no `<link>` to recover the news item's href from.
    #[error("feed entry {id:?} has no link")]
    EntryWithoutLink { id: String },

    #[error("could not serialize feed: {0}")]
    FeedWrite(#[source] atom_syndication::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
