//! Data models for scraped news entries and the Atom feed they are stored in.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsEntry`]: One news item, either scraped from the page or recovered
//!   from the previously written feed
//! - [`FeedMetadata`]: The fixed feed-level constants
//! - [`FeedDocument`], [`FeedEntry`], [`FeedLink`]: Typed Atom records; the
//!   conversion to and from XML lives in [`crate::outputs::atom`]
//!
//! Field names on the feed records follow the Atom element names.

use crate::error::FeedError;
use crate::utils::format_timestamp;
use chrono::{DateTime, SubsecRound, Utc};

/// The news page that is scraped, also used as the feed's link and id.
pub const NEWSFEED_URL: &str = "https://p2pempire.com/en/newsfeed";

/// Where the feed is written when no `--output` is given.
pub const DEFAULT_FEED_PATH: &str = "P2PEmpire.xml";

/// A single news item.
///
/// Entries are values: once built they are only ever kept or dropped, never
/// edited.
///
/// # Fields
///
/// * `date` - Publication date at UTC midnight, second precision
/// * `title` - Trimmed headline text
/// * `paragraph` - Trimmed summary text
/// * `link` - The item's href, absolute or relative, exactly as found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsEntry {
    pub date: DateTime<Utc>,
    pub title: String,
    pub paragraph: String,
    pub link: String,
}

impl NewsEntry {
    /// The deduplication key: `"{title} - {YYYY-MM-DDTHH:MM:SSZ}"`.
    ///
    /// Two entries are the same item iff their keys are equal. Link and
    /// paragraph do not take part.
    pub fn identity_key(&self) -> String {
        format!("{} - {}", self.title, format_timestamp(self.date))
    }
}

/// Fixed feed-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    pub title: String,
    pub link: String,
    pub language: String,
    pub id: String,
}

impl Default for FeedMetadata {
    fn default() -> Self {
        Self {
            title: "P2P Empire".to_string(),
            link: NEWSFEED_URL.to_string(),
            language: "en".to_string(),
            id: NEWSFEED_URL.to_string(),
        }
    }
}

/// An Atom `<feed>` document.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub language: Option<String>,
    pub id: String,
    pub title: String,
    pub updated: DateTime<Utc>,
    pub links: Vec<FeedLink>,
    pub generator: Option<String>,
    pub entries: Vec<FeedEntry>,
}

/// An Atom `<entry>`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub updated: DateTime<Utc>,
    pub links: Vec<FeedLink>,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
}

/// An Atom `<link href="…" rel="…"/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLink {
    pub href: String,
    pub rel: String,
}

impl FeedLink {
    pub fn alternate(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: "alternate".to_string(),
        }
    }
}

impl FeedDocument {
    /// Build a feed with one `<entry>` per news entry, in the given order.
    ///
    /// The caller is expected to have deduplicated `entries` already; see
    /// [`crate::merge::merge_entries`].
    pub fn from_entries(metadata: &FeedMetadata, entries: &[NewsEntry]) -> Self {
        Self {
            language: Some(metadata.language.clone()),
            id: metadata.id.clone(),
            title: metadata.title.clone(),
            updated: Utc::now().trunc_subsecs(0),
            links: vec![FeedLink::alternate(metadata.link.clone())],
            generator: Some(format!(
                "{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            )),
            entries: entries.iter().map(FeedEntry::from).collect(),
        }
    }

    /// Recover the news entries stored in this feed, in document order.
    pub fn into_news_entries(self) -> Result<Vec<NewsEntry>, FeedError> {
        self.entries.into_iter().map(NewsEntry::try_from).collect()
    }
}

impl FeedEntry {
    /// The `rel="alternate"` link, or the first link when none is marked.
    pub fn primary_link(&self) -> Option<&FeedLink> {
        self.links
            .iter()
            .find(|link| link.rel == "alternate")
            .or_else(|| self.links.first())
    }
}

impl From<&NewsEntry> for FeedEntry {
    fn from(entry: &NewsEntry) -> Self {
        Self {
            id: entry.identity_key(),
            title: entry.title.clone(),
            updated: entry.date,
            links: vec![FeedLink::alternate(entry.link.clone())],
            summary: entry.paragraph.clone(),
            published: Some(entry.date),
        }
    }
}

impl TryFrom<FeedEntry> for NewsEntry {
    type Error = FeedError;

    /// The date comes from `<published>`, falling back to `<updated>`.
    fn try_from(entry: FeedEntry) -> Result<Self, Self::Error> {
        let link = match entry.primary_link() {
            Some(link) => link.href.clone(),
            None => return Err(FeedError::EntryWithoutLink { id: entry.id }),
        };
        Ok(Self {
            date: entry.published.unwrap_or(entry.updated).trunc_subsecs(0),
            title: entry.title,
            paragraph: entry.summary,
            link,
        })
    }
}
