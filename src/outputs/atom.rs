//! Atom feed serialization and the on-disk feed store.
//!
//! The feed file is the only state that survives between runs. Each run
//! loads it, merges the freshly scraped entries in, and overwrites it.
//!
//! # File Format
//!
//! ```text
//! <?xml version="1.0"?>
//! <feed xmlns="http://www.w3.org/2005/Atom" xml:lang="en">
//!   <id>https://p2pempire.com/en/newsfeed</id>
//!   <title>P2P Empire</title>
//!   ...
//!   <entry>
//!     <id>A - 2024-01-01T00:00:00Z</id>
//!     ...
//!   </entry>
//! </feed>
//! ```

use crate::error::FeedError;
use crate::merge::merge_entries;
use crate::models::{FeedDocument, FeedEntry, FeedLink, FeedMetadata, NewsEntry};
use crate::utils::parent_dir;
use atom_syndication::{Entry, Feed, FixedDateTime, Generator, Link, Text, WriteConfig};
use chrono::{DateTime, SubsecRound, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Serialize a feed document as pretty-printed Atom XML.
///
/// Timestamps are written as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn to_xml(document: &FeedDocument) -> Result<String, FeedError> {
    let config = WriteConfig {
        write_document_declaration: true,
        indent_size: Some(2),
    };
    let bytes = to_atom_feed(document)
        .write_with_config(Vec::new(), config)
        .map_err(FeedError::FeedWrite)?;

    let mut xml = zulu_timestamps(String::from_utf8_lossy(&bytes).into_owned());
    xml.push('\n');
    Ok(xml)
}

/// Parse Atom XML into a feed document.
///
/// Elements the feed records don't carry (authors, content, categories,
/// extensions) are skipped.
pub fn from_xml(xml: &str) -> Result<FeedDocument, FeedError> {
    let feed = Feed::read_from(xml.as_bytes()).map_err(FeedError::FeedParse)?;
    Ok(from_atom_feed(&feed))
}

// atom_syndication renders a zero offset as `+00:00`. Text content can't hold
// a raw `</`, so these suffixes only ever end a timestamp element.
fn zulu_timestamps(xml: String) -> String {
    xml.replace("+00:00</published>", "Z</published>")
        .replace("+00:00</updated>", "Z</updated>")
}

fn to_atom_feed(document: &FeedDocument) -> Feed {
    let mut feed = Feed::default();
    feed.set_id(document.id.clone());
    feed.set_title(Text::plain(document.title.clone()));
    feed.set_updated(document.updated.fixed_offset());
    feed.set_lang(document.language.clone());
    feed.set_links(document.links.iter().map(to_atom_link).collect::<Vec<_>>());
    feed.set_generator(document.generator.as_ref().map(|value| {
        let mut generator = Generator::default();
        generator.set_value(value.clone());
        generator
    }));
    feed.set_entries(document.entries.iter().map(to_atom_entry).collect::<Vec<_>>());
    feed
}

fn to_atom_entry(entry: &FeedEntry) -> Entry {
    let mut atom = Entry::default();
    atom.set_id(entry.id.clone());
    atom.set_title(Text::plain(entry.title.clone()));
    atom.set_updated(entry.updated.fixed_offset());
    atom.set_links(entry.links.iter().map(to_atom_link).collect::<Vec<_>>());
    atom.set_summary(Some(Text::plain(entry.summary.clone())));
    atom.set_published(entry.published.map(|dt| dt.fixed_offset()));
    atom
}

fn to_atom_link(link: &FeedLink) -> Link {
    let mut atom = Link::default();
    atom.set_href(link.href.clone());
    atom.set_rel(link.rel.clone());
    atom
}

fn from_atom_feed(feed: &Feed) -> FeedDocument {
    FeedDocument {
        language: feed.lang().map(str::to_string),
        id: feed.id().to_string(),
        title: feed.title().as_str().to_string(),
        updated: to_utc(feed.updated()),
        links: feed.links().iter().map(from_atom_link).collect(),
        generator: feed.generator().map(|g| g.value().to_string()),
        entries: feed.entries().iter().map(from_atom_entry).collect(),
    }
}

fn from_atom_entry(entry: &Entry) -> FeedEntry {
    FeedEntry {
        id: entry.id().to_string(),
        title: entry.title().as_str().to_string(),
        updated: to_utc(entry.updated()),
        links: entry.links().iter().map(from_atom_link).collect(),
        summary: entry
            .summary()
            .map(|text| text.as_str().to_string())
            .unwrap_or_default(),
        published: entry.published().map(to_utc),
    }
}

fn from_atom_link(link: &Link) -> FeedLink {
    FeedLink {
        href: link.href().to_string(),
        rel: link.rel().to_string(),
    }
}

fn to_utc(dt: &FixedDateTime) -> DateTime<Utc> {
    dt.with_timezone(&Utc).trunc_subsecs(0)
}

/// The feed file at a fixed path.
#[derive(Debug, Clone)]
pub struct FeedStore {
    path: PathBuf,
}

impl FeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back the entries written by the previous run.
    ///
    /// A missing file is the first run ever and yields no entries.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<NewsEntry>, FeedError> {
        let xml = match fs::read_to_string(&self.path).await {
            Ok(xml) => xml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No existing feed; starting a new one");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let entries = from_xml(&xml)?.into_news_entries()?;
        info!(count = entries.len(), "Loaded existing feed entries");
        Ok(entries)
    }

    /// Overwrite the feed file with `document`, creating its directory if
    /// needed.
    ///
    /// The file is written in place, so a crash mid-write can leave it
    /// truncated.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, document: &FeedDocument) -> Result<(), FeedError> {
        let xml = to_xml(document)?;
        fs::create_dir_all(parent_dir(&self.path)).await?;
        fs::write(&self.path, &xml).await?;
        info!(
            entries = document.entries.len(),
            bytes = xml.len(),
            "Wrote Atom feed"
        );
        Ok(())
    }

    /// Merge `new_entries` into the stored feed and write the result.
    ///
    /// Returns the number of entries in the written feed.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), new = new_entries.len()))]
    pub async fn update(
        &self,
        metadata: &FeedMetadata,
        new_entries: Vec<NewsEntry>,
    ) -> Result<usize, FeedError> {
        let existing = self.load().await?;
        let merged = merge_entries(existing, new_entries);
        let document = FeedDocument::from_entries(metadata, &merged);
        self.save(&document).await?;
        Ok(merged.len())
    }
}
