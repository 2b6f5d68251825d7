//! Merging freshly scraped entries into the stored timeline.

use crate::models::NewsEntry;
use itertools::Itertools;
use tracing::{debug, instrument};

/// Combine stored and freshly scraped entries into one duplicate-free list.
///
/// `existing` comes first, then `new`; each keeps its internal order. When
/// two entries share an [`identity key`](NewsEntry::identity_key) the first
/// one wins, so an entry already in the feed is never replaced by a rescrape.
/// The result is not re-sorted by date.
#[instrument(level = "info", skip_all, fields(existing = existing.len(), new = new.len()))]
pub fn merge_entries(existing: Vec<NewsEntry>, new: Vec<NewsEntry>) -> Vec<NewsEntry> {
    let total = existing.len() + new.len();
    let merged: Vec<NewsEntry> = existing
        .into_iter()
        .chain(new)
        .unique_by(NewsEntry::identity_key)
        .collect();

    debug!(
        merged = merged.len(),
        dropped = total - merged.len(),
        "Merged news entries"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(title: &str, day: u32, link: &str) -> NewsEntry {
        NewsEntry {
            date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            title: title.to_string(),
            paragraph: format!("{title} via {link}"),
            link: link.to_string(),
        }
    }

    fn titles(entries: &[NewsEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_existing_wins_over_new_duplicate() {
        let existing = vec![entry("A", 1, "/old")];
        let new = vec![entry("A", 1, "/new")];

        let merged = merge_entries(existing, new);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].link, "/old");
        assert_eq!(merged[0].paragraph, "A via /old");
    }

    #[test]
    fn test_same_title_different_day_is_kept() {
        let merged = merge_entries(vec![entry("A", 1, "/a")], vec![entry("A", 2, "/a")]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_duplicates_within_new_keep_first() {
        let new = vec![entry("B", 2, "/first"), entry("B", 2, "/second")];

        let merged = merge_entries(Vec::new(), new);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].link, "/first");
    }

    #[test]
    fn test_order_is_existing_then_new_unsorted() {
        let existing = vec![entry("C", 3, "/c"), entry("A", 1, "/a")];
        let new = vec![entry("D", 4, "/d"), entry("A", 1, "/a"), entry("B", 2, "/b")];

        let merged = merge_entries(existing, new);

        assert_eq!(titles(&merged), vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let new = vec![entry("A", 1, "/a"), entry("B", 2, "/b")];

        let first = merge_entries(Vec::new(), new.clone());
        let second = merge_entries(first.clone(), new);

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_entries(Vec::new(), Vec::new()).is_empty());
    }
}
