//! # Feeds and the optimistic merger
//!
//! A feed is the in-memory, ordered form of one collection as a page sees
//! it. After a successful write the new record is merged at the position a
//! re-fetch would give it — a prepend for newest-first feeds — tagged
//! pending until the next full load confirms it.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{FanRanking, Interview, ReviewComment, TrackComment};

/// Where a feed entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    /// Fetched from the store; the timestamp is authoritative.
    Fetched,
    /// Merged optimistically after a write; the timestamp is
    /// client-synthesized until the next load reconciles it.
    Pending,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry<T> {
    #[serde(flatten)]
    pub record: T,
    pub provenance: Provenance,
}

/// Position of a record relative to another within its feed.
/// `Less` means "appears earlier".
pub trait FeedOrder {
    fn feed_cmp(&self, other: &Self) -> Ordering;
}

/// An ordered in-memory list of one collection's records.
#[derive(Debug, Clone)]
pub struct Feed<T> {
    entries: Vec<FeedEntry<T>>,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: FeedOrder> Feed<T> {
    /// Builds a feed from a fresh fetch. The sort is stable, so re-sorting
    /// an already-ordered list yields the identical sequence.
    pub fn from_fetched(records: Vec<T>) -> Self {
        let mut entries: Vec<FeedEntry<T>> = records
            .into_iter()
            .map(|record| FeedEntry {
                record,
                provenance: Provenance::Fetched,
            })
            .collect();
        entries.sort_by(|a, b| a.record.feed_cmp(&b.record));
        Self { entries }
    }

    /// Merges a freshly created record without a re-fetch, at the position a
    /// stable re-sort would produce (after any entry that compares equal).
    pub fn merge(&mut self, record: T) {
        let at = self
            .entries
            .partition_point(|entry| entry.record.feed_cmp(&record) != Ordering::Greater);
        self.entries.insert(
            at,
            FeedEntry {
                record,
                provenance: Provenance::Pending,
            },
        );
    }

    /// Replaces the feed with the result of a follow-up fetch, dropping the
    /// pending tags; the store's timestamps are authoritative from here.
    pub fn reload(&mut self, records: Vec<T>) {
        *self = Self::from_fetched(records);
    }

    pub fn entries(&self) -> &[FeedEntry<T>] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FeedOrder for Interview {
    /// Newest first; ties broken by ascending id for deterministic output.
    fn feed_cmp(&self, other: &Self) -> Ordering {
        other
            .date
            .instant
            .cmp(&self.date.instant)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl FeedOrder for FanRanking {
    fn feed_cmp(&self, other: &Self) -> Ordering {
        other.created_at.instant.cmp(&self.created_at.instant)
    }
}

impl FeedOrder for ReviewComment {
    fn feed_cmp(&self, other: &Self) -> Ordering {
        other.created_at.instant.cmp(&self.created_at.instant)
    }
}

impl FeedOrder for TrackComment {
    fn feed_cmp(&self, other: &Self) -> Ordering {
        other.created_at.instant.cmp(&self.created_at.instant)
    }
}
