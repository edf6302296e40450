//! The item and snapshot types shared by every stage of a run.
//!
//! `FeedItem` is one entry of a fetched feed; `FeedSnapshot` is the new-items
//! view of one source for the current run.  Both serialize into the per-run
//! output file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Media attached to an item (podcast episodes, mostly).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: String,
    pub length: String,
    pub mime_type: String,
}

/// A single feed entry, normalised from the source format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,

    /// Publication date exactly as the feed wrote it.
    pub pub_date: String,

    /// Best-effort parse of [`pub_date`](Self::pub_date).
    ///
    /// `None` when the feed had no date or used a format we don't understand;
    /// the raw string is still available for display.
    pub published: Option<DateTime<Utc>>,

    pub enclosure: Option<Enclosure>,

    /// The feed-provided `<guid>`, verbatim.  May be empty.
    pub guid: String,
}

impl FeedItem {
    /// Key used by the seen-set.
    ///
    /// The guid when present, else the link, else a content hash.  Entries
    /// without a guid must not all collapse onto the empty string.
    pub fn identity(&self) -> String {
        if !self.guid.is_empty() {
            return self.guid.clone();
        }
        if !self.link.is_empty() {
            return self.link.clone();
        }
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.pub_date.as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.description.as_bytes());
        format!("sha256:{:x}", hasher.finalize())
    }

    /// Publication date for humans: parsed when possible, raw otherwise.
    pub fn display_date(&self) -> String {
        match self.published {
            Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
            None if !self.pub_date.is_empty() => self.pub_date.clone(),
            None => "no date".into(),
        }
    }
}

/// The new-items view of one source, created once per successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub display_name: String,
    pub channel_title: String,
    pub channel_language: String,

    /// Only the items that were new in this run, in feed order.
    pub items: Vec<FeedItem>,

    pub has_new_items: bool,
    pub observed_at_ms: i64,
}

impl FeedSnapshot {
    /// When the coordinator recorded this snapshot.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.observed_at_ms)
    }
}
