//! Feed retrieval.
//!
//! This module defines the [`FeedFetcher`] trait, the seam between the run
//! coordinator and the network, plus the shared item and snapshot types.
//! The only production implementation is [`RssFetcher`].
//!
//! ## Adding a new format
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Implement [`FeedFetcher`] for your struct, producing a [`FetchedFeed`].
//! 3. Add `mod atom;` below and re-export it.
//!
//! Deduplication and persistence never look at the wire format, only at
//! [`FeedItem::identity`].

mod feed_item;
mod rss;

pub use feed_item::{Enclosure, FeedItem, FeedSnapshot};
pub use self::rss::RssFetcher;

use crate::error::SourceError;

/// A decoded feed before deduplication: the channel envelope and every item
/// the source currently lists, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedFeed {
    pub channel_title: String,
    pub channel_language: String,
    pub items: Vec<FeedItem>,
}

/// Retrieves and decodes one source.
///
/// Called from several worker threads at once, so implementations must be
/// [`Sync`].  Errors are reported per source and never abort the run.
pub trait FeedFetcher: Sync {
    /// Fetch `address` and decode it.
    ///
    /// Transport failures and non-2xx answers are [`SourceError::Fetch`];
    /// payloads that do not decode are [`SourceError::Parse`].
    fn fetch(&self, address: &str) -> Result<FetchedFeed, SourceError>;
}
