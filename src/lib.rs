//! Concurrent RSS polling with a durable record of already-seen entries.
//!
//! A run fetches every source in a [`SourceRegistry`] on a bounded worker
//! pool, keeps only entries missing from the [`SeenSet`], and collects one
//! [`FeedSnapshot`] per updated source into a [`ResultIndex`].

pub mod app;
pub mod config;
pub mod dedup;
pub mod error;
pub mod index;
pub mod input;
pub mod poll;
pub mod present;
pub mod registry;
pub mod seen;
pub mod source;
pub mod ui;

pub use index::ResultIndex;
pub use poll::{run, RunReport};
pub use registry::SourceRegistry;
pub use seen::SeenSet;
pub use source::{FeedFetcher, FeedItem, FeedSnapshot, RssFetcher};
