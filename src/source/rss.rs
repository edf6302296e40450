//! RSS fetcher.
//!
//! Retrieves a feed over HTTP with a blocking [`reqwest`] client and decodes it
//! with the [`rss`] crate.  The decoding half ([`RssFetcher::parse_channel`])
//! is a pure function so tests can exercise it without the network.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use tracing::debug;

use super::{Enclosure, FeedFetcher, FeedItem, FetchedFeed};
use crate::config::FetchConfig;
use crate::error::{FetchCause, SourceError};

/// Fetches and parses RSS 2.0 feeds.
pub struct RssFetcher {
    client: Client,
}

impl RssFetcher {
    /// Build a fetcher whose requests are bounded by `config.timeout_secs`.
    ///
    /// A hung source then surfaces as a timed-out [`SourceError::Fetch`]
    /// instead of stalling the run.
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Map an already-fetched [`rss::Channel`] into a [`FetchedFeed`].
    pub fn parse_channel(channel: &rss::Channel) -> FetchedFeed {
        let items = channel
            .items()
            .iter()
            .map(|item| {
                let pub_date = item.pub_date().unwrap_or_default().to_string();

                let enclosure = item
                    .enclosure()
                    .filter(|e| !e.url().is_empty())
                    .map(|e| Enclosure {
                        url: e.url().to_string(),
                        length: e.length().to_string(),
                        mime_type: e.mime_type().to_string(),
                    });

                FeedItem {
                    title: item.title().unwrap_or_default().to_string(),
                    link: item.link().unwrap_or_default().to_string(),
                    description: item.description().unwrap_or_default().to_string(),
                    published: parse_pub_date(&pub_date),
                    pub_date,
                    enclosure,
                    guid: item.guid().map(|g| g.value().to_string()).unwrap_or_default(),
                }
            })
            .collect();

        FetchedFeed {
            channel_title: channel.title().to_string(),
            channel_language: channel.language().unwrap_or_default().to_string(),
            items,
        }
    }
}

impl FeedFetcher for RssFetcher {
    fn fetch(&self, address: &str) -> Result<FetchedFeed, SourceError> {
        let fetch_err = |cause: FetchCause| SourceError::Fetch {
            address: address.to_string(),
            cause,
        };

        let response = self
            .client
            .get(address)
            .send()
            .map_err(|e| fetch_err(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(FetchCause::Status(status)));
        }

        let body = response.bytes().map_err(|e| fetch_err(e.into()))?;
        debug!(address, bytes = body.len(), "fetched feed body");

        let channel = rss::Channel::read_from(body.as_ref()).map_err(|source| SourceError::Parse {
            address: address.to_string(),
            source,
        })?;

        Ok(Self::parse_channel(&channel))
    }
}

/// Parse an RSS publication date, tolerating a redundant zone name after the
/// numeric offset (`"Mon, 02 Jan 2006 15:04:05 -0700 GMT"`).
///
/// Returns `None` instead of failing; callers keep the raw string.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S %z GMT"))
        .or_else(|_| DateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S %z UTC"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
