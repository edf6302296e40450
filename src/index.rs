//! Per-run results and the read-only queries presentation code relies on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{QueryError, StoreError};
use crate::registry::SourceRegistry;
use crate::seen::write_atomic;
use crate::source::{FeedItem, FeedSnapshot};

/// Snapshots of the sources that had new items, keyed by registry position.
///
/// Filled by the run coordinator; read-only once [`crate::poll::run`] returns.
#[derive(Debug, Default)]
pub struct ResultIndex {
    by_position: BTreeMap<usize, FeedSnapshot>,
    /// Positions in the order their results arrived.
    completion_order: Vec<usize>,
}

impl ResultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the snapshot for `position`.  Snapshots without new items are
    /// not kept.
    pub(crate) fn record(&mut self, position: usize, snapshot: FeedSnapshot) {
        if !snapshot.has_new_items {
            return;
        }
        if self.by_position.insert(position, snapshot).is_none() {
            self.completion_order.push(position);
        }
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FeedSnapshot> {
        self.by_position.get(&position)
    }

    /// `(position, snapshot)` ordered by registry position.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &FeedSnapshot)> {
        self.by_position.iter().map(|(pos, snap)| (*pos, snap))
    }

    /// Updated sources in completion order.
    pub fn completed(&self) -> impl Iterator<Item = &FeedSnapshot> {
        self.completion_order
            .iter()
            .filter_map(|pos| self.by_position.get(pos))
    }

    /// Every updated source, in registry order.
    pub fn updated(&self) -> Result<Vec<&FeedSnapshot>, QueryError> {
        if self.is_empty() {
            return Err(QueryError::EmptyResultSet);
        }
        Ok(self.by_position.values().collect())
    }

    /// Look a snapshot up by display name or channel title (exact match).
    pub fn find(&self, name_or_title: &str) -> Result<&FeedSnapshot, QueryError> {
        if self.is_empty() {
            return Err(QueryError::EmptyResultSet);
        }
        self.by_position
            .values()
            .find(|s| s.display_name == name_or_title || s.channel_title == name_or_title)
            .ok_or_else(|| QueryError::NotFound(name_or_title.to_string()))
    }

    /// The `n`th new item (zero based) of the named source.
    pub fn item(&self, name_or_title: &str, n: usize) -> Result<&FeedItem, QueryError> {
        let snapshot = self.find(name_or_title)?;
        snapshot
            .items
            .get(n)
            .ok_or_else(|| QueryError::NotFound(format!("item {n} of {name_or_title}")))
    }
}

/// Contents of the per-run `data_<micros>.json` file.
#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    #[serde(flatten)]
    pub registry: &'a SourceRegistry,
    /// Snapshots with new items, in completion order.
    pub objects: Vec<&'a FeedSnapshot>,
}

impl<'a> RunOutput<'a> {
    pub fn new(registry: &'a SourceRegistry, index: &'a ResultIndex) -> Self {
        Self {
            registry,
            objects: index.completed().collect(),
        }
    }

    /// Write into `dir` under a name carrying `run_micros` so earlier runs are
    /// never overwritten.  Returns the written path.
    pub fn write(&self, dir: &Path, run_micros: i64) -> Result<PathBuf, StoreError> {
        let path = dir.join(format!("data_{run_micros}.json"));
        let json = serde_json::to_vec_pretty(self).map_err(|source| StoreError::Encode {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, &json)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str, title: &str, guids: &[&str]) -> FeedSnapshot {
        FeedSnapshot {
            display_name: name.to_string(),
            channel_title: title.to_string(),
            channel_language: "en".to_string(),
            items: guids
                .iter()
                .map(|g| FeedItem {
                    guid: g.to_string(),
                    title: format!("title {g}"),
                    ..FeedItem::default()
                })
                .collect(),
            has_new_items: !guids.is_empty(),
            observed_at_ms: 1_700_000_000_000,
        }
    }

    fn sample() -> ResultIndex {
        let mut index = ResultIndex::new();
        index.record(2, snapshot("Wired/AI", "WIRED AI", &["w1", "w2"]));
        index.record(0, snapshot("TechCrunch", "TechCrunch", &["t1"]));
        index
    }

    #[test]
    fn empty_index_queries_report_empty_result_set() {
        let index = ResultIndex::new();
        assert_eq!(index.updated().unwrap_err(), QueryError::EmptyResultSet);
        assert_eq!(index.find("x").unwrap_err(), QueryError::EmptyResultSet);
        assert_eq!(index.item("x", 0).unwrap_err(), QueryError::EmptyResultSet);
    }

    #[test]
    fn record_skips_snapshots_without_news() {
        let mut index = ResultIndex::new();
        index.record(0, snapshot("quiet", "Quiet", &[]));
        assert!(index.is_empty());
    }

    #[test]
    fn updated_is_in_registry_order_and_completed_in_arrival_order() {
        let index = sample();

        let by_registry: Vec<_> = index
            .updated()
            .unwrap()
            .iter()
            .map(|s| s.display_name.as_str())
            .collect();
        assert_eq!(by_registry, vec!["TechCrunch", "Wired/AI"]);

        let by_arrival: Vec<_> = index.completed().map(|s| s.display_name.as_str()).collect();
        assert_eq!(by_arrival, vec!["Wired/AI", "TechCrunch"]);
    }

    #[test]
    fn find_matches_name_or_channel_title() {
        let index = sample();
        assert_eq!(index.find("Wired/AI").unwrap().channel_title, "WIRED AI");
        assert_eq!(index.find("WIRED AI").unwrap().display_name, "Wired/AI");
        assert_eq!(
            index.find("wired/ai").unwrap_err(),
            QueryError::NotFound("wired/ai".into())
        );
    }

    #[test]
    fn item_by_position() {
        let index = sample();
        assert_eq!(index.item("Wired/AI", 1).unwrap().guid, "w2");
        assert!(matches!(
            index.item("Wired/AI", 2),
            Err(QueryError::NotFound(_))
        ));
        assert!(matches!(index.item("missing", 0), Err(QueryError::NotFound(_))));
    }

    #[test]
    fn get_by_position() {
        let index = sample();
        assert_eq!(index.get(0).unwrap().display_name, "TechCrunch");
        assert!(index.get(1).is_none());
        assert_eq!(index.iter().map(|(p, _)| p).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn run_output_file_layout() {
        let mut registry = SourceRegistry::new();
        registry.add("TechCrunch", "https://techcrunch.com/feed/").unwrap();
        registry.add("Quiet", "https://quiet.example.com/rss").unwrap();
        registry.add("Wired/AI", "https://www.wired.com/feed/tag/ai/latest/rss").unwrap();
        let index = sample();

        let dir = tempfile::tempdir().unwrap();
        let path = RunOutput::new(&registry, &index)
            .write(dir.path(), 1_700_000_000_123_456)
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "data_1700000000123456.json");

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["links"].as_array().unwrap().len(), 3);
        assert_eq!(json["names"][1], "Quiet");
        let objects = json["objects"].as_array().unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0]["display_name"], "Wired/AI");
        assert_eq!(objects[0]["items"][0]["guid"], "w1");
    }
}
