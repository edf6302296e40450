//! Command line and the sources file.
//!
//! The sources file is TOML:
//!
//! ```toml
//! [fetch]
//! timeout_secs = 20
//! workers = 4
//!
//! [[source]]
//! name = "TechCrunch.com"
//! url = "https://techcrunch.com/feed/"
//! ```
//!
//! Command-line flags win over the `[fetch]` table, which wins over
//! [`FetchConfig::default`].

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::registry::SourceRegistry;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// TOML file listing the feeds to poll.
    #[arg(long, default_value = "feeds.toml")]
    pub sources: PathBuf,

    /// JSON file holding identifiers seen in earlier runs.
    #[arg(long, default_value = "guids.json")]
    pub seen: PathBuf,

    /// Directory receiving the per-run `data_<micros>.json` file.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum number of feeds fetched at the same time.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Print every new item of this source (display name or channel title).
    #[arg(long, value_name = "NAME")]
    pub show: Option<String>,

    /// Open the interactive browser after the run.
    #[arg(long)]
    pub browse: bool,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Knobs for the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub workers: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("feed-delve/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            workers: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
}

/// Parsed sources file.
#[derive(Debug, Default, Deserialize)]
pub struct SourcesFile {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceSpec>,
}

impl SourcesFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Build the registry, skipping entries it rejects.
    pub fn registry(&self) -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        for spec in &self.sources {
            if let Err(e) = registry.add(spec.name.as_str(), spec.url.as_str()) {
                warn!(name = %spec.name, error = %e, "skipping source");
            }
        }
        registry
    }

    /// Fetch settings with command-line overrides applied.
    pub fn fetch_config(&self, cli: &Cli) -> FetchConfig {
        let mut config = self.fetch.clone();
        if let Some(timeout) = cli.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(workers) = cli.workers {
            config.workers = workers;
        }
        config.workers = config.workers.max(1);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[fetch]
timeout_secs = 5

[[source]]
name = "One"
url = "https://one.example.com/rss"

[[source]]
name = "Dup"
url = "https://one.example.com/rss"

[[source]]
name = "Empty"
url = ""

[[source]]
name = "Two"
url = "https://two.example.com/rss"
"#;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("feed-delve").chain(args.iter().copied()))
    }

    #[test]
    fn cli_defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.sources, PathBuf::from("feeds.toml"));
        assert_eq!(cli.seen, PathBuf::from("guids.json"));
        assert!(cli.timeout.is_none());
        assert!(!cli.browse);
    }

    #[test]
    fn registry_skips_rejected_entries() {
        let file = SourcesFile::parse(SAMPLE).unwrap();
        let registry = file.registry();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.name(0), Some("One"));
        assert_eq!(registry.name(1), Some("Two"));
    }

    #[test]
    fn file_values_override_defaults() {
        let file = SourcesFile::parse(SAMPLE).unwrap();
        let config = file.fetch_config(&cli(&[]));

        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.workers, FetchConfig::default().workers);
        assert!(config.user_agent.starts_with("feed-delve/"));
    }

    #[test]
    fn cli_overrides_file() {
        let file = SourcesFile::parse(SAMPLE).unwrap();
        let config = file.fetch_config(&cli(&["--timeout", "2", "--workers", "0"]));

        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.workers, 1, "worker count is clamped");
    }

    #[test]
    fn empty_file_is_valid() {
        let file = SourcesFile::parse("").unwrap();
        assert!(file.sources.is_empty());
        assert_eq!(file.fetch, FetchConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(SourcesFile::parse("[[source]]\nname = 3").is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourcesFile::load(&dir.path().join("feeds.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeds.toml");
        fs::write(&path, "[[source]\n").unwrap();

        let err = SourcesFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("feeds.toml"));
    }
}
