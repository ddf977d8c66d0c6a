use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Feeds fetched when the config file does not list any.
pub const DEFAULT_FEED_URLS: &[&str] = &[
    "https://tech.uzabase.com/rss",
    "https://news.yahoo.co.jp/rss/topics/top-picks.xml",
    "https://news.yahoo.co.jp/rss/topics/domestic.xml",
    "https://news.yahoo.co.jp/rss/topics/business.xml",
    "https://news.yahoo.co.jp/rss/media/vingtcinqw/all.xml",
];

/// Substring stripped from every feed by default.
pub const DEFAULT_REMOVE_TARGET: &str = "NewsPicks";

/// What to do when a feed cannot be fetched or named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Carry on with empty content / an empty filename (legacy behavior).
    Swallow,
    /// Log, record the feed as skipped, and carry on with the other feeds.
    #[default]
    Skip,
    /// Treat the error as fatal for the whole run.
    Abort,
}

/// Global configuration loaded from `~/.config/feedscrub/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed URLs fetched on every run.
    pub feed_urls: Vec<String>,
    /// Literal substring removed from each feed body.
    pub remove_target: String,
    /// Maximum number of feed pipelines running at once.
    pub max_concurrent: usize,
    /// Upper bound for a whole GET transfer in seconds (None = no limit).
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    /// Upper bound for connection setup in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Directory output files are written to (None = current directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub on_feed_error: FailurePolicy,
}

fn default_connect_timeout_secs() -> u64 {
    15
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_urls: DEFAULT_FEED_URLS.iter().map(|s| s.to_string()).collect(),
            remove_target: DEFAULT_REMOVE_TARGET.to_string(),
            max_concurrent: 3,
            fetch_timeout_secs: Some(60),
            connect_timeout_secs: default_connect_timeout_secs(),
            output_dir: None,
            on_feed_error: FailurePolicy::default(),
        }
    }
}

impl FeedConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

/// Render a config as the TOML written to disk.
pub fn to_toml(cfg: &FeedConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("feedscrub")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the default path, creating a default file if none exists.
pub fn load_or_init() -> Result<FeedConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FeedConfig::default();
        let toml = to_toml(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from_path(path: &Path) -> Result<FeedConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: FeedConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FeedConfig::default();
        assert_eq!(cfg.feed_urls.len(), 5);
        assert_eq!(cfg.remove_target, "NewsPicks");
        assert_eq!(cfg.max_concurrent, 3);
        assert_eq!(cfg.fetch_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(cfg.on_feed_error, FailurePolicy::Skip);
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FeedConfig::default();
        let toml = to_toml(&cfg).unwrap();
        let parsed: FeedConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.feed_urls, cfg.feed_urls);
        assert_eq!(parsed.remove_target, cfg.remove_target);
        assert_eq!(parsed.max_concurrent, cfg.max_concurrent);
        assert_eq!(parsed.fetch_timeout_secs, cfg.fetch_timeout_secs);
    }

    #[test]
    fn config_toml_minimal_uses_field_defaults() {
        let toml = r#"
            feed_urls = ["https://example.com/rss"]
            remove_target = "Ads"
            max_concurrent = 2
        "#;
        let cfg: FeedConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.feed_urls, vec!["https://example.com/rss".to_string()]);
        assert_eq!(cfg.remove_target, "Ads");
        assert_eq!(cfg.max_concurrent, 2);
        assert!(cfg.fetch_timeout_secs.is_none());
        assert!(cfg.fetch_timeout().is_none());
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.on_feed_error, FailurePolicy::Skip);
    }

    #[test]
    fn config_toml_failure_policy() {
        for (raw, want) in [
            ("swallow", FailurePolicy::Swallow),
            ("skip", FailurePolicy::Skip),
            ("abort", FailurePolicy::Abort),
        ] {
            let toml = format!(
                r#"
                feed_urls = []
                remove_target = "x"
                max_concurrent = 1
                on_feed_error = "{raw}"
                "#
            );
            let cfg: FeedConfig = toml::from_str(&toml).unwrap();
            assert_eq!(cfg.on_feed_error, want);
        }
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg = FeedConfig {
            fetch_timeout_secs: Some(0),
            ..FeedConfig::default()
        };
        assert!(cfg.fetch_timeout().is_none());
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "feed_urls = [\"https://a.example/rss\"]\nremove_target = \"Z\"\nmax_concurrent = 4\noutput_dir = \"/tmp/out\"\n",
        )
        .unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.max_concurrent, 4);
        assert_eq!(cfg.output_dir.as_deref(), Some(Path::new("/tmp/out")));
    }

    #[test]
    fn load_from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("read config"));
    }
}
