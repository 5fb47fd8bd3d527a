//! Runtime settings for the scraping pipeline.
//!
//! Settings start from built-in defaults, are optionally overlaid by a YAML
//! file (`--config`), and finally by individual CLI flags.
//!
//! ```yaml
//! delay_ms: 1500
//! timeout_secs: 30
//! max_pages: 10
//! ```

use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

/// Browser-like User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0 Safari/537.36";

/// Knobs shared by every source pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeSettings {
    /// Pause after each successful listing page, in milliseconds.
    pub delay_ms: u64,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// Stop after this many listing pages. `None` means no cap.
    pub max_pages: Option<u32>,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            timeout_secs: 20,
            max_pages: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse settings from YAML text. Missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply CLI overrides on top of the current values.
    pub fn with_overrides(
        mut self,
        delay_ms: Option<u64>,
        timeout_secs: Option<u64>,
        max_pages: Option<u32>,
    ) -> Self {
        if let Some(v) = delay_ms {
            self.delay_ms = v;
        }
        if let Some(v) = timeout_secs {
            self.timeout_secs = v;
        }
        if max_pages.is_some() {
            self.max_pages = max_pages;
        }
        self
    }
}

/// Load settings from an optional YAML file.
#[instrument(level = "info")]
pub async fn load_settings(path: Option<&str>) -> Result<ScrapeSettings, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(ScrapeSettings::default());
    };
    let text = tokio::fs::read_to_string(path).await?;
    let settings = ScrapeSettings::from_yaml(&text)?;
    info!(path, ?settings, "Loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = ScrapeSettings::default();
        assert_eq!(s.delay(), Duration::from_secs(1));
        assert_eq!(s.timeout(), Duration::from_secs(20));
        assert_eq!(s.max_pages, None);
        assert!(s.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let s = ScrapeSettings::from_yaml("max_pages: 3\n").unwrap();
        assert_eq!(s.max_pages, Some(3));
        assert_eq!(s.delay_ms, 1000);
        assert_eq!(s.timeout_secs, 20);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ScrapeSettings::from_yaml("").unwrap(), ScrapeSettings::default());
    }

    #[test]
    fn test_unknown_yaml_key_is_rejected() {
        assert!(ScrapeSettings::from_yaml("delay: 5\n").is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let s = ScrapeSettings::from_yaml("delay_ms: 200\ntimeout_secs: 5\n")
            .unwrap()
            .with_overrides(Some(0), None, Some(2));
        assert_eq!(s.delay_ms, 0);
        assert_eq!(s.timeout_secs, 5);
        assert_eq!(s.max_pages, Some(2));
    }

    #[tokio::test]
    async fn test_load_settings_without_path() {
        let s = load_settings(None).await.unwrap();
        assert_eq!(s, ScrapeSettings::default());
    }

    #[tokio::test]
    async fn test_load_settings_from_file() {
        let path = std::env::temp_dir().join(format!("review_scraper_cfg_{}.yaml", std::process::id()));
        tokio::fs::write(&path, "timeout_secs: 7\n").await.unwrap();

        let s = load_settings(path.to_str()).await.unwrap();
        assert_eq!(s.timeout_secs, 7);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
