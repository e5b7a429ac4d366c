//! TOML configuration for the CLI.
//!
//! ```toml
//! [pipeline]
//! timeout_ms = 15000
//! max_fetches = 32
//!
//! [profile]
//! name = "bankrate"
//! domain = "bankrate.com"
//! body_container = "div.ArticleBody"
//! title_suffixes = ["| Bankrate", "- CreditCards.com"]
//! ```
//!
//! Both tables are optional; missing ones fall back to the defaults.

use anyhow::{Context, Result};
use article_extraction::{PipelineConfig, SiteProfile};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub pipeline: PipelineConfig,
    pub profile: SiteProfile,
}

impl CliConfig {
    /// Load from a file, or use the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config.pipeline.max_attempts, 2);
        assert_eq!(config.profile.domain, "bankrate.com");
    }

    #[test]
    fn test_profile_and_pipeline_tables() {
        let config = CliConfig::from_toml(
            r#"
            [pipeline]
            timeout_ms = 15000
            accept_invalid_certs = false

            [profile]
            name = "example"
            domain = "example.com"
            body_container = "article .content"
            title_suffixes = [" - Example"]
            byline_container_tags = ["div", "section"]
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.timeout_ms, 15_000);
        assert!(!config.pipeline.accept_invalid_certs);
        assert_eq!(config.pipeline.max_fetches, Some(64));
        assert_eq!(config.profile.clean_title("Hello - Example"), "Hello");
        assert_eq!(config.profile.byline_label_selector, "span");
        assert_eq!(config.profile.byline_container_tags.len(), 2);
    }

    #[test]
    fn test_incomplete_profile_rejected() {
        assert!(CliConfig::from_toml("[profile]\nname = \"x\"").is_err());
    }
}
