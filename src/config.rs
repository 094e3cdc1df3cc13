//! Configuration loading.
//!
//! Every setting has a default, so an empty TOML file is a valid config.
//!
//! ```toml
//! cities = ["london", "paris"]
//!
//! [aggregator]
//! pinned_tags = ["rooftop"]
//! common_target = 5
//! min_count = 2
//!
//! [scoring]
//! name_contains = 10
//!
//! [search]
//! tag_match = "exact"
//! debounce_ms = 300
//! ```

use crate::aggregate::AggregatorConfig;
use crate::city::CityRegistry;
use crate::error::{GuideError, Result};
use crate::filter::TagMatch;
use crate::rules::ScoreWeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "CITYGUIDE_CONFIG";

/// Search behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
  #[serde(default)]
  pub tag_match: TagMatch,
  /// Trailing delay for keystrokes and recomputation.
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
  300
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      tag_match: TagMatch::default(),
      debounce_ms: default_debounce_ms(),
    }
  }
}

impl SearchConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
  #[serde(default)]
  pub cities: CityRegistry,
  #[serde(default)]
  pub aggregator: AggregatorConfig,
  #[serde(default)]
  pub scoring: ScoreWeights,
  #[serde(default)]
  pub search: SearchConfig,
}

impl GuideConfig {
  /// Parses and validates a TOML document.
  pub fn from_toml_str(toml: &str) -> Result<Self> {
    let config: GuideConfig = toml::from_str(toml)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads and validates a TOML file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let config = Self::from_toml_str(&content)?;
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
  }

  /// Resolves the config to use:
  /// 1. `path`, if given
  /// 2. the file named by `CITYGUIDE_CONFIG`
  /// 3. built-in defaults
  pub fn resolve(path: Option<&Path>) -> Result<Self> {
    if let Some(path) = path {
      return Self::load(path);
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
      return Self::load(PathBuf::from(path));
    }
    Ok(Self::default())
  }

  /// Rejects settings the guide cannot run with.
  pub fn validate(&self) -> Result<()> {
    if self.cities.is_empty() {
      return Err(GuideError::Config("at least one city must be configured".to_string()));
    }
    if let Some(bad) = self.cities.slugs().iter().find(|s| s.is_empty() || s.as_str() != s.to_lowercase()) {
      return Err(GuideError::Config(format!("city slug must be lowercase and non-empty: {bad:?}")));
    }
    if self.aggregator.common_target == 0 {
      return Err(GuideError::Config("aggregator.common_target must be at least 1".to_string()));
    }
    if self.aggregator.min_count == 0 {
      return Err(GuideError::Config("aggregator.min_count must be at least 1".to_string()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_empty_document_is_default() {
    let config = GuideConfig::from_toml_str("").unwrap();
    assert_eq!(config, GuideConfig::default());
    assert_eq!(config.search.debounce(), Duration::from_millis(300));
    assert_eq!(config.aggregator.common_target, 5);
    assert_eq!(config.scoring.name_contains, 10);
  }

  #[test]
  fn test_partial_override() {
    let config = GuideConfig::from_toml_str(
      r#"
      cities = ["london"]

      [aggregator]
      common_target = 3

      [scoring]
      tag = 4

      [search]
      tag_match = "substring"
      "#,
    )
    .unwrap();

    assert_eq!(config.cities.slugs(), ["london".to_string()]);
    assert_eq!(config.aggregator.common_target, 3);
    assert_eq!(config.aggregator.min_count, 2);
    assert_eq!(config.aggregator.pinned_tags.len(), 4);
    assert_eq!(config.scoring.tag, 4);
    assert_eq!(config.scoring.address, 2);
    assert_eq!(config.search.tag_match, TagMatch::Substring);
  }

  #[test]
  fn test_validation() {
    assert!(matches!(
      GuideConfig::from_toml_str("cities = []"),
      Err(GuideError::Config(_))
    ));
    assert!(matches!(
      GuideConfig::from_toml_str("cities = [\"London\"]"),
      Err(GuideError::Config(_))
    ));
    assert!(matches!(
      GuideConfig::from_toml_str("[aggregator]\ncommon_target = 0"),
      Err(GuideError::Config(_))
    ));
    assert!(matches!(
      GuideConfig::from_toml_str("cities = 3"),
      Err(GuideError::ConfigParse(_))
    ));
  }

  #[test]
  fn test_load_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search]\ndebounce_ms = 150").unwrap();

    let config = GuideConfig::resolve(Some(file.path())).unwrap();
    assert_eq!(config.search.debounce_ms, 150);
    assert!(GuideConfig::load("/no/such/config.toml").is_err());
  }
}
