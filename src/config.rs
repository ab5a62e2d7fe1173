//! Resolver configuration loaded from an optional JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::DEFAULT_USER_AGENT;
use crate::models::{IconSource, RequestDefaults};
use crate::theme::StyleReplacements;

/// File name searched for by [`ResolverConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "icon_fetcher.config.json";

/// Discoverable configuration for cache location, request defaults and theme colors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
  /// Directory holding normalized icons.
  pub cache_dir: PathBuf,
  /// Source identifier used when a request names none.
  pub default_source: String,
  /// Color used when a request names none.
  pub default_color: String,
  /// Width used when a request carries no `w-` token.
  pub default_width: String,
  /// Height used when a request carries no `h-` token.
  pub default_height: String,
  /// User agent sent when downloading artwork.
  pub user_agent: String,
  /// Download deadline in seconds; `0` disables it.
  pub timeout_secs: u64,
  /// Theme replacement table consulted for symbolic colors.
  pub replacements: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    let defaults = RequestDefaults::default();
    Self {
      cache_dir: PathBuf::from("cache"),
      default_source: defaults.source.id().into(),
      default_color: defaults.color,
      default_width: defaults.width,
      default_height: defaults.height,
      user_agent: DEFAULT_USER_AGENT.into(),
      timeout_secs: 30,
      replacements: BTreeMap::new(),
    }
  }
}

impl ResolverConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to default
  /// values so callers can keep serving icons with sensible assumptions.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file, ignoring any failure.
  pub fn from_path(path: &Path) -> Option<Self> {
    Self::load(path).ok()
  }

  /// Read configuration from a specific JSON file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    serde_json::from_str(&content)
      .with_context(|| format!("failed to parse configuration at {}", path.display()))
  }

  /// Convert into request defaults, validating the configured source.
  pub fn to_defaults(&self) -> Result<RequestDefaults> {
    let source: IconSource = self
      .default_source
      .parse()
      .context("invalid default_source in configuration")?;
    Ok(RequestDefaults {
      source,
      color: self.default_color.clone(),
      width: self.default_width.clone(),
      height: self.default_height.clone(),
    })
  }

  /// Theme colors built from the replacement table.
  pub fn to_theme(&self) -> StyleReplacements {
    StyleReplacements::new(self.replacements.clone())
  }

  /// Download deadline as a duration.
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}
