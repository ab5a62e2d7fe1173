//! Theme color lookup used while resolving symbolic color tokens.

use std::collections::BTreeMap;

/// Capability exposing the host theme's style replacement table.
pub trait ThemeColors {
  /// Mapping from replacement token to its configured value.
  fn style_replacements(&self) -> &BTreeMap<String, String>;
}

static NO_REPLACEMENTS: BTreeMap<String, String> = BTreeMap::new();

/// A theme without any replacements; every symbolic color falls back to `currentColor`.
impl ThemeColors for () {
  fn style_replacements(&self) -> &BTreeMap<String, String> {
    &NO_REPLACEMENTS
  }
}

/// Map-backed theme, usually populated from the `replacements` section of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleReplacements {
  replacements: BTreeMap<String, String>,
}

impl StyleReplacements {
  /// Wrap an existing replacement table.
  pub fn new(replacements: BTreeMap<String, String>) -> Self {
    Self { replacements }
  }
}

impl FromIterator<(String, String)> for StyleReplacements {
  fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
    Self::new(iter.into_iter().collect())
  }
}

impl ThemeColors for StyleReplacements {
  fn style_replacements(&self) -> &BTreeMap<String, String> {
    &self.replacements
  }
}
