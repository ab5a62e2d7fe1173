use regex::Regex;

use crate::models::IconColor;
use crate::theme::ThemeColors;

fn hex_color_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(?i)^#?(?:(?:[0-9a-f]{3}){1,2}|(?:[0-9a-f]{4}){1,2})$")
      .expect("invalid hex color regex")
  })
}

/// Check whether `value` is a 3, 4, 6 or 8 digit hex color with an optional leading `#`.
pub fn is_hex_color(value: &str) -> bool {
  hex_color_pattern().is_match(value)
}

fn normalize_hex(value: &str) -> IconColor {
  IconColor::Hex(format!("#{}", value.trim_start_matches('#')))
}

/// Resolve a raw color token into one of the legal color forms.
///
/// Symbolic tokens are looked up in the theme's replacement table, first literally and then
/// wrapped as `__token__`. Anything that cannot be resolved to a hex color inherits the
/// surrounding color instead of failing.
pub fn resolve_color<T: ThemeColors + ?Sized>(value: &str, theme: &T) -> IconColor {
  match value {
    "currentColor" => return IconColor::Inherit,
    "" => return IconColor::Unset,
    _ => {}
  }

  if is_hex_color(value) {
    return normalize_hex(value);
  }

  let replacements = theme.style_replacements();
  let wrapped = format!("__{value}__");
  [value, wrapped.as_str()]
    .into_iter()
    .filter_map(|token| replacements.get(token))
    .find(|candidate| is_hex_color(candidate))
    .map(|candidate| normalize_hex(candidate))
    .unwrap_or(IconColor::Inherit)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::theme::StyleReplacements;

  fn theme() -> StyleReplacements {
    [
      ("__text__", "#333"),
      ("__link__", "#2b73b7"),
      ("link", "blue"),
      ("accent", "FFAA00"),
      ("__background__", "white"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
  }

  #[test]
  fn recognizes_hex_colors() {
    for value in ["fff", "#ffffff", "1234", "abcdef12", "#ABC"] {
      assert!(is_hex_color(value), "{value} should be a hex color");
    }
    for value in ["red", "#ggg", "", "#12345", "##fff"] {
      assert!(!is_hex_color(value), "{value} should not be a hex color");
    }
  }

  #[test]
  fn keeps_sentinels() {
    assert_eq!(resolve_color("currentColor", &()), IconColor::Inherit);
    assert_eq!(resolve_color("", &()), IconColor::Unset);
  }

  #[test]
  fn prefixes_literal_hex_colors() {
    assert_eq!(resolve_color("cc0000ff", &()), IconColor::Hex("#cc0000ff".into()));
    assert_eq!(resolve_color("#AbC", &()), IconColor::Hex("#AbC".into()));
  }

  #[test]
  fn resolves_theme_tokens_literal_then_wrapped() {
    let theme = theme();
    assert_eq!(resolve_color("accent", &theme), IconColor::Hex("#FFAA00".into()));
    assert_eq!(resolve_color("text", &theme), IconColor::Hex("#333".into()));
    // literal "link" is not a hex value, so the wrapped token wins
    assert_eq!(resolve_color("link", &theme), IconColor::Hex("#2b73b7".into()));
  }

  #[test]
  fn unresolvable_tokens_inherit() {
    let theme = theme();
    assert_eq!(resolve_color("background", &theme), IconColor::Inherit);
    assert_eq!(resolve_color("red", &theme), IconColor::Inherit);
    assert_eq!(resolve_color("red", &()), IconColor::Inherit);
  }
}
