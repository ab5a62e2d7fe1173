use regex::Regex;

use crate::models::Length;

const WIDTH_FALLBACK: Length = Length::Auto;
const HEIGHT_FALLBACK: &str = "1.3em";

fn length_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"^[0-9]*\.?[0-9]+(px|em|ex|pt|in|pc|mm|cm|rem|vh|vw)?$")
      .expect("invalid length regex")
  })
}

/// Returns `true` for a number with an optional recognized CSS length unit.
pub fn is_valid_length(value: &str) -> bool {
  length_pattern().is_match(value)
}

fn resolve_length(value: &str) -> Option<Length> {
  match value {
    "auto" => Some(Length::Auto),
    "" => Some(Length::Unset),
    _ if is_valid_length(value) => Some(Length::Value(value.to_string())),
    _ => None,
  }
}

/// Validate a raw width, falling back to `auto` for anything unrecognized.
pub fn resolve_width(value: &str) -> Length {
  resolve_length(value).unwrap_or(WIDTH_FALLBACK)
}

/// Validate a raw height, falling back to `1.3em` for anything unrecognized.
pub fn resolve_height(value: &str) -> Length {
  resolve_length(value).unwrap_or_else(|| Length::Value(HEIGHT_FALLBACK.into()))
}
