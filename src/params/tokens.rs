use std::sync::OnceLock;

use regex::Regex;

use crate::models::{IconRequest, IconSource, RequestDefaults};
use crate::params::RequestError;
use crate::params::color::resolve_color;
use crate::params::length::{resolve_height, resolve_width};
use crate::theme::ThemeColors;

fn width_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^w-(.*)$").expect("invalid width token regex"))
}

fn height_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^h-(.*)$").expect("invalid height token regex"))
}

fn captured<'t>(pattern: &Regex, token: &'t str) -> Option<&'t str> {
  pattern
    .captures(token)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

/// Reduce a raw icon name to a safe file stem.
///
/// Only the final `/`-separated component is kept and a trailing `.svg` is removed, so names
/// like `../../etc/passwd` cannot leave the provider's icon directory. Names carrying
/// backslashes or URL metacharacters (`%`, `?`, `#`) are rejected outright.
pub fn sanitize_icon_name(raw: &str) -> Result<String, RequestError> {
  const FORBIDDEN: [char; 4] = ['\\', '%', '?', '#'];

  let base = raw.rsplit('/').next().unwrap_or(raw);
  let stem = base.strip_suffix(".svg").unwrap_or(base);

  if stem.is_empty() || stem == "." || stem == ".." || stem.contains(FORBIDDEN) {
    return Err(RequestError::InvalidIconName(raw.to_string()));
  }

  Ok(stem.to_string())
}

/// Raw, not yet validated values collected from the token scan.
#[derive(Debug)]
struct RawParameters<'a> {
  source: IconSource,
  color: &'a str,
  width: &'a str,
  height: &'a str,
}

/// Parses request tokens into an [`IconRequest`] using configurable defaults and a theme.
#[derive(Debug, Clone)]
pub struct ParameterResolver<T> {
  defaults: RequestDefaults,
  theme: T,
}

impl<T: ThemeColors> ParameterResolver<T> {
  /// Create a resolver for the given defaults and theme.
  pub fn new(defaults: RequestDefaults, theme: T) -> Self {
    Self { defaults, theme }
  }

  /// Defaults applied to omitted parameters.
  pub fn defaults(&self) -> &RequestDefaults {
    &self.defaults
  }

  /// Resolve tokens that followed the `icon` prefix.
  ///
  /// The last token is always the icon name. Remaining tokens are matched in order against
  /// the source identifiers, `w-<value>` and `h-<value>`; the first token matching none of
  /// them becomes the color and any further leftovers are ignored. Invalid widths, heights
  /// and colors fall back to safe values instead of failing.
  pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<IconRequest, RequestError> {
    let Some((name, options)) = tokens.split_last() else {
      return Err(RequestError::Empty);
    };

    let raw = self.scan(options);
    tracing::trace!(?raw, name = name.as_ref(), "scanned icon tokens");

    IconRequest::new(
      raw.source,
      name.as_ref(),
      resolve_color(raw.color, &self.theme),
      resolve_width(raw.width),
      resolve_height(raw.height),
    )
  }

  fn scan<'a, S: AsRef<str>>(&'a self, options: &'a [S]) -> RawParameters<'a> {
    let mut raw = RawParameters {
      source: self.defaults.source,
      color: &self.defaults.color,
      width: &self.defaults.width,
      height: &self.defaults.height,
    };
    let mut leftovers = Vec::new();

    for token in options.iter().map(|token| token.as_ref()) {
      if let Ok(source) = token.parse::<IconSource>() {
        raw.source = source;
      } else if let Some(width) = captured(width_pattern(), token) {
        raw.width = width;
      } else if let Some(height) = captured(height_pattern(), token) {
        raw.height = height;
      } else {
        leftovers.push(token);
      }
    }

    if let Some(&color) = leftovers.first() {
      raw.color = color;
    }

    raw
  }
}

impl Default for ParameterResolver<()> {
  fn default() -> Self {
    Self::new(RequestDefaults::default(), ())
  }
}
