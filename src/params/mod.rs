//! Turn colon-separated request tokens into a normalized [`crate::models::IconRequest`].
//!
//! Each concern lives in its own submodule so the validation rules for colors and lengths can
//! be tested independently of the token scan that feeds them.

mod color;
mod length;
mod tokens;

pub use color::{is_hex_color, resolve_color};
pub use length::{is_valid_length, resolve_height, resolve_width};
pub use tokens::{ParameterResolver, sanitize_icon_name};

/// Errors that prevent a request from being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
  /// No tokens were left after removing the `icon` prefix.
  Empty,
  /// Source identifier outside the closed set of providers.
  UnknownSource(String),
  /// Icon name that is empty or tries to escape its directory.
  InvalidIconName(String),
  /// Color value that is not a `#`-prefixed hex color.
  InvalidColor(String),
  /// Length value without a recognized number and unit.
  InvalidLength(String),
}

impl std::fmt::Display for RequestError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Empty => write!(f, "no icon specified"),
      Self::UnknownSource(source) => write!(f, "unknown icon source '{}'", source),
      Self::InvalidIconName(name) => write!(f, "invalid icon name '{}'", name),
      Self::InvalidColor(color) => write!(f, "invalid icon color '{}'", color),
      Self::InvalidLength(length) => write!(f, "invalid icon length '{}'", length),
    }
  }
}

impl std::error::Error for RequestError {}
