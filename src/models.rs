//! Data structures describing a single icon resolution.

use std::fmt;
use std::str::FromStr;

use crate::params::{RequestError, is_hex_color, is_valid_length, sanitize_icon_name};

/// Upstream provider of vector icon artwork.
///
/// The set is closed: every variant maps to exactly one URL template with a single `%s`
/// placeholder for the icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconSource {
  /// Material Design Icons.
  Mdi,
  /// Font Awesome brand icons.
  FontAwesomeBrands,
  /// Font Awesome solid icons.
  FontAwesomeSolid,
  /// Font Awesome regular icons.
  FontAwesomeRegular,
  /// Bootstrap Icons.
  Bootstrap,
}

impl IconSource {
  /// Every known source, default first.
  pub const ALL: [IconSource; 5] = [
    IconSource::Mdi,
    IconSource::FontAwesomeBrands,
    IconSource::FontAwesomeSolid,
    IconSource::FontAwesomeRegular,
    IconSource::Bootstrap,
  ];

  /// Identifier used in request tokens.
  pub fn id(self) -> &'static str {
    match self {
      Self::Mdi => "mdi",
      Self::FontAwesomeBrands => "fab",
      Self::FontAwesomeSolid => "fas",
      Self::FontAwesomeRegular => "fa",
      Self::Bootstrap => "twbs",
    }
  }

  /// Remote URL template containing a single `%s` placeholder.
  pub fn url_template(self) -> &'static str {
    match self {
      Self::Mdi => "https://raw.githubusercontent.com/Templarian/MaterialDesign/master/svg/%s.svg",
      Self::FontAwesomeBrands => {
        "https://raw.githubusercontent.com/FortAwesome/Font-Awesome/master/svgs/brands/%s.svg"
      }
      Self::FontAwesomeSolid => {
        "https://raw.githubusercontent.com/FortAwesome/Font-Awesome/master/svgs/solid/%s.svg"
      }
      Self::FontAwesomeRegular => {
        "https://raw.githubusercontent.com/FortAwesome/Font-Awesome/master/svgs/regular/%s.svg"
      }
      Self::Bootstrap => "https://raw.githubusercontent.com/twbs/icons/main/icons/%s.svg",
    }
  }

  /// Substitute `icon_name` into the source's URL template.
  pub fn url_for(self, icon_name: &str) -> String {
    self.url_template().replacen("%s", icon_name, 1)
  }
}

impl Default for IconSource {
  fn default() -> Self {
    IconSource::ALL[0]
  }
}

impl fmt::Display for IconSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

impl FromStr for IconSource {
  type Err = RequestError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    IconSource::ALL
      .into_iter()
      .find(|source| source.id() == value)
      .ok_or_else(|| RequestError::UnknownSource(value.to_string()))
  }
}

/// Fill color applied to the root element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum IconColor {
  /// Inherit from the surrounding context (`currentColor`).
  #[default]
  Inherit,
  /// Explicitly empty; no `fill` attribute is emitted.
  Unset,
  /// Normalized hex color with a leading `#`.
  Hex(String),
}

impl IconColor {
  /// Value as written into the cache key and the output markup.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Inherit => "currentColor",
      Self::Unset => "",
      Self::Hex(value) => value,
    }
  }
}

/// Intrinsic width or height of the output icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Length {
  /// No explicit value (`auto`).
  Auto,
  /// Explicitly empty.
  Unset,
  /// A number with an optional CSS unit, e.g. `1.5em`.
  Value(String),
}

impl Length {
  /// Value as written into the cache key.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Auto => "auto",
      Self::Unset => "",
      Self::Value(value) => value,
    }
  }

  /// Attribute value to emit, or `None` when the attribute is suppressed.
  pub fn attribute_value(&self) -> Option<&str> {
    match self {
      Self::Value(value) => Some(value),
      Self::Auto | Self::Unset => None,
    }
  }
}

/// Fully normalized icon request.
///
/// Instances are only built through [`IconRequest::new`], which rejects style values outside
/// their legal forms, so nothing unchecked reaches the cache key or the output markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconRequest {
  source: IconSource,
  icon_name: String,
  color: IconColor,
  width: Length,
  height: Length,
}

impl IconRequest {
  /// Build a request from resolved style values.
  ///
  /// The icon name is reduced to its final path component and a trailing `.svg` is removed.
  /// Hex colors must carry a leading `#` and lengths must pass
  /// [`is_valid_length`](crate::params::is_valid_length).
  pub fn new(
    source: IconSource,
    icon_name: &str,
    color: IconColor,
    width: Length,
    height: Length,
  ) -> Result<Self, RequestError> {
    if let IconColor::Hex(value) = &color {
      if !value.starts_with('#') || !is_hex_color(value) {
        return Err(RequestError::InvalidColor(value.clone()));
      }
    }
    for length in [&width, &height] {
      if let Length::Value(value) = length {
        if !is_valid_length(value) {
          return Err(RequestError::InvalidLength(value.clone()));
        }
      }
    }

    Ok(Self {
      source,
      icon_name: sanitize_icon_name(icon_name)?,
      color,
      width,
      height,
    })
  }

  /// Icon provider.
  pub fn source(&self) -> IconSource {
    self.source
  }

  /// Icon name within the provider.
  pub fn icon_name(&self) -> &str {
    &self.icon_name
  }

  /// Resolved fill color.
  pub fn color(&self) -> &IconColor {
    &self.color
  }

  /// Resolved width.
  pub fn width(&self) -> &Length {
    &self.width
  }

  /// Resolved height.
  pub fn height(&self) -> &Length {
    &self.height
  }

  /// Canonical remote URL for the original artwork.
  pub fn url(&self) -> String {
    self.source.url_for(&self.icon_name)
  }

  /// Ordered parts that determine the normalized output.
  pub fn cache_parts(&self) -> [String; 4] {
    [
      self.url(),
      self.color.as_str().to_string(),
      self.width.as_str().to_string(),
      self.height.as_str().to_string(),
    ]
  }
}

/// Values used for any parameter a request leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
  /// Provider used when no source token is present.
  pub source: IconSource,
  /// Raw color used when no color token is present.
  pub color: String,
  /// Raw width used when no `w-` token is present.
  pub width: String,
  /// Raw height used when no `h-` token is present.
  pub height: String,
}

impl Default for RequestDefaults {
  fn default() -> Self {
    Self {
      source: IconSource::default(),
      color: "currentColor".into(),
      width: "auto".into(),
      height: "1.2rem".into(),
    }
  }
}
