//! Rewrite raw SVG artwork into a minimal, namespace-canonical, styled document.
//!
//! The transform is deterministic: identical input bytes and style values always produce
//! identical output bytes, which is what makes the rendered file safe to cache.

mod tree;
mod whitelist;

use std::sync::OnceLock;

use regex::Regex;

use crate::models::IconRequest;

pub use tree::{Element, Node, parse_document};
pub use whitelist::{ROOT_KEEPERS, apply_whitelist, primitive_keepers};

/// Namespace written onto every normalized root element.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Errors raised while normalizing fetched artwork.
#[derive(Debug)]
pub enum NormalizeError {
  /// The fetched bytes are not valid UTF-8.
  Encoding(std::str::Utf8Error),
  /// The document is not well-formed XML.
  Xml(String),
  /// The document contains no `<svg>` element.
  MissingRoot,
  /// The normalized tree could not be written back out.
  Serialize(String),
}

impl std::fmt::Display for NormalizeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Encoding(source) => write!(f, "SVG is not valid UTF-8: {}", source),
      Self::Xml(message) => write!(f, "malformed SVG: {}", message),
      Self::MissingRoot => write!(f, "document has no <svg> element"),
      Self::Serialize(message) => write!(f, "failed to serialize SVG: {}", message),
    }
  }
}

impl std::error::Error for NormalizeError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Encoding(source) => Some(source),
      Self::Xml(_) | Self::MissingRoot | Self::Serialize(_) => None,
    }
  }
}

/// Presentation values applied to the normalized root.
///
/// `None` suppresses the corresponding attribute entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SvgStyle<'a> {
  /// Value for the root `fill` attribute.
  pub fill: Option<&'a str>,
  /// Value for the root `width` attribute.
  pub width: Option<&'a str>,
  /// Value for the root `height` attribute.
  pub height: Option<&'a str>,
}

impl<'a> SvgStyle<'a> {
  /// Derive the style from a resolved request.
  pub fn from_request(request: &'a IconRequest) -> Self {
    let fill = request.color().as_str();
    Self {
      fill: (!fill.is_empty()).then_some(fill),
      width: request.width().attribute_value(),
      height: request.height().attribute_value(),
    }
  }
}

fn namespace_declarations() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"\sxmlns(?::[^\s=]+)?\s*=\s*(?:"[^"]*"|'[^']*')"#)
      .expect("invalid namespace declaration regex")
  })
}

/// Remove default and prefixed namespace declarations from raw markup.
pub fn strip_namespace_declarations(markup: &str) -> String {
  namespace_declarations().replace_all(markup, "").into_owned()
}

/// Normalize raw SVG bytes into the cached representation.
///
/// Namespace declarations are stripped before parsing, the first `<svg>` element becomes the
/// output root, a `viewBox` is synthesized from `width`/`height` when missing, attributes are
/// reduced to per-element keepers, comments are dropped and the canonical namespace plus the
/// requested style are written onto the root. Only the root's subtree is serialized.
pub fn normalize_svg(raw: &[u8], style: &SvgStyle<'_>) -> Result<String, NormalizeError> {
  let text = std::str::from_utf8(raw).map_err(NormalizeError::Encoding)?;
  let text = text.strip_prefix('\u{feff}').unwrap_or(text);
  let markup = strip_namespace_declarations(text);

  let mut document = parse_document(&markup)?;
  let svg = document.find_mut("svg").ok_or(NormalizeError::MissingRoot)?;

  synthesize_view_box(svg);
  apply_whitelist(svg);
  svg.remove_comments();

  svg.set_attribute("xmlns", SVG_NAMESPACE);
  for (name, value) in [
    ("fill", style.fill),
    ("width", style.width),
    ("height", style.height),
  ] {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
      svg.set_attribute(name, value);
    }
  }

  svg.to_xml()
}

fn synthesize_view_box(svg: &mut Element) {
  if svg.attribute("viewBox").is_some() {
    return;
  }

  fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty() && *value != "0")
  }

  let view_box = match (present(svg.attribute("width")), present(svg.attribute("height"))) {
    (Some(width), Some(height)) => format!("0 0 {width} {height}"),
    _ => return,
  };
  svg.set_attribute("viewBox", &view_box);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{IconColor, IconSource, Length};

  fn style(
    fill: &'static str,
    width: Option<&'static str>,
    height: Option<&'static str>,
  ) -> SvgStyle<'static> {
    SvgStyle {
      fill: Some(fill),
      width,
      height,
    }
  }

  #[test]
  fn normalizes_reference_document() {
    let raw = br#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" id="x"><path d="M1 1" fill="red"/><!--c--></svg>"#;
    let output = normalize_svg(raw, &style("currentColor", None, Some("1.2em"))).unwrap();

    assert_eq!(
      output,
      r#"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg" fill="currentColor" height="1.2em"><path d="M1 1"/></svg>"#
    );
  }

  #[test]
  fn keeps_existing_view_box() {
    let raw = br#"<svg viewBox="0 0 16 16" width="32" height="32"><circle cx="8" cy="8" r="8"/></svg>"#;
    let output = normalize_svg(raw, &style("#fff", Some("1em"), Some("1em"))).unwrap();

    assert_eq!(
      output,
      r##"<svg viewBox="0 0 16 16" xmlns="http://www.w3.org/2000/svg" fill="#fff" width="1em" height="1em"><circle cx="8" cy="8" r="8"/></svg>"##
    );
  }

  #[test]
  fn strips_prefixed_namespaces_and_prolog() {
    let raw = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- Generator: tool -->\n<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink=\"http://www.w3.org/1999/xlink\" viewBox=\"0 0 2 2\">\n  <path d=\"M0 0h2v2z\"/>\n</svg>\n";
    let output = normalize_svg(raw.as_bytes(), &style("currentColor", None, None)).unwrap();

    assert_eq!(
      output,
      r#"<svg viewBox="0 0 2 2" xmlns="http://www.w3.org/2000/svg" fill="currentColor"><path d="M0 0h2v2z"/></svg>"#
    );
  }

  #[test]
  fn omits_view_box_without_both_dimensions() {
    let raw = br#"<svg width="24"><path d="M0 0"/></svg>"#;
    let output = normalize_svg(raw, &SvgStyle::default()).unwrap();
    assert_eq!(
      output,
      r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#
    );
  }

  #[test]
  fn serializes_only_the_first_svg_subtree() {
    let raw = br#"<html><body><svg viewBox="0 0 1 1"><rect x="0" y="0" width="1"/></svg><svg/></body></html>"#;
    let output = normalize_svg(raw, &SvgStyle::default()).unwrap();
    assert_eq!(
      output,
      r#"<svg viewBox="0 0 1 1" xmlns="http://www.w3.org/2000/svg"><rect x="0" y="0"/></svg>"#
    );
  }

  #[test]
  fn output_is_deterministic() {
    let raw = br#"<svg width="10" height="20"><g id="a"><path d="M0 0" class="p"/></g></svg>"#;
    let style = style("#123456", Some("10px"), Some("20px"));
    assert_eq!(
      normalize_svg(raw, &style).unwrap(),
      normalize_svg(raw, &style).unwrap()
    );
  }

  #[test]
  fn rejects_documents_without_svg() {
    let err = normalize_svg(b"<html><body/></html>", &SvgStyle::default()).unwrap_err();
    assert!(matches!(err, NormalizeError::MissingRoot));
  }

  #[test]
  fn rejects_malformed_and_binary_input() {
    assert!(matches!(
      normalize_svg(b"<svg><path></svg>", &SvgStyle::default()),
      Err(NormalizeError::Xml(_))
    ));
    assert!(matches!(
      normalize_svg(&[0xff, 0xfe, 0x00], &SvgStyle::default()),
      Err(NormalizeError::Encoding(_))
    ));
  }

  #[test]
  fn undefined_entities_fail_while_predefined_ones_survive() {
    let raw = br#"<svg viewBox="0 0 1 1"><text>a&nbsp;b</text></svg>"#;
    assert!(matches!(
      normalize_svg(raw, &SvgStyle::default()),
      Err(NormalizeError::Xml(_))
    ));

    let raw = br#"<svg viewBox="0 0 1 1"><text>a&amp;b</text></svg>"#;
    assert_eq!(
      normalize_svg(raw, &SvgStyle::default()).unwrap(),
      r#"<svg viewBox="0 0 1 1" xmlns="http://www.w3.org/2000/svg"><text>a&amp;b</text></svg>"#
    );
  }

  #[test]
  fn style_follows_request_values() {
    let request = IconRequest::new(
      IconSource::Mdi,
      "home",
      IconColor::Unset,
      Length::Auto,
      Length::Value("2em".into()),
    )
    .unwrap();

    assert_eq!(
      SvgStyle::from_request(&request),
      SvgStyle {
        fill: None,
        width: None,
        height: Some("2em"),
      }
    );
  }
}
