use crate::normalize::tree::Element;

/// Attributes the root `<svg>` element may keep.
pub const ROOT_KEEPERS: &[&str] = &["viewBox"];

/// Attributes kept on a drawing primitive, or `None` for elements that are left untouched.
pub fn primitive_keepers(tag: &str) -> Option<&'static [&'static str]> {
  match tag {
    "path" => Some(&["d"]),
    "rect" => Some(&["x", "y", "rx", "ry"]),
    "circle" => Some(&["cx", "cy", "r"]),
    "ellipse" => Some(&["cx", "cy", "rx", "ry"]),
    "line" => Some(&["x1", "x2", "y1", "y2"]),
    "polyline" | "polygon" => Some(&["points"]),
    _ => None,
  }
}

/// Strip the root down to its keepers and every primitive below it down to theirs.
pub fn apply_whitelist(root: &mut Element) {
  root.retain_attributes(ROOT_KEEPERS);
  root.for_each_descendant_mut(&mut |element| {
    if let Some(keep) = primitive_keepers(&element.name) {
      element.retain_attributes(keep);
    }
  });
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::tree::parse_document;

  fn whitelisted(source: &str) -> String {
    let mut root = parse_document(source).unwrap();
    apply_whitelist(&mut root);
    root.to_xml().unwrap()
  }

  #[test]
  fn root_keeps_only_view_box() {
    assert_eq!(
      whitelisted(r#"<svg id="a" class="b" viewBox="0 0 1 1" width="1" style="c"/>"#),
      r#"<svg viewBox="0 0 1 1"/>"#
    );
  }

  #[test]
  fn primitives_keep_their_geometry() {
    assert_eq!(
      whitelisted(concat!(
        r#"<svg><rect x="1" y="2" rx="3" ry="4" width="5" fill="red"/>"#,
        r#"<circle cx="1" cy="2" r="3" stroke="blue"/>"#,
        r#"<ellipse cx="1" cy="2" rx="3" ry="4" id="e"/>"#,
        r#"<line x1="1" x2="2" y1="3" y2="4" class="l"/>"#,
        r#"<polyline points="0,0 1,1" fill="none"/>"#,
        r#"<polygon points="0,0 1,1 1,0" opacity=".5"/></svg>"#,
      )),
      concat!(
        r#"<svg><rect x="1" y="2" rx="3" ry="4"/><circle cx="1" cy="2" r="3"/>"#,
        r#"<ellipse cx="1" cy="2" rx="3" ry="4"/><line x1="1" x2="2" y1="3" y2="4"/>"#,
        r#"<polyline points="0,0 1,1"/><polygon points="0,0 1,1 1,0"/></svg>"#,
      )
    );
  }

  #[test]
  fn other_elements_keep_all_attributes() {
    assert_eq!(
      whitelisted(r#"<svg><g transform="scale(2)" id="g"><path d="M0 0" id="p"/></g></svg>"#),
      r#"<svg><g transform="scale(2)" id="g"><path d="M0 0"/></g></svg>"#
    );
  }
}
