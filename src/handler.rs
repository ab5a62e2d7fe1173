//! Entry point for media routing layers that receive `icon:` pseudo-paths.

use std::path::PathBuf;

use crate::cache::IconCache;
use crate::fetch::Fetcher;
use crate::params::ParameterResolver;
use crate::resolver::IconResolver;
use crate::theme::ThemeColors;

/// Literal prefix identifying icon media ids.
pub const ICON_PREFIX: &str = "icon";

/// Separator between pseudo-path tokens.
pub const TOKEN_SEPARATOR: char = ':';

/// Result of handling a media id, ready to be turned into a response status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
  /// The id does not address an icon; other handlers should try it.
  Unhandled,
  /// The icon could not be produced.
  NotFound,
  /// The normalized icon is available at `path`.
  Found {
    /// Location of the cached SVG.
    path: PathBuf,
  },
}

/// Capability registered with a routing layer for icon requests.
pub trait ResolveIcon {
  /// Resolve tokens that followed the `icon` prefix.
  fn resolve(&self, tokens: &[&str]) -> MediaOutcome;
}

/// Couples token parsing with icon resolution and converts every failure into not-found.
#[derive(Debug, Clone)]
pub struct IconHandler<T, F, C> {
  params: ParameterResolver<T>,
  icons: IconResolver<F, C>,
}

impl<T: ThemeColors, F: Fetcher, C: IconCache> IconHandler<T, F, C> {
  /// Create a handler from its two stages.
  pub fn new(params: ParameterResolver<T>, icons: IconResolver<F, C>) -> Self {
    Self { params, icons }
  }

  /// Resolver used for the fetch and normalize stage.
  pub fn icons(&self) -> &IconResolver<F, C> {
    &self.icons
  }

  /// Handle a full media id such as `icon:fa:w-24px:home.svg`.
  pub fn handle(&self, media_id: &str) -> MediaOutcome {
    let Some(rest) = media_id
      .strip_prefix(ICON_PREFIX)
      .and_then(|rest| rest.strip_prefix(TOKEN_SEPARATOR))
    else {
      return MediaOutcome::Unhandled;
    };

    let tokens: Vec<&str> = rest.split(TOKEN_SEPARATOR).collect();
    ResolveIcon::resolve(self, &tokens)
  }
}

impl<T: ThemeColors, F: Fetcher, C: IconCache> ResolveIcon for IconHandler<T, F, C> {
  fn resolve(&self, tokens: &[&str]) -> MediaOutcome {
    let request = match self.params.resolve(tokens) {
      Ok(request) => request,
      Err(err) => {
        tracing::debug!(error = %err, "rejected icon request");
        return MediaOutcome::NotFound;
      }
    };

    match self.icons.resolve(&request) {
      Ok(path) => MediaOutcome::Found { path },
      Err(err) => {
        tracing::warn!(error = %err, icon = request.icon_name(), "icon resolution failed");
        MediaOutcome::NotFound
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::FileCache;
  use crate::fetch::FetchError;
  use std::cell::RefCell;
  use tempfile::tempdir;

  #[derive(Default)]
  struct RecordingFetcher {
    urls: RefCell<Vec<String>>,
  }

  impl Fetcher for RecordingFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
      self.urls.borrow_mut().push(url.to_string());
      if url.contains("missing") {
        return Err(FetchError::Status {
          url: url.to_string(),
          code: 404,
        });
      }
      Ok(br#"<svg viewBox="0 0 24 24"><path d="M0 0"/></svg>"#.to_vec())
    }
  }

  fn handler<'a>(
    fetcher: &'a RecordingFetcher,
    root: &std::path::Path,
  ) -> IconHandler<(), &'a RecordingFetcher, FileCache> {
    IconHandler::new(
      ParameterResolver::default(),
      IconResolver::new(fetcher, FileCache::new(root)),
    )
  }

  #[test]
  fn ignores_other_media() {
    let temp = tempdir().unwrap();
    let fetcher = RecordingFetcher::default();
    let handler = handler(&fetcher, temp.path());

    assert_eq!(handler.handle("wiki:logo.png"), MediaOutcome::Unhandled);
    assert_eq!(handler.handle("iconic:home"), MediaOutcome::Unhandled);
    assert_eq!(handler.handle("icon"), MediaOutcome::Unhandled);
    assert_eq!(handler.handle("icons:home"), MediaOutcome::Unhandled);
    assert!(fetcher.urls.borrow().is_empty());
  }

  #[test]
  fn empty_icon_request_is_not_found() {
    let temp = tempdir().unwrap();
    let fetcher = RecordingFetcher::default();
    let handler = handler(&fetcher, temp.path());

    assert_eq!(handler.resolve(&[]), MediaOutcome::NotFound);
    assert_eq!(handler.handle("icon:"), MediaOutcome::NotFound);
    assert!(fetcher.urls.borrow().is_empty());
  }

  #[test]
  fn resolves_icons_to_cached_files() {
    let temp = tempdir().unwrap();
    let fetcher = RecordingFetcher::default();
    let handler = handler(&fetcher, temp.path());

    let MediaOutcome::Found { path } = handler.handle("icon:twbs:h-2em:alarm.svg") else {
      panic!("expected the icon to resolve");
    };
    let svg = std::fs::read_to_string(path).unwrap();

    assert_eq!(
      svg,
      r#"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg" fill="currentColor" height="2em"><path d="M0 0"/></svg>"#
    );
    assert_eq!(
      fetcher.urls.borrow().as_slice(),
      ["https://raw.githubusercontent.com/twbs/icons/main/icons/alarm.svg"]
    );
  }

  #[test]
  fn download_failures_become_not_found() {
    let temp = tempdir().unwrap();
    let fetcher = RecordingFetcher::default();
    let handler = handler(&fetcher, temp.path());

    assert_eq!(handler.handle("icon:mdi:missing"), MediaOutcome::NotFound);
    assert_eq!(fetcher.urls.borrow().len(), 1);
  }
}
