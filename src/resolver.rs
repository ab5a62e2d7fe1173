//! Resolution orchestrator: derive the URL and cache key, then fetch and normalize on a miss.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose};

use crate::cache::{CacheKey, ICON_SUFFIX, IconCache};
use crate::fetch::{FetchError, Fetcher};
use crate::models::IconRequest;
use crate::normalize::{NormalizeError, SvgStyle, normalize_svg};

/// Unix timestamp of the last change to the normalization transform.
///
/// Cache entries written before this instant are regenerated on their next resolution.
pub const NORMALIZER_EPOCH_SECS: u64 = 1_735_689_600;

/// The normalization engine's version marker as a point in time.
pub fn normalizer_epoch() -> SystemTime {
  UNIX_EPOCH + Duration::from_secs(NORMALIZER_EPOCH_SECS)
}

/// Generic result type used by the resolver.
pub type IconResult<T> = Result<T, IconError>;

/// Hard failures of a single resolution.
#[derive(Debug)]
pub enum IconError {
  /// The artwork could not be downloaded and no fresh cache entry exists.
  Download {
    /// Underlying transport failure.
    source: FetchError,
  },
  /// The downloaded artwork is not a usable SVG document.
  Normalize {
    /// Requested URL.
    url: String,
    /// Underlying parse failure.
    source: NormalizeError,
  },
  /// Reading or writing the cache entry failed.
  Cache {
    /// Entry location.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}

impl std::fmt::Display for IconError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Download { source } => write!(f, "failed to download SVG: {}", source),
      Self::Normalize { url, source } => write!(f, "failed to process {}: {}", url, source),
      Self::Cache { path, source } => {
        write!(f, "cache entry {} failed: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for IconError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Download { source } => Some(source),
      Self::Normalize { source, .. } => Some(source),
      Self::Cache { source, .. } => Some(source),
    }
  }
}

/// Resolves [`IconRequest`]s to cached, normalized SVG entries.
#[derive(Debug, Clone)]
pub struct IconResolver<F, C> {
  fetcher: F,
  cache: C,
  engine_marker: SystemTime,
}

impl<F: Fetcher, C: IconCache> IconResolver<F, C> {
  /// Create a resolver using [`normalizer_epoch`] as its staleness marker.
  pub fn new(fetcher: F, cache: C) -> Self {
    Self {
      fetcher,
      cache,
      engine_marker: normalizer_epoch(),
    }
  }

  /// Replace the staleness marker; entries modified before `marker` are regenerated.
  pub fn with_engine_marker(mut self, marker: SystemTime) -> Self {
    self.engine_marker = marker;
    self
  }

  /// Underlying cache.
  pub fn cache(&self) -> &C {
    &self.cache
  }

  /// Key under which the normalized output of `request` is stored.
  pub fn cache_key(&self, request: &IconRequest) -> CacheKey {
    let parts = request.cache_parts();
    let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
    self.cache.key_for(&parts, ICON_SUFFIX)
  }

  /// Returns `true` when `key` holds an entry at least as new as the engine marker.
  pub fn is_fresh(&self, key: &CacheKey) -> bool {
    self.cache.exists(key)
      && self
        .cache
        .modified(key)
        .is_ok_and(|modified| modified >= self.engine_marker)
  }

  /// Resolve `request` to the location of its cached entry.
  ///
  /// A fresh entry short-circuits the whole pipeline; the fetcher is only invoked on a miss
  /// or a stale entry, and a failed download never produces a fallback icon.
  pub fn resolve(&self, request: &IconRequest) -> IconResult<PathBuf> {
    self.ensure_entry(request).map(CacheKey::into_path)
  }

  /// Resolve `request` and return the cached bytes.
  pub fn resolve_bytes(&self, request: &IconRequest) -> IconResult<Vec<u8>> {
    let key = self.ensure_entry(request)?;
    self.cache.read(&key).map_err(|source| IconError::Cache {
      path: key.into_path(),
      source,
    })
  }

  fn ensure_entry(&self, request: &IconRequest) -> IconResult<CacheKey> {
    let key = self.cache_key(request);
    if self.is_fresh(&key) {
      tracing::debug!(path = %key.path().display(), "icon cache hit");
      return Ok(key);
    }

    let url = request.url();
    tracing::info!(%url, "fetching icon");
    let raw = self
      .fetcher
      .fetch(&url)
      .map_err(|source| IconError::Download { source })?;

    let svg = normalize_svg(&raw, &SvgStyle::from_request(request))
      .map_err(|source| IconError::Normalize { url, source })?;

    self
      .cache
      .write(&key, svg.as_bytes())
      .map_err(|source| IconError::Cache {
        path: key.path().to_path_buf(),
        source,
      })?;
    tracing::info!(path = %key.path().display(), bytes = svg.len(), "stored normalized icon");

    Ok(key)
  }
}

/// Encode normalized SVG bytes as a base64 `data:` URI for inline embedding.
pub fn data_uri(svg: &[u8]) -> String {
  format!(
    "data:image/svg+xml;base64,{}",
    general_purpose::STANDARD.encode(svg)
  )
}
