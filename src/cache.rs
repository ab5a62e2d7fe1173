//! Cache storage for normalized icons.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::NamedTempFile;

/// Suffix appended to every normalized icon entry.
pub const ICON_SUFFIX: &str = ".icon.svg";

/// Identifier of a cache entry; for file-backed caches this is the entry's location on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(PathBuf);

impl CacheKey {
  /// Wrap a path as a cache key.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self(path.into())
  }

  /// Path the entry is (or will be) stored at.
  pub fn path(&self) -> &Path {
    &self.0
  }

  /// Consume the key, returning its path.
  pub fn into_path(self) -> PathBuf {
    self.0
  }
}

/// Storage capability used by the resolver.
///
/// Implementations must make `read` and `write` individually atomic; the resolver does not
/// coordinate concurrent writers of the same key.
pub trait IconCache {
  /// Derive a deterministic key from ordered parts and a suffix.
  fn key_for(&self, parts: &[&str], suffix: &str) -> CacheKey;

  /// Returns `true` when an entry is stored under `key`.
  fn exists(&self, key: &CacheKey) -> bool;

  /// Last modification time of the entry.
  fn modified(&self, key: &CacheKey) -> io::Result<SystemTime>;

  /// Stored bytes of the entry.
  fn read(&self, key: &CacheKey) -> io::Result<Vec<u8>>;

  /// Store `bytes` under `key`, replacing any previous entry.
  fn write(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()>;
}

impl<C: IconCache + ?Sized> IconCache for &C {
  fn key_for(&self, parts: &[&str], suffix: &str) -> CacheKey {
    (**self).key_for(parts, suffix)
  }

  fn exists(&self, key: &CacheKey) -> bool {
    (**self).exists(key)
  }

  fn modified(&self, key: &CacheKey) -> io::Result<SystemTime> {
    (**self).modified(key)
  }

  fn read(&self, key: &CacheKey) -> io::Result<Vec<u8>> {
    (**self).read(key)
  }

  fn write(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()> {
    (**self).write(key, bytes)
  }
}

/// Hex digest naming an entry built from `parts`.
///
/// Parts are joined by newlines before hashing, so `["a", "b"]` and `["a\nb"]` collide by
/// construction; callers only pass values that cannot contain newlines.
pub fn hashed_name(parts: &[&str]) -> String {
  format!("{:x}", md5::compute(parts.join("\n")))
}

/// File-backed cache laid out as `<root>/<first digest digit>/<digest><suffix>`.
#[derive(Debug, Clone)]
pub struct FileCache {
  root: PathBuf,
}

impl FileCache {
  /// Create a cache rooted at `root`. The directory is created lazily on first write.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Root directory of the cache.
  pub fn root(&self) -> &Path {
    &self.root
  }
}

impl IconCache for FileCache {
  fn key_for(&self, parts: &[&str], suffix: &str) -> CacheKey {
    let digest = hashed_name(parts);
    let bucket = &digest[..1];
    CacheKey::new(self.root.join(bucket).join(format!("{digest}{suffix}")))
  }

  fn exists(&self, key: &CacheKey) -> bool {
    key.path().is_file()
  }

  fn modified(&self, key: &CacheKey) -> io::Result<SystemTime> {
    fs::metadata(key.path())?.modified()
  }

  fn read(&self, key: &CacheKey) -> io::Result<Vec<u8>> {
    fs::read(key.path())
  }

  fn write(&self, key: &CacheKey, bytes: &[u8]) -> io::Result<()> {
    let path = key.path();
    let parent = path.parent().unwrap_or(&self.root);
    fs::create_dir_all(parent)?;

    // rename into place so readers never observe a partially written entry
    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn keys_are_bucketed_by_first_digest_digit() {
    let cache = FileCache::new("/var/cache/icons");
    let key = cache.key_for(&["https://example.com/a.svg", "currentColor"], ICON_SUFFIX);

    let digest = hashed_name(&["https://example.com/a.svg", "currentColor"]);
    assert_eq!(digest.len(), 32);
    assert_eq!(
      key.path(),
      Path::new("/var/cache/icons")
        .join(&digest[..1])
        .join(format!("{digest}.icon.svg"))
    );
  }

  #[test]
  fn identical_parts_share_a_key() {
    let cache = FileCache::new("cache");
    assert_eq!(
      cache.key_for(&["u", "c", "auto", "1em"], ICON_SUFFIX),
      cache.key_for(&["u", "c", "auto", "1em"], ICON_SUFFIX)
    );
  }

  #[test]
  fn differing_parts_get_distinct_keys() {
    let cache = FileCache::new("cache");
    let base = cache.key_for(&["u", "currentColor", "auto", "1.2em"], ICON_SUFFIX);

    for parts in [
      ["u", "#fff", "auto", "1.2em"],
      ["u", "currentColor", "24px", "1.2em"],
      ["u", "currentColor", "auto", "2em"],
      ["u", "currentColor", "1.2em", "auto"],
    ] {
      assert_ne!(cache.key_for(&parts, ICON_SUFFIX), base);
    }
  }

  #[test]
  fn writes_are_readable_and_replace_previous_entries() -> io::Result<()> {
    let temp = tempdir()?;
    let cache = FileCache::new(temp.path().join("icons"));
    let key = cache.key_for(&["entry"], ICON_SUFFIX);

    assert!(!cache.exists(&key));
    cache.write(&key, b"<svg/>")?;
    assert!(cache.exists(&key));
    assert_eq!(cache.read(&key)?, b"<svg/>");

    cache.write(&key, b"<svg></svg>")?;
    assert_eq!(cache.read(&key)?, b"<svg></svg>");
    assert!(cache.modified(&key)? <= SystemTime::now());

    let leftovers = fs::read_dir(key.path().parent().unwrap())?.count();
    assert_eq!(leftovers, 1);
    Ok(())
  }

  #[test]
  fn missing_entries_report_errors() {
    let temp = tempdir().unwrap();
    let cache = FileCache::new(temp.path());
    let key = cache.key_for(&["absent"], ICON_SUFFIX);

    assert!(cache.modified(&key).is_err());
    assert!(cache.read(&key).is_err());
  }
}
