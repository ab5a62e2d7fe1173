//! Remote artwork download.

use std::io::Read;
use std::time::Duration;

/// Upper bound on a downloaded icon; anything larger is not an icon.
const MAX_ICON_BYTES: u64 = 4 * 1024 * 1024;

/// Default user agent sent with every download.
pub const DEFAULT_USER_AGENT: &str = concat!("icon_fetcher/", env!("CARGO_PKG_VERSION"));

/// Errors produced while downloading artwork. Every variant means "download failed".
#[derive(Debug)]
pub enum FetchError {
  /// Connection, DNS, TLS or timeout failure.
  Transport {
    /// Requested URL.
    url: String,
    /// Diagnostic reported by the transport.
    message: String,
  },
  /// The server answered with a non-success status.
  Status {
    /// Requested URL.
    url: String,
    /// HTTP status code.
    code: u16,
  },
  /// The response body could not be read.
  Read {
    /// Requested URL.
    url: String,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The server answered successfully but without content.
  EmptyBody {
    /// Requested URL.
    url: String,
  },
}

impl std::fmt::Display for FetchError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Transport { url, message } => write!(f, "request to {} failed: {}", url, message),
      Self::Status { url, code } => write!(f, "{} answered with HTTP {}", url, code),
      Self::Read { url, source } => write!(f, "failed to read body of {}: {}", url, source),
      Self::EmptyBody { url } => write!(f, "{} returned an empty body", url),
    }
  }
}

impl std::error::Error for FetchError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Read { source, .. } => Some(source),
      _ => None,
    }
  }
}

/// Capability for downloading raw artwork. All-or-nothing: partial bodies are never returned.
pub trait Fetcher {
  /// Download `url`, returning its non-empty body.
  fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
  fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    (**self).fetch(url)
  }
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  agent: ureq::Agent,
}

impl HttpFetcher {
  /// Build a fetcher sending `user_agent`; a zero `timeout` disables the overall deadline.
  pub fn new(user_agent: &str, timeout: Duration) -> Self {
    let mut builder = ureq::AgentBuilder::new().user_agent(user_agent);
    if !timeout.is_zero() {
      builder = builder.timeout(timeout);
    }
    Self {
      agent: builder.build(),
    }
  }
}

impl Default for HttpFetcher {
  fn default() -> Self {
    Self::new(DEFAULT_USER_AGENT, Duration::from_secs(30))
  }
}

impl Fetcher for HttpFetcher {
  fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = self.agent.get(url).call().map_err(|err| match err {
      ureq::Error::Status(code, _) => FetchError::Status {
        url: url.to_string(),
        code,
      },
      ureq::Error::Transport(transport) => FetchError::Transport {
        url: url.to_string(),
        message: transport.to_string(),
      },
    })?;

    let mut body = Vec::new();
    response
      .into_reader()
      .take(MAX_ICON_BYTES)
      .read_to_end(&mut body)
      .map_err(|source| FetchError::Read {
        url: url.to_string(),
        source,
      })?;

    ensure_body(url, body)
  }
}

fn ensure_body(url: &str, body: Vec<u8>) -> Result<Vec<u8>, FetchError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Err(FetchError::EmptyBody {
      url: url.to_string(),
    });
  }
  Ok(body)
}
