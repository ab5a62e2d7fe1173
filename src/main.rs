use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use icon_fetcher::{
  FileCache, HttpFetcher, IconHandler, IconResolver, MediaOutcome, ParameterResolver,
  ResolverConfig, data_uri,
};

/// Resolve an `icon:` media id into a cached, normalized SVG file.
#[derive(Debug, Parser)]
#[command(name = "icon-fetcher", version, about)]
struct Cli {
  /// Media id, e.g. `icon:fa:w-24px:h-24px:cc0000:home.svg`.
  media_id: String,

  /// Configuration file; defaults to `icon_fetcher.config.json` in the working directory.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Override the configured cache directory.
  #[arg(long)]
  cache_dir: Option<PathBuf>,

  /// Print the normalized SVG markup instead of its cache path.
  #[arg(long, conflicts_with = "data_uri")]
  print: bool,

  /// Print the normalized SVG as a base64 data URI.
  #[arg(long)]
  data_uri: bool,

  /// Regenerate the entry even when a cached copy exists.
  #[arg(long)]
  refresh: bool,
}

fn main() -> Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let mut config = match &cli.config {
    Some(path) => ResolverConfig::load(path)?,
    None => ResolverConfig::discover(
      &std::env::current_dir().context("failed to determine the working directory")?,
    ),
  };
  if let Some(cache_dir) = cli.cache_dir.clone() {
    config.cache_dir = cache_dir;
  }

  let params = ParameterResolver::new(config.to_defaults()?, config.to_theme());
  let mut icons = IconResolver::new(
    HttpFetcher::new(&config.user_agent, config.timeout()),
    FileCache::new(&config.cache_dir),
  );
  if cli.refresh {
    icons = icons.with_engine_marker(SystemTime::now());
  }
  let handler = IconHandler::new(params, icons);

  let path = match handler.handle(&cli.media_id) {
    MediaOutcome::Found { path } => path,
    MediaOutcome::Unhandled => {
      eprintln!("'{}' is not an icon media id", cli.media_id);
      return Ok(ExitCode::FAILURE);
    }
    MediaOutcome::NotFound => {
      eprintln!("icon not found: {}", cli.media_id);
      return Ok(ExitCode::FAILURE);
    }
  };

  let mut stdout = io::stdout().lock();
  if cli.print || cli.data_uri {
    let svg = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    if cli.data_uri {
      writeln!(stdout, "{}", data_uri(&svg))?;
    } else {
      stdout.write_all(&svg)?;
      writeln!(stdout)?;
    }
  } else {
    writeln!(stdout, "{}", path.display())?;
  }

  Ok(ExitCode::SUCCESS)
}
