#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod fetch;
pub mod handler;
pub mod models;
pub mod normalize;
pub mod params;
pub mod resolver;
pub mod theme;

pub use cache::{CacheKey, FileCache, IconCache};
pub use config::ResolverConfig;
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use handler::{IconHandler, MediaOutcome, ResolveIcon};
pub use models::{IconColor, IconRequest, IconSource, Length, RequestDefaults};
pub use normalize::{NormalizeError, SvgStyle, normalize_svg};
pub use params::{ParameterResolver, RequestError};
pub use resolver::{IconError, IconResolver, data_uri};
pub use theme::{StyleReplacements, ThemeColors};
